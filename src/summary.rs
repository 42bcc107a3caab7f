use std::collections::BTreeMap;
use serde::Serialize;

use crate::schedule::{AssignmentGrid, LessonCategory};

/// Lesson counts per student and per date/category
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ScheduleSummary {
    pub per_person: BTreeMap<String, u32>,
    /// Every date in the grid carries all three categories, zeros included
    pub per_date_by_category: BTreeMap<String, BTreeMap<LessonCategory, u32>>,
}

/// Counts assignments in the grid.
///
/// Assignments with an unrecognised category still count toward their student's total.
pub fn summarize(grid: &AssignmentGrid) -> ScheduleSummary {
    let mut summary = ScheduleSummary::default();

    for (date, day) in grid {
        let by_category = summary
            .per_date_by_category
            .entry(date.clone())
            .or_insert_with(|| LessonCategory::ALL.into_iter().map(|c| (c, 0)).collect());

        for assignment in day.values().flatten() {
            *summary
                .per_person
                .entry(assignment.person.clone())
                .or_insert(0) += 1;
            if let Some(category) = LessonCategory::from_label(&assignment.category) {
                *by_category.entry(category).or_insert(0) += 1;
            }
        }
    }

    summary
}

impl ScheduleSummary {
    /// `name: N lessons` (or `1 lesson`), sorted by name
    pub fn person_lines(&self) -> Vec<String> {
        self.per_person
            .iter()
            .map(|(person, count)| {
                let noun = if *count == 1 { "lesson" } else { "lessons" };
                format!("{}: {} {}", person, count, noun)
            })
            .collect()
    }

    /// `date: category: N, ...` with zero categories left out; dates with nothing left are skipped
    pub fn date_lines(&self) -> Vec<String> {
        self.per_date_by_category
            .iter()
            .filter_map(|(date, totals)| {
                let details = totals
                    .iter()
                    .filter(|(_, count)| **count > 0)
                    .map(|(category, count)| format!("{}: {}", category, count))
                    .collect::<Vec<_>>()
                    .join(", ");
                if details.is_empty() {
                    None
                } else {
                    Some(format!("{}: {}", date, details))
                }
            })
            .collect()
    }
}
