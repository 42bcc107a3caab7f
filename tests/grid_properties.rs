use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;
use timetable_viewer::display::render;
use timetable_viewer::schedule::{Assignment, AssignmentGrid, DaySlots, LessonCategory};
use timetable_viewer::summary::summarize;

const SLOTS: [&str; 4] = ["1限", "2限", "3限", "4限"];

fn assignment() -> impl Strategy<Value = Assignment> {
    (
        // a small pool so the same student shows up in several cells
        prop::sample::select(vec!["Alice", "Bob", "田中", "Zed"]),
        "[A-Za-z]{1,6}(_[0-9a-z.]{0,3})?",
        prop::sample::select(vec!["対面", "SS", "高校対面", "online", ""]),
    )
        .prop_map(|(person, lesson_id, category)| Assignment::new(person, &lesson_id, category))
}

fn day() -> impl Strategy<Value = DaySlots> {
    // includes slots outside the rendered list and days with no slots at all
    prop::collection::btree_map(
        prop::sample::select(vec!["1限", "2限", "3限", "4限", "放課後"]).prop_map(String::from),
        prop::collection::vec(assignment(), 0..4),
        0..5,
    )
}

fn grid() -> impl Strategy<Value = AssignmentGrid> {
    prop::collection::btree_map("2025-0[1-9]-[0-2][1-9]", day(), 0..6)
}

fn slots() -> impl Strategy<Value = Vec<String>> {
    prop::sample::subsequence(SLOTS.to_vec(), 0..=SLOTS.len())
        .prop_map(|slots| slots.into_iter().map(String::from).collect())
}

proptest! {
    #[test]
    fn distinct_people_are_sorted_and_unique(grid in grid(), slots in slots()) {
        let table = render(&grid, &slots);
        prop_assert!(table.distinct_people.windows(2).all(|w| w[0] < w[1]));

        let shown: BTreeSet<&str> = table
            .rows
            .iter()
            .flat_map(|row| row.cells.iter().flatten())
            .map(|a| a.person.as_str())
            .collect();
        let listed: BTreeSet<&str> = table.distinct_people.iter().map(String::as_str).collect();
        prop_assert_eq!(listed, shown);
    }

    #[test]
    fn every_date_renders_one_cell_per_slot(grid in grid(), slots in slots()) {
        let table = render(&grid, &slots);
        let dates: Vec<&String> = table.rows.iter().map(|row| &row.date).collect();
        prop_assert_eq!(dates, grid.keys().collect::<Vec<_>>());
        for row in &table.rows {
            prop_assert_eq!(row.cells.len(), slots.len());
        }
    }

    #[test]
    fn per_person_counts_every_entry(grid in grid()) {
        let mut expected: BTreeMap<String, u32> = BTreeMap::new();
        for assignment in grid.values().flat_map(|day| day.values().flatten()) {
            *expected.entry(assignment.person.clone()).or_insert(0) += 1;
        }
        prop_assert_eq!(summarize(&grid).per_person, expected);
    }

    #[test]
    fn per_date_totals_cover_known_categories(grid in grid()) {
        let summary = summarize(&grid);
        prop_assert_eq!(
            summary.per_date_by_category.keys().collect::<Vec<_>>(),
            grid.keys().collect::<Vec<_>>()
        );
        for (date, day) in &grid {
            let totals = &summary.per_date_by_category[date];
            prop_assert_eq!(totals.len(), LessonCategory::ALL.len());
            for category in LessonCategory::ALL {
                let count = day
                    .values()
                    .flatten()
                    .filter(|a| a.category == category.as_str())
                    .count() as u32;
                prop_assert_eq!(totals[&category], count);
            }
        }
    }
}
