use log::debug;

use crate::form::state::{FormState, PersonEntry};
use crate::schedule::{CalendarInfo, LessonSpec, PersonRecord, ScheduleRequest};

/// Splits a comma-separated input into trimmed, non-empty tokens, keeping their order
pub fn parse_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Joins tokens back into the form's comma-separated text
pub fn format_list(items: &[String]) -> String {
    items.join(", ")
}

/// Builds the request document from the form.
///
/// Entries without a name and lesson rows without a name or a positive count
/// are left out rather than reported.
pub fn collect(form: &FormState) -> ScheduleRequest {
    let mut request = ScheduleRequest {
        calendar: CalendarInfo {
            dates: parse_list(&form.schedule_dates),
            slots_per_day: parse_list(&form.schedule_slots),
        },
        ..ScheduleRequest::default()
    };

    for entry in form.people() {
        let name = entry.name.trim();
        if name.is_empty() {
            debug!("Skipping form entry {} without a name", entry.id);
            continue;
        }
        request.people.insert(name.to_string(), collect_person(entry));
    }

    request
}

fn collect_person(entry: &PersonEntry) -> PersonRecord {
    let mut lessons = Vec::with_capacity(entry.lessons.len());
    for row in &entry.lessons {
        let name = row.name.trim();
        let count = row.count.trim();
        if name.is_empty() || count.is_empty() {
            continue;
        }
        match count.parse::<u64>() {
            Ok(count) if count >= 1 => lessons.push(LessonSpec {
                name: name.to_string(),
                category: row.category,
                count,
            }),
            _ => debug!(
                "Dropping lesson '{}' of '{}': count '{}' is not a positive integer",
                name,
                entry.name.trim(),
                count
            ),
        }
    }

    PersonRecord {
        lessons,
        unavailable_dates: parse_list(&entry.unavailable_dates),
    }
}

/// Rebuilds an editable form from a request document, one entry per student
/// in the document's iteration order
pub fn populate(doc: &ScheduleRequest) -> FormState {
    let mut form = FormState::new();
    form.schedule_dates = format_list(&doc.calendar.dates);
    form.schedule_slots = format_list(&doc.calendar.slots_per_day);

    for (name, record) in &doc.people {
        let id = form.add_person();
        for lesson in &record.lessons {
            let Ok(lesson_id) = form.add_lesson(id) else { continue };
            if let Ok(row) = form.lesson_mut(id, lesson_id) {
                row.name = lesson.name.clone();
                row.count = lesson.count.to_string();
                row.category = lesson.category;
            }
        }
        if let Ok(entry) = form.person_mut(id) {
            entry.name = name.clone();
            entry.unavailable_dates = format_list(&record.unavailable_dates);
        }
    }

    form
}
