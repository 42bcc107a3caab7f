use std::collections::BTreeSet;
use std::fmt::Write as _;
use serde::Serialize;

use crate::filter::FilterState;
use crate::schedule::{derive_base_label, format_assignment_label, AssignmentGrid};
use crate::session::ScheduleView;
use crate::summary::ScheduleSummary;

/// An assignment ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedAssignment {
    pub person: String,
    pub base_label: String,
    /// `person(base label)`
    pub label: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedRow {
    pub date: String,
    /// One cell per requested slot, in the requested order
    pub cells: Vec<Vec<RenderedAssignment>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedTable {
    pub slots: Vec<String>,
    pub rows: Vec<RenderedRow>,
    /// Sorted, no duplicates
    pub distinct_people: Vec<String>,
}

/// Turns the grid into display rows.
///
/// Rows are the grid's dates in ascending order. Columns are `slots` as given by the
/// calendar, not the grid's own slot keys; a slot missing for a date renders empty.
pub fn render(grid: &AssignmentGrid, slots: &[String]) -> RenderedTable {
    let mut people = BTreeSet::new();
    let mut rows = Vec::with_capacity(grid.len());

    for (date, day) in grid {
        let mut cells = Vec::with_capacity(slots.len());
        for slot in slots {
            let assignments = day.get(slot).map(Vec::as_slice).unwrap_or(&[]);
            let cell = assignments
                .iter()
                .map(|a| {
                    people.insert(a.person.clone());
                    RenderedAssignment {
                        person: a.person.clone(),
                        base_label: derive_base_label(&a.lesson_id).to_string(),
                        label: format_assignment_label(&a.person, &a.lesson_id),
                        category: a.category.clone(),
                    }
                })
                .collect();
            cells.push(cell);
        }
        rows.push(RenderedRow { date: date.clone(), cells });
    }

    RenderedTable {
        slots: slots.to_vec(),
        rows,
        distinct_people: people.into_iter().collect(),
    }
}

/// A badge as shown under the current filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeView {
    pub person: String,
    pub label: String,
    pub category: String,
    pub dimmed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub date: String,
    pub cells: Vec<Vec<BadgeView>>,
}

/// Attaches the filter's dimming flags to a rendered table without touching it
pub fn apply_filter(table: &RenderedTable, filter: &FilterState) -> Vec<RowView> {
    table
        .rows
        .iter()
        .map(|row| RowView {
            date: row.date.clone(),
            cells: row
                .cells
                .iter()
                .map(|cell| {
                    cell.iter()
                        .map(|a| BadgeView {
                            person: a.person.clone(),
                            label: a.label.clone(),
                            category: a.category.clone(),
                            dimmed: filter.is_dimmed(&a.person),
                        })
                        .collect()
                })
                .collect(),
        })
        .collect()
}

/// Plain-text table: one line per date and slot
pub fn schedule_lines(table: &RenderedTable) -> Vec<String> {
    let mut lines = Vec::new();
    for row in &table.rows {
        lines.push(format!("{}:", row.date));
        for (slot, cell) in table.slots.iter().zip(&row.cells) {
            if cell.is_empty() {
                lines.push(format!("  {} -> [EMPTY]", slot));
            } else {
                let labels: Vec<&str> = cell.iter().map(|a| a.label.as_str()).collect();
                lines.push(format!("  {} -> {}", slot, labels.join(", ")));
            }
        }
    }
    lines
}

/// Prints the table and the summary to stdout
pub fn print_schedule(table: &RenderedTable, summary: &ScheduleSummary) {
    println!("\n=== Timetable ===");
    println!("Dates: {}, slots per day: {}", table.rows.len(), table.slots.len());
    for line in schedule_lines(table) {
        println!("{}", line);
    }

    println!("\n=== Lessons per student ===");
    for line in summary.person_lines() {
        println!("  {}", line);
    }
    println!("\n=== Lessons per date ===");
    for line in summary.date_lines() {
        println!("  {}", line);
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Server-rendered page for the current session
pub fn render_page(view: &ScheduleView) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>Timetable</title>");
    html.push_str("<link rel=\"stylesheet\" href=\"/static/style.css\"></head><body>\n");

    if view.generating {
        html.push_str("<div id=\"loading\">Generating timetable...</div>\n");
    }
    if let Some(error) = &view.error {
        let _ = writeln!(html, "<p class=\"error-message\">{}</p>", escape_html(error));
    }
    if let Some(at) = &view.generated_at {
        let _ = writeln!(html, "<p class=\"generated-at\">Generated at {}</p>", escape_html(at));
    }

    html.push_str("<div id=\"student-filter-container\">");
    for entry in view.selector.iter().filter(|e| e.visible) {
        let class = if entry.active { "filter-btn active" } else { "filter-btn" };
        let _ = write!(
            html,
            "<button class=\"{}\" data-student-filter=\"{}\">{}</button>",
            class,
            escape_html(entry.target.as_str()),
            escape_html(&entry.label)
        );
    }
    html.push_str("</div>\n");

    html.push_str("<div id=\"result-area\"><table><thead><tr><th>Date</th>");
    for slot in &view.slots {
        let _ = write!(html, "<th>{}</th>", escape_html(slot));
    }
    html.push_str("</tr></thead><tbody>");
    for row in &view.rows {
        let _ = write!(html, "<tr><td>{}</td>", escape_html(&row.date));
        for cell in &row.cells {
            html.push_str("<td>");
            for badge in cell {
                let dimmed = if badge.dimmed { " dimmed" } else { "" };
                let _ = write!(
                    html,
                    "<span class=\"lesson-badge lesson-type-{}{}\" data-student=\"{}\">{}</span>",
                    escape_html(&badge.category),
                    dimmed,
                    escape_html(&badge.person),
                    escape_html(&badge.label)
                );
            }
            html.push_str("</td>");
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table></div>\n");

    html.push_str("<div id=\"summary-container\"><h4>Lessons per student</h4><ul>");
    for line in view.summary.person_lines() {
        let _ = write!(html, "<li>{}</li>", escape_html(&line));
    }
    html.push_str("</ul><h4>Lessons per date</h4><ul>");
    for line in view.summary.date_lines() {
        let _ = write!(html, "<li>{}</li>", escape_html(&line));
    }
    html.push_str("</ul></div>\n");

    if view.can_export {
        html.push_str("<a id=\"export-csv-btn\" href=\"/export/schedule.csv\">Export CSV</a>\n");
    }
    html.push_str("<a id=\"save-btn\" href=\"/export/schedule_data.json\">Save settings</a>\n");
    html.push_str("</body></html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterTarget;
    use crate::schedule::Assignment;

    fn slots(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn grid() -> AssignmentGrid {
        let mut grid = AssignmentGrid::new();
        let day = grid.entry("2025-01-02".into()).or_default();
        day.insert("PM".into(), vec![Assignment::new("Carol", "Art_1", "SS")]);
        day.insert("EXTRA".into(), vec![Assignment::new("Zed", "Gym_1", "対面")]);
        let day = grid.entry("2025-01-01".into()).or_default();
        day.insert(
            "AM".into(),
            vec![
                Assignment::new("Bob", "Math_2", "対面"),
                Assignment::new("Alice", "A_B_3", "高校対面"),
            ],
        );
        day.insert("PM".into(), vec![Assignment::new("Bob", "Eng", "SS")]);
        grid
    }

    #[test]
    fn rows_are_sorted_dates_and_columns_follow_slots() {
        let table = render(&grid(), &slots(&["PM", "AM"]));
        let dates: Vec<&str> = table.rows.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-01-01", "2025-01-02"]);

        let first = &table.rows[0];
        assert_eq!(first.cells.len(), 2);
        assert_eq!(first.cells[0][0].label, "Bob(Eng)");
        assert_eq!(first.cells[1][0].label, "Bob(Math)");
        assert_eq!(first.cells[1][1].label, "Alice(A_B)");
        assert_eq!(first.cells[1][1].base_label, "A_B");

        // AM is missing on the second date, EXTRA is not a calendar slot
        assert!(table.rows[1].cells[1].is_empty());
        assert_eq!(table.rows[1].cells[0][0].person, "Carol");
    }

    #[test]
    fn distinct_people_sorted_and_limited_to_rendered_slots() {
        let table = render(&grid(), &slots(&["AM", "PM"]));
        assert_eq!(table.distinct_people, vec!["Alice", "Bob", "Carol"]);
        assert_eq!(table, render(&grid(), &slots(&["AM", "PM"])));
    }

    #[test]
    fn filter_flags_do_not_change_the_table() {
        let table = render(&grid(), &slots(&["AM", "PM"]));
        let before = table.clone();
        let mut filter = FilterState::default();
        filter.select_target(FilterTarget::from("Bob"));

        let rows = apply_filter(&table, &filter);
        assert!(!rows[0].cells[0][0].dimmed);
        assert!(rows[0].cells[0][1].dimmed);
        assert!(rows[1].cells[1][0].dimmed);
        assert_eq!(table, before);
    }

    #[test]
    fn text_lines_mark_empty_slots() {
        let table = render(&grid(), &slots(&["AM", "PM"]));
        let lines = schedule_lines(&table);
        assert_eq!(lines[0], "2025-01-01:");
        assert_eq!(lines[1], "  AM -> Bob(Math), Alice(A_B)");
        assert_eq!(lines[4], "  AM -> [EMPTY]");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }
}
