use std::fs::File;
use std::io::Write;
use std::path::Path;
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::ViewerError;
use crate::schedule::{format_assignment_label, Assignment, AssignmentGrid, ScheduleRequest};

pub const CSV_FILE_NAME: &str = "schedule.csv";
pub const JSON_FILE_NAME: &str = "schedule_data.json";

/// Lets spreadsheet tools that assume a legacy code page detect UTF-8
const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Encodes the grid as CSV: a `Date` column, then one column per slot in `slots` order.
///
/// Every slot cell is quoted, and assignments sharing a cell are separated by a
/// line feed so spreadsheets show them on separate lines within the cell.
/// Rows follow the grid's date order, the same order the table view uses.
pub fn to_csv(grid: &AssignmentGrid, slots: &[String]) -> Result<String, ViewerError> {
    // Cells are quoted by hand below, so the writer must emit fields verbatim
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let mut header = Vec::with_capacity(slots.len() + 1);
    header.push("Date".to_string());
    header.extend(slots.iter().cloned());
    wtr.write_record(&header)?;

    for (date, day) in grid {
        let mut record = Vec::with_capacity(slots.len() + 1);
        record.push(date.clone());
        for slot in slots {
            let content = day.get(slot).map(|a| cell_content(a)).unwrap_or_default();
            record.push(quote_cell(&content));
        }
        wtr.write_record(&record)?;
    }

    let bytes = wtr.into_inner().map_err(|e| ViewerError::Io(e.into_error()))?;
    let mut body = String::from_utf8_lossy(&bytes).into_owned();
    if body.ends_with('\n') {
        body.pop();
    }

    Ok(format!("{}{}", BYTE_ORDER_MARK, body))
}

fn cell_content(assignments: &[Assignment]) -> String {
    assignments
        .iter()
        .map(|a| format_assignment_label(&a.person, &a.lesson_id))
        .collect::<Vec<_>>()
        .join("\n")
}

fn quote_cell(content: &str) -> String {
    format!("\"{}\"", content.replace('"', "\"\""))
}

/// Pretty-prints the request document the way it is saved to `schedule_data.json`
pub fn to_json_document(request: &ScheduleRequest) -> Result<String, ViewerError> {
    Ok(serde_json::to_string_pretty(request)?)
}

/// Writes an export artifact to disk
pub fn write_artifact(path: &Path, contents: &str) -> Result<(), ViewerError> {
    let mut file = File::create(path)?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(())
}
