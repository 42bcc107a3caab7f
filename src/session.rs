use chrono::{DateTime, Local};
use log::{info, warn};
use serde::Serialize;

use crate::display::{apply_filter, render, RenderedTable, RowView};
use crate::error::ViewerError;
use crate::filter::{FilterState, FilterTarget, SelectorEntry};
use crate::form::{collect, populate, to_csv, to_json_document, FormAction, FormState, EntryId};
use crate::parser::parse_request_document;
use crate::schedule::{AssignmentGrid, ScheduleRequest};
use crate::summary::{summarize, ScheduleSummary};

/// Everything the page shows, derived from the session state
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleView {
    pub slots: Vec<String>,
    pub rows: Vec<RowView>,
    pub selector: Vec<SelectorEntry>,
    pub search: String,
    pub summary: ScheduleSummary,
    pub can_export: bool,
    pub generating: bool,
    pub generated_at: Option<String>,
    pub error: Option<String>,
}

/// The timetable the session currently shows
#[derive(Debug, Clone)]
struct GeneratedSchedule {
    grid: AssignmentGrid,
    /// Slot order the grid was requested with; used for both the table and the CSV
    slots: Vec<String>,
    table: RenderedTable,
    generated_at: DateTime<Local>,
}

/// One operator's editor state: the form, the latest timetable, and the filter.
///
/// At most one generation request is outstanding at a time.
#[derive(Debug, Default)]
pub struct ViewerSession {
    form: FormState,
    current: Option<GeneratedSchedule>,
    pending_slots: Option<Vec<String>>,
    filter: FilterState,
    last_error: Option<String>,
}

impl ViewerSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn apply(&mut self, action: FormAction) -> Result<Option<EntryId>, ViewerError> {
        self.form.apply(action)
    }

    pub fn is_generating(&self) -> bool {
        self.pending_slots.is_some()
    }

    pub fn can_export_csv(&self) -> bool {
        !self.is_generating() && self.current.is_some()
    }

    pub fn grid(&self) -> Option<&AssignmentGrid> {
        self.current.as_ref().map(|c| &c.grid)
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Marks a generation request as outstanding and returns the document to send.
    ///
    /// The previous timetable is dropped, so exporting stays disabled until the
    /// request finishes successfully.
    pub fn begin_generation(&mut self) -> Result<ScheduleRequest, ViewerError> {
        if self.is_generating() {
            return Err(ViewerError::GenerationInFlight);
        }
        let request = collect(&self.form);
        if request.people.is_empty() {
            return Err(ViewerError::NoPeople);
        }

        self.pending_slots = Some(request.calendar.slots_per_day.clone());
        self.current = None;
        self.last_error = None;
        self.filter = FilterState::default();
        info!(
            "Generating timetable for {} students over {} dates",
            request.people.len(),
            request.calendar.dates.len()
        );
        Ok(request)
    }

    /// Stores the outcome of the outstanding request
    pub fn finish_generation(&mut self, outcome: Result<AssignmentGrid, ViewerError>) {
        let Some(slots) = self.pending_slots.take() else {
            warn!("Ignoring a generation result with no request outstanding");
            return;
        };

        match outcome {
            Ok(grid) => {
                let table = render(&grid, &slots);
                info!(
                    "Timetable ready: {} dates, {} students",
                    table.rows.len(),
                    table.distinct_people.len()
                );
                self.current = Some(GeneratedSchedule {
                    grid,
                    slots,
                    table,
                    generated_at: Local::now(),
                });
                self.filter = FilterState::default();
            }
            Err(e) => {
                warn!("Timetable generation failed: {}", e);
                self.last_error = Some(e.to_string());
            }
        }
    }

    pub fn select_target(&mut self, target: FilterTarget) {
        self.filter.select_target(target);
    }

    pub fn update_search(&mut self, query: &str) {
        self.filter.update_search(query);
    }

    /// Returns the CSV for the current timetable
    pub fn export_csv(&self) -> Result<String, ViewerError> {
        if self.is_generating() {
            return Err(ViewerError::GenerationInFlight);
        }
        let current = self.current.as_ref().ok_or(ViewerError::NoSchedule)?;
        to_csv(&current.grid, &current.slots)
    }

    /// Returns the form as the saved `schedule_data.json` document
    pub fn save_json(&self) -> Result<String, ViewerError> {
        if self.is_generating() {
            return Err(ViewerError::GenerationInFlight);
        }
        let request = collect(&self.form);
        if request.people.is_empty() {
            return Err(ViewerError::NothingToSave);
        }
        to_json_document(&request)
    }

    /// Replaces the form with a saved document; the form is untouched on error
    pub fn load_json(&mut self, text: &str) -> Result<(), ViewerError> {
        let doc = parse_request_document(text)?;
        self.form = populate(&doc);
        info!("Loaded settings for {} students", doc.people.len());
        Ok(())
    }

    /// Records an error to show on the page
    pub fn report_error(&mut self, error: &ViewerError) {
        self.last_error = Some(error.to_string());
    }

    pub fn view(&self) -> ScheduleView {
        let (slots, rows, people, summary, generated_at) = match &self.current {
            Some(current) => (
                current.slots.clone(),
                apply_filter(&current.table, &self.filter),
                current.table.distinct_people.as_slice(),
                summarize(&current.grid),
                Some(current.generated_at.format("%Y-%m-%d %H:%M:%S").to_string()),
            ),
            None => (Vec::new(), Vec::new(), &[][..], ScheduleSummary::default(), None),
        };

        ScheduleView {
            slots,
            rows,
            selector: if self.current.is_some() { self.filter.selector(people) } else { Vec::new() },
            search: self.filter.search.clone(),
            summary,
            can_export: self.can_export_csv(),
            generating: self.is_generating(),
            generated_at,
            error: self.last_error.clone(),
        }
    }
}
