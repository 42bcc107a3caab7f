use thiserror::Error;

use crate::form::EntryId;

/// Everything that can go wrong while editing, generating or exporting a timetable.
///
/// The display strings are what the operator sees next to the control they used.
#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Invalid file format: `students` and `schedule_info` are required")]
    InvalidFormat,

    #[error("Failed to read the file: {0}")]
    ReadFailed(String),

    #[error("Register at least one student")]
    NoPeople,

    #[error("There is no data to save")]
    NothingToSave,

    #[error("There is no timetable to export")]
    NoSchedule,

    #[error("A timetable is already being generated")]
    GenerationInFlight,

    #[error("No form entry with id {0}")]
    UnknownEntry(EntryId),

    #[error("Communication error: {0}")]
    Transport(String),

    #[error("Error: {0}")]
    Application(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ViewerError {
    /// Fallback text when the generation service fails without saying why
    pub const UNKNOWN_FAILURE: &'static str = "An unknown error occurred.";

    pub fn application(message: Option<String>) -> Self {
        ViewerError::Application(
            message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| Self::UNKNOWN_FAILURE.to_string()),
        )
    }
}
