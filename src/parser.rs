use std::fs;
use std::path::Path;
use serde_json::Value;

use crate::error::ViewerError;
use crate::schedule::{AssignmentGrid, GenerationResponse, ScheduleRequest};

/// Parses a saved settings document.
///
/// Both `students` and `schedule_info` must be present at the top level.
pub fn parse_request_document(text: &str) -> Result<ScheduleRequest, ViewerError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ViewerError::ReadFailed(e.to_string()))?;

    let has_required_keys = value
        .as_object()
        .map(|obj| obj.contains_key("students") && obj.contains_key("schedule_info"))
        .unwrap_or(false);
    if !has_required_keys {
        return Err(ViewerError::InvalidFormat);
    }

    serde_json::from_value(value).map_err(|e| ViewerError::ReadFailed(e.to_string()))
}

/// Parses a timetable: either a bare grid or a full generation-service response
pub fn parse_grid_document(text: &str) -> Result<AssignmentGrid, ViewerError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ViewerError::ReadFailed(e.to_string()))?;

    if value.get("success").is_some_and(Value::is_boolean) {
        let response: GenerationResponse =
            serde_json::from_value(value).map_err(|e| ViewerError::ReadFailed(e.to_string()))?;
        if !response.success {
            return Err(ViewerError::application(response.message));
        }
        return Ok(response.schedule.unwrap_or_default());
    }

    serde_json::from_value(value).map_err(|e| ViewerError::ReadFailed(e.to_string()))
}

pub fn load_request<P: AsRef<Path>>(path: P) -> Result<ScheduleRequest, ViewerError> {
    parse_request_document(&fs::read_to_string(path)?)
}

pub fn load_grid<P: AsRef<Path>>(path: P) -> Result<AssignmentGrid, ViewerError> {
    parse_grid_document(&fs::read_to_string(path)?)
}
