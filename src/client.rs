use std::time::Duration;
use log::{info, warn};

use crate::config::ViewerConfig;
use crate::error::ViewerError;
use crate::schedule::{AssignmentGrid, GenerationResponse, ScheduleRequest};

/// Posts schedule requests to the external timetable generator
#[derive(Debug, Clone)]
pub struct GenerationClient {
    http: reqwest::Client,
    url: String,
}

impl GenerationClient {
    pub fn new(config: &ViewerConfig) -> Result<Self, ViewerError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ViewerError::Transport(e.to_string()))?;
        Ok(GenerationClient {
            http,
            url: config.generator_url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sends one request and waits for the timetable.
    ///
    /// Network failures and unreadable bodies are transport errors; a readable
    /// body that is not a success is reported with the service's own message.
    pub async fn generate(&self, request: &ScheduleRequest) -> Result<AssignmentGrid, ViewerError> {
        info!("POST {}", self.url);
        let response = self
            .http
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!("Generator unreachable: {}", e);
                ViewerError::Transport(e.to_string())
            })?;

        let status = response.status();
        let body: GenerationResponse = response.json().await.map_err(|e| {
            warn!("Unreadable generator response ({}): {}", status, e);
            ViewerError::Transport(e.to_string())
        })?;

        interpret_response(status.is_success(), body)
    }
}

fn interpret_response(
    status_ok: bool,
    body: GenerationResponse,
) -> Result<AssignmentGrid, ViewerError> {
    if status_ok && body.success {
        Ok(body.schedule.unwrap_or_default())
    } else {
        Err(ViewerError::application(body.message))
    }
}
