//! Job DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::record::Record;

/// Request to start a new batch from already validated records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitJob {
    pub records: Vec<Record>,
}

/// Response to an accepted batch submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub job_id: Uuid,
    pub total: usize,
    pub workers: usize,
}

/// Generic acknowledgement for control operations (pause, resume, reset)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlResponse {
    pub ok: bool,
    pub message: String,
}

impl ControlResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }
}

/// Where the current job's results artifact lives, if it exists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsLocation {
    pub job_id: Option<Uuid>,
    pub path: Option<String>,
}
