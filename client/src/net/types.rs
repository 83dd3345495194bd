//! Wire DTOs, query filters, and the normalized request error.
//!
//! DESIGN
//! ======
//! Resource payloads (doctors, patients, appointments) stay as
//! `serde_json::Value`: the client forwards them to views without
//! interpreting them. Only the shapes the client itself acts on (login,
//! export jobs, filters) are typed here.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

use crate::state::session::Role;

// =============================================================================
// ERRORS
// =============================================================================

/// The single error shape every API call fails with.
///
/// `status` is `None` when no HTTP response was received at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RequestError {
    pub status: Option<u16>,
    pub message: String,
}

impl RequestError {
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self { status: Some(status), message: message.into() }
    }

    #[must_use]
    pub fn network(err: impl std::fmt::Display) -> Self {
        let detail = err.to_string();
        let message = if detail.is_empty() {
            "Network error occurred".to_owned()
        } else {
            format!("Network error occurred: {detail}")
        };
        Self { status: None, message }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status, Some(401 | 403))
    }
}

// =============================================================================
// AUTH
// =============================================================================

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: String,
    pub access_token: String,
    /// Role-specific profile; always carries `role`.
    pub user: serde_json::Value,
}

impl LoginResponse {
    /// Role claimed by the returned user record, if it is one the client knows.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.user.get("role")?.as_str()?.parse().ok()
    }
}

// =============================================================================
// FILTERS
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Booked,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Booked => "Booked",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "booked" => Ok(Self::Booked),
            "completed" => Ok(Self::Completed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            other => Err(format!("unknown appointment status: {other}")),
        }
    }
}

pub type QueryPairs = Vec<(&'static str, String)>;

/// Optional filters for appointment listings.
///
/// The backend honours `past` only on the patient listing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AppointmentFilter {
    pub status: Option<AppointmentStatus>,
    pub upcoming: bool,
    pub past: bool,
}

impl AppointmentFilter {
    #[must_use]
    pub fn to_query(&self) -> QueryPairs {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_owned()));
        }
        if self.upcoming {
            pairs.push(("upcoming", "true".to_owned()));
        }
        if self.past {
            pairs.push(("past", "true".to_owned()));
        }
        pairs
    }
}

/// Date window (`YYYY-MM-DD`) for a doctor's availability listing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AvailabilityRange {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl AvailabilityRange {
    #[must_use]
    pub fn to_query(&self) -> QueryPairs {
        let mut pairs = Vec::new();
        push_non_empty(&mut pairs, "start_date", self.start_date.as_deref());
        push_non_empty(&mut pairs, "end_date", self.end_date.as_deref());
        pairs
    }
}

#[must_use]
pub fn search_query(search: Option<&str>) -> QueryPairs {
    let mut pairs = Vec::new();
    push_non_empty(&mut pairs, "search", search);
    pairs
}

fn push_non_empty(pairs: &mut QueryPairs, key: &'static str, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
        pairs.push((key, value.to_owned()));
    }
}

// =============================================================================
// EXPORT JOBS
// =============================================================================

/// Handle returned when a history export is queued.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ExportJob {
    pub task_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// Progress report for an export that has not produced a file yet.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ExportProgress {
    pub state: String,
    #[serde(default)]
    pub status: String,
    pub error: Option<String>,
}

pub const EXPORT_SUCCESS_STATE: &str = "SUCCESS";
pub const EXPORT_FAILURE_STATE: &str = "FAILURE";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportStatus {
    InProgress(ExportProgress),
    Ready { csv: String },
    /// Job finished without producing any rows.
    Empty { status: String },
    Failed { error: String },
}

impl ExportStatus {
    /// Classify a JSON progress record by its job state.
    #[must_use]
    pub fn from_progress(progress: ExportProgress) -> Self {
        match progress.state.as_str() {
            EXPORT_SUCCESS_STATE => Self::Empty { status: progress.status },
            EXPORT_FAILURE_STATE => Self::Failed {
                error: progress.error.unwrap_or(progress.status),
            },
            _ => Self::InProgress(progress),
        }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    /// Polling can stop.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        !matches!(self, Self::InProgress(_))
    }
}
