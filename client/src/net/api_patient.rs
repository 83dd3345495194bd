//! `/patient` endpoints plus the patient-history export job pair.
//!
//! SYSTEM CONTEXT
//! ==============
//! History export is asynchronous on the backend: `export_history` queues a
//! job and returns its id, `export_status` polls it. While the job runs the
//! backend answers with a JSON progress record; once it finishes the same
//! endpoint answers with the CSV file itself. A job that finished without
//! rows comes back as `SUCCESS` JSON; a failed job as a 500 whose body is
//! a `FAILURE` record rather than the usual `message` envelope.

#[cfg(test)]
#[path = "api_patient_test.rs"]
mod api_patient_test;

use serde_json::Value;

use super::api::{ApiClient, RawResponse, RequestOptions};
use super::types::{
    AppointmentFilter, EXPORT_FAILURE_STATE, ExportJob, ExportProgress, ExportStatus, RequestError, search_query,
};

// Backend route spelling.
const DEPARTMENTS_ENDPOINT: &str = "/patient/deaprtment";
const EXPORT_ENDPOINT: &str = "/tasks/export-history";

fn department_doctors_endpoint(department_id: u64) -> String {
    format!("{DEPARTMENTS_ENDPOINT}/{department_id}/doctors")
}

fn doctor_endpoint(doctor_id: u64) -> String {
    format!("/patient/doctors/{doctor_id}")
}

fn doctor_availability_endpoint(doctor_id: u64) -> String {
    format!("/patient/doctors/{doctor_id}/availability")
}

fn cancel_endpoint(appointment_id: u64) -> String {
    format!("/patient/appointments/{appointment_id}/cancel")
}

/// Task ids are opaque backend tokens; anything that could change the
/// request target is refused instead of being spliced into the path.
fn export_status_endpoint(task_id: &str) -> Result<String, RequestError> {
    let valid = !task_id.is_empty() && task_id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(RequestError { status: None, message: format!("invalid export task id: {task_id:?}") });
    }
    Ok(format!("{EXPORT_ENDPOINT}/{task_id}"))
}

fn parse_export_status(raw: RawResponse) -> Result<ExportStatus, RequestError> {
    if !raw.is_success() {
        let failure = serde_json::from_str::<ExportProgress>(&raw.body).ok();
        return match failure {
            Some(progress) if progress.state == EXPORT_FAILURE_STATE => Ok(ExportStatus::from_progress(progress)),
            _ => Err(raw.into_failure()),
        };
    }
    let is_csv = raw.content_type.as_deref().is_some_and(|ct| ct.starts_with("text/csv"));
    if is_csv {
        return Ok(ExportStatus::Ready { csv: raw.body });
    }
    let status = raw.status;
    let value = raw.into_json()?;
    serde_json::from_value(value)
        .map(ExportStatus::from_progress)
        .map_err(|e| RequestError::http(status, format!("unexpected export status response: {e}")))
}

pub struct PatientApi<'a> {
    client: &'a ApiClient,
}

#[allow(clippy::missing_errors_doc)]
impl<'a> PatientApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn dashboard(&self) -> Result<Value, RequestError> {
        self.client.request("/patient/dashboard", RequestOptions::get()).await
    }

    pub async fn profile(&self) -> Result<Value, RequestError> {
        self.client.request("/patient/profile", RequestOptions::get()).await
    }

    pub async fn update_profile(&self, payload: Value) -> Result<Value, RequestError> {
        self.client.request("/patient/profile", RequestOptions::put().json(payload)).await
    }

    pub async fn departments(&self) -> Result<Value, RequestError> {
        self.client.request(DEPARTMENTS_ENDPOINT, RequestOptions::get()).await
    }

    pub async fn doctors_in_department(&self, department_id: u64) -> Result<Value, RequestError> {
        self.client.request(&department_doctors_endpoint(department_id), RequestOptions::get()).await
    }

    pub async fn doctor(&self, doctor_id: u64) -> Result<Value, RequestError> {
        self.client.request(&doctor_endpoint(doctor_id), RequestOptions::get()).await
    }

    pub async fn doctor_availability(&self, doctor_id: u64) -> Result<Value, RequestError> {
        self.client.request(&doctor_availability_endpoint(doctor_id), RequestOptions::get()).await
    }

    pub async fn appointments(&self, filter: &AppointmentFilter) -> Result<Value, RequestError> {
        let options = RequestOptions::get().query(filter.to_query());
        self.client.request("/patient/appointments", options).await
    }

    pub async fn book_appointment(&self, payload: Value) -> Result<Value, RequestError> {
        self.client.request("/patient/appointments", RequestOptions::post().json(payload)).await
    }

    pub async fn cancel_appointment(&self, appointment_id: u64) -> Result<Value, RequestError> {
        self.client.request(&cancel_endpoint(appointment_id), RequestOptions::post()).await
    }

    pub async fn history(&self) -> Result<Value, RequestError> {
        self.client.request("/patient/history", RequestOptions::get()).await
    }

    pub async fn search_doctors(&self, search: &str) -> Result<Value, RequestError> {
        let options = RequestOptions::get().query(search_query(Some(search)));
        self.client.request("/patient/doctors/search", options).await
    }

    /// Queue a CSV export of the patient's treatment history.
    pub async fn export_history(&self) -> Result<ExportJob, RequestError> {
        let raw = self.client.request_raw(EXPORT_ENDPOINT, RequestOptions::post()).await?;
        let status = raw.status;
        serde_json::from_value(raw.into_json()?)
            .map_err(|e| RequestError::http(status, format!("unexpected export response: {e}")))
    }

    /// Poll a queued export; yields the CSV once the job has finished.
    ///
    /// A failed job is reported as `ExportStatus::Failed`, not as an error.
    pub async fn export_status(&self, task_id: &str) -> Result<ExportStatus, RequestError> {
        let endpoint = export_status_endpoint(task_id)?;
        let (request_id, raw) = self.client.send(&endpoint, RequestOptions::get()).await?;
        let status = parse_export_status(raw);
        if let Err(err) = &status {
            tracing::info!(%request_id, %task_id, status = ?err.status, message = %err.message, "export status rejected");
        }
        status
    }
}
