//! `/doctor` endpoints: own appointments, assigned patients, availability.

#[cfg(test)]
#[path = "api_doctor_test.rs"]
mod api_doctor_test;

use serde_json::Value;

use super::api::{ApiClient, RequestOptions};
use super::types::{AppointmentFilter, AvailabilityRange, RequestError};

fn appointment_action_endpoint(appointment_id: u64, action: &str) -> String {
    format!("/doctor/appointments/{appointment_id}/{action}")
}

fn patient_history_endpoint(patient_id: u64) -> String {
    format!("/doctor/patients/{patient_id}/history")
}

fn availability_body(slots: Vec<Value>) -> Value {
    serde_json::json!({ "slots": slots })
}

pub struct DoctorApi<'a> {
    client: &'a ApiClient,
}

#[allow(clippy::missing_errors_doc)]
impl<'a> DoctorApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn dashboard(&self) -> Result<Value, RequestError> {
        self.client.request("/doctor/dashboard", RequestOptions::get()).await
    }

    pub async fn appointments(&self, filter: &AppointmentFilter) -> Result<Value, RequestError> {
        let options = RequestOptions::get().query(filter.to_query());
        self.client.request("/doctor/appointments", options).await
    }

    pub async fn patients(&self) -> Result<Value, RequestError> {
        self.client.request("/doctor/patients", RequestOptions::get()).await
    }

    /// Mark an appointment completed and record its treatment.
    pub async fn complete_appointment(&self, appointment_id: u64, treatment: Value) -> Result<Value, RequestError> {
        let endpoint = appointment_action_endpoint(appointment_id, "complete");
        self.client.request(&endpoint, RequestOptions::post().json(treatment)).await
    }

    pub async fn cancel_appointment(&self, appointment_id: u64) -> Result<Value, RequestError> {
        let endpoint = appointment_action_endpoint(appointment_id, "cancel");
        self.client.request(&endpoint, RequestOptions::post()).await
    }

    pub async fn patient_history(&self, patient_id: u64) -> Result<Value, RequestError> {
        self.client.request(&patient_history_endpoint(patient_id), RequestOptions::get()).await
    }

    /// Amend the treatment recorded for a completed appointment.
    pub async fn update_history(&self, appointment_id: u64, treatment: Value) -> Result<Value, RequestError> {
        let endpoint = appointment_action_endpoint(appointment_id, "history");
        self.client.request(&endpoint, RequestOptions::put().json(treatment)).await
    }

    pub async fn availability(&self, range: &AvailabilityRange) -> Result<Value, RequestError> {
        let options = RequestOptions::get().query(range.to_query());
        self.client.request("/doctor/availability", options).await
    }

    pub async fn set_availability(&self, slots: Vec<Value>) -> Result<Value, RequestError> {
        let options = RequestOptions::post().json(availability_body(slots));
        self.client.request("/doctor/availability", options).await
    }
}
