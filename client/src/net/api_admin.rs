//! `/admin` endpoints: clinic-wide doctor, patient and appointment management.

#[cfg(test)]
#[path = "api_admin_test.rs"]
mod api_admin_test;

use serde_json::Value;

use super::api::{ApiClient, RequestOptions};
use super::types::{AppointmentFilter, RequestError, search_query};

// Backend route spelling.
const DEPARTMENTS_ENDPOINT: &str = "/admin/deaprtment";

fn doctor_endpoint(id: u64) -> String {
    format!("/admin/doctors/{id}")
}

fn patient_endpoint(id: u64) -> String {
    format!("/admin/patients/{id}")
}

fn appointment_history_endpoint(appointment_id: u64) -> String {
    format!("/admin/appointments/{appointment_id}/history")
}

pub struct AdminApi<'a> {
    client: &'a ApiClient,
}

#[allow(clippy::missing_errors_doc)]
impl<'a> AdminApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn dashboard(&self) -> Result<Value, RequestError> {
        self.client.request("/admin/dashboard", RequestOptions::get()).await
    }

    pub async fn doctors(&self, search: Option<&str>) -> Result<Value, RequestError> {
        let options = RequestOptions::get().query(search_query(search));
        self.client.request("/admin/doctors", options).await
    }

    pub async fn doctor(&self, id: u64) -> Result<Value, RequestError> {
        self.client.request(&doctor_endpoint(id), RequestOptions::get()).await
    }

    pub async fn create_doctor(&self, payload: Value) -> Result<Value, RequestError> {
        self.client.request("/admin/doctors", RequestOptions::post().json(payload)).await
    }

    pub async fn update_doctor(&self, id: u64, payload: Value) -> Result<Value, RequestError> {
        self.client.request(&doctor_endpoint(id), RequestOptions::put().json(payload)).await
    }

    pub async fn delete_doctor(&self, id: u64) -> Result<Value, RequestError> {
        self.client.request(&doctor_endpoint(id), RequestOptions::delete()).await
    }

    pub async fn patients(&self, search: Option<&str>) -> Result<Value, RequestError> {
        let options = RequestOptions::get().query(search_query(search));
        self.client.request("/admin/patients", options).await
    }

    pub async fn patient(&self, id: u64) -> Result<Value, RequestError> {
        self.client.request(&patient_endpoint(id), RequestOptions::get()).await
    }

    pub async fn update_patient(&self, id: u64, payload: Value) -> Result<Value, RequestError> {
        self.client.request(&patient_endpoint(id), RequestOptions::put().json(payload)).await
    }

    pub async fn delete_patient(&self, id: u64) -> Result<Value, RequestError> {
        self.client.request(&patient_endpoint(id), RequestOptions::delete()).await
    }

    pub async fn appointments(&self, filter: &AppointmentFilter) -> Result<Value, RequestError> {
        let options = RequestOptions::get().query(filter.to_query());
        self.client.request("/admin/appointments", options).await
    }

    pub async fn appointment_history(&self, appointment_id: u64) -> Result<Value, RequestError> {
        self.client.request(&appointment_history_endpoint(appointment_id), RequestOptions::get()).await
    }

    pub async fn departments(&self) -> Result<Value, RequestError> {
        self.client.request(DEPARTMENTS_ENDPOINT, RequestOptions::get()).await
    }
}
