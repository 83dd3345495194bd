//! Networking modules for the clinic REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` owns the HTTP client and the request/error normalization; the
//! `api_*` modules are the per-role endpoint namespaces built on top of it;
//! `types` defines the wire DTOs and query filters.

pub mod api;
pub mod api_admin;
pub mod api_auth;
pub mod api_doctor;
pub mod api_patient;
pub mod types;

pub use api::{ApiClient, RawResponse, RequestOptions};
pub use types::RequestError;
