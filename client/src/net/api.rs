//! HTTP client for the clinic REST API.
//!
//! Every call goes through `ApiClient::request_raw`, which attaches the JSON
//! content type, the bearer credential, and a per-request id, then folds
//! every failure (transport error or non-2xx status) into `RequestError`.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx bodies are mined for a `message` field; when there is none the
//! caller gets `Request failed with status <code>`. Nothing is retried.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::Duration;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use uuid::Uuid;

use super::api_admin::AdminApi;
use super::api_auth::AuthApi;
use super::api_doctor::DoctorApi;
use super::api_patient::PatientApi;
use super::types::{QueryPairs, RequestError};
use crate::config::ClientConfig;
use crate::state::session::Session;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

const JSON_CONTENT_TYPE: &str = "application/json";

// =============================================================================
// REQUEST / RESPONSE
// =============================================================================

#[derive(Clone, Debug)]
pub struct RequestOptions {
    pub method: Method,
    pub query: QueryPairs,
    pub body: Option<Value>,
    /// Extra headers; these override the default content type.
    pub headers: HeaderMap,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self { method: Method::GET, query: Vec::new(), body: None, headers: HeaderMap::new() }
    }
}

impl RequestOptions {
    #[must_use]
    pub fn get() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn post() -> Self {
        Self { method: Method::POST, ..Self::default() }
    }

    #[must_use]
    pub fn put() -> Self {
        Self { method: Method::PUT, ..Self::default() }
    }

    #[must_use]
    pub fn delete() -> Self {
        Self { method: Method::DELETE, ..Self::default() }
    }

    #[must_use]
    pub fn query(mut self, query: QueryPairs) -> Self {
        self.query = query;
        self
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// A successful response before JSON decoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl RawResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The normalized error for a non-2xx response.
    #[must_use]
    pub fn into_failure(self) -> RequestError {
        RequestError::http(self.status, failure_message(self.status, &self.body))
    }

    #[must_use]
    pub fn is_json(&self) -> bool {
        self.content_type.as_deref().is_some_and(|ct| ct.starts_with(JSON_CONTENT_TYPE))
    }

    /// Decode the body as JSON; an empty body decodes as `null`.
    ///
    /// # Errors
    ///
    /// Returns a `RequestError` carrying the status if the body is not JSON.
    pub fn into_json(self) -> Result<Value, RequestError> {
        parse_success_body(self.status, &self.body)
    }
}

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    credential: Option<String>,
}

impl ApiClient {
    /// Build a client without a credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, RequestError> {
        let mut builder =
            reqwest::Client::builder().connect_timeout(Duration::from_secs(config.timeouts.connect_secs));
        if let Some(secs) = config.timeouts.request_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| RequestError { status: None, message: format!("HTTP client build failed: {e}") })?;

        Ok(Self { http, base_url: config.api_base_url.trim_end_matches('/').to_owned(), credential: None })
    }

    /// Build a client carrying the credential of `session`, if it has one.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn for_session(config: &ClientConfig, session: &Session) -> Result<Self, RequestError> {
        Ok(Self::new(config)?.with_credential(session.credential().map(str::to_owned)))
    }

    #[must_use]
    pub fn with_credential(mut self, credential: Option<String>) -> Self {
        self.credential = credential.filter(|t| !t.is_empty());
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    #[must_use]
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    #[must_use]
    pub fn admin(&self) -> AdminApi<'_> {
        AdminApi::new(self)
    }

    #[must_use]
    pub fn doctor(&self) -> DoctorApi<'_> {
        DoctorApi::new(self)
    }

    #[must_use]
    pub fn patient(&self) -> PatientApi<'_> {
        PatientApi::new(self)
    }

    /// Perform a request and decode its JSON body.
    ///
    /// # Errors
    ///
    /// Returns a `RequestError` for transport failures, non-2xx statuses, or
    /// a success body that is not JSON.
    pub async fn request(&self, endpoint: &str, options: RequestOptions) -> Result<Value, RequestError> {
        self.request_raw(endpoint, options).await?.into_json()
    }

    /// Perform a request and return the successful body undecoded.
    ///
    /// # Errors
    ///
    /// Returns a `RequestError` for transport failures or non-2xx statuses.
    pub async fn request_raw(&self, endpoint: &str, options: RequestOptions) -> Result<RawResponse, RequestError> {
        let (request_id, raw) = self.send(endpoint, options).await?;
        if !raw.is_success() {
            let err = raw.into_failure();
            tracing::info!(%request_id, endpoint, status = ?err.status, message = %err.message, "request rejected");
            return Err(err);
        }
        Ok(raw)
    }

    /// Perform a request and return the response whatever its status.
    ///
    /// Only transport failures are errors here; callers that understand a
    /// non-2xx body decode it themselves and hand the rest to `into_failure`.
    pub(crate) async fn send(&self, endpoint: &str, options: RequestOptions) -> Result<(Uuid, RawResponse), RequestError> {
        let request_id = Uuid::new_v4();
        let url = endpoint_url(&self.base_url, endpoint);
        let method = options.method.clone();

        let headers = self.build_headers(&options.headers, request_id)?;
        let mut request = self.http.request(options.method, &url).headers(headers);
        if !options.query.is_empty() {
            request = request.query(&options.query);
        }
        if let Some(body) = &options.body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(%request_id, %method, %url, error = %e, "request failed without response");
                return Err(RequestError::network(e));
            }
        };

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await.map_err(RequestError::network)?;

        tracing::debug!(%request_id, %method, %url, status, "response received");
        Ok((request_id, RawResponse { status, content_type, body }))
    }

    fn build_headers(&self, extra: &HeaderMap, request_id: Uuid) -> Result<HeaderMap, RequestError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        for (name, value) in extra {
            headers.insert(name.clone(), value.clone());
        }
        let id = HeaderValue::from_str(&request_id.to_string())
            .map_err(|e| RequestError { status: None, message: format!("invalid request id header: {e}") })?;
        headers.insert(REQUEST_ID_HEADER, id);

        if let Some(token) = &self.credential {
            let value = HeaderValue::from_str(&bearer(token))
                .map_err(|_| RequestError { status: None, message: "credential is not a valid header value".to_owned() })?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn endpoint_url(base_url: &str, endpoint: &str) -> String {
    if endpoint.starts_with('/') {
        format!("{base_url}{endpoint}")
    } else {
        format!("{base_url}/{endpoint}")
    }
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

fn generic_failure_message(status: u16) -> String {
    format!("Request failed with status {status}")
}

/// Message for a non-2xx response: the body's `message` field if it has one.
fn failure_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .as_ref()
        .and_then(|v| v.get("message"))
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .map_or_else(|| generic_failure_message(status), str::to_owned)
}

fn parse_success_body(status: u16, body: &str) -> Result<Value, RequestError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| RequestError::http(status, format!("invalid JSON in response: {e}")))
}
