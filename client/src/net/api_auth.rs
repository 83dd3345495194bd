//! `/auth` endpoints: login, registration, current user.

use serde_json::Value;

use super::api::{ApiClient, RequestOptions};
use super::types::{LoginRequest, LoginResponse, RequestError};

pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for an access token via `POST /auth/login`.
    ///
    /// The caller is responsible for storing the returned token and role in
    /// its session context.
    ///
    /// # Errors
    ///
    /// Returns a `RequestError` if the request fails or the response lacks a token.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, RequestError> {
        let body = serde_json::to_value(LoginRequest { username, password })
            .map_err(|e| RequestError { status: None, message: e.to_string() })?;
        let value = self.client.request("/auth/login", RequestOptions::post().json(body)).await?;
        serde_json::from_value(value)
            .map_err(|e| RequestError::http(200, format!("unexpected login response: {e}")))
    }

    /// Create an account via `POST /auth/register`.
    ///
    /// # Errors
    ///
    /// Returns a `RequestError` if the request fails.
    pub async fn register(&self, payload: Value) -> Result<Value, RequestError> {
        self.client.request("/auth/register", RequestOptions::post().json(payload)).await
    }

    /// Fetch the signed-in user's profile via `GET /auth/me`.
    ///
    /// # Errors
    ///
    /// Returns a `RequestError` if the request fails.
    pub async fn me(&self) -> Result<Value, RequestError> {
        self.client.request("/auth/me", RequestOptions::get()).await
    }
}
