//! Session context: the persisted credential and role of the current user.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session is read once at startup and then only at well-defined points
//! (login, logout, explicit refresh). The guard and the API client receive a
//! `&Session` snapshot instead of reaching into storage themselves.
//!
//! STORAGE SHAPE
//! =============
//! Canonical: key `session`, value `{"token": "...", "role": "doctor"}`.
//! Two older shapes are migrated on load and then removed:
//! - `auth_token` + `user_role` as separate keys
//! - `token` + `user`, where `user` is a JSON object with a `role` field
//!
//! Anything unparsable, an empty token, or an unknown role loads as an
//! unauthenticated session.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::storage::{Storage, StorageError};

pub const SESSION_KEY: &str = "session";
pub const LEGACY_TOKEN_KEY: &str = "auth_token";
pub const LEGACY_ROLE_KEY: &str = "user_role";
pub const LEGACY_BLOB_TOKEN_KEY: &str = "token";
pub const LEGACY_BLOB_USER_KEY: &str = "user";

const LEGACY_KEYS: [&str; 4] = [LEGACY_TOKEN_KEY, LEGACY_ROLE_KEY, LEGACY_BLOB_TOKEN_KEY, LEGACY_BLOB_USER_KEY];

// =============================================================================
// ROLE
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Doctor,
    Patient,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Doctor, Role::Patient];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Doctor => "doctor",
            Self::Patient => "patient",
        }
    }

    /// Landing page for this role.
    #[must_use]
    pub fn dashboard_path(self) -> &'static str {
        match self {
            Self::Admin => "/admin/dashboard",
            Self::Doctor => "/doctor/dashboard",
            Self::Patient => "/patient/dashboard",
        }
    }

    /// Role owning a top-level path segment, e.g. `"doctor"` in `/doctor/history`.
    #[must_use]
    pub fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.as_str() == segment)
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::from_segment(raw.trim()).ok_or_else(|| UnknownRole(raw.to_owned()))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// Snapshot of the persisted session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub role: Option<Role>,
}

impl Session {
    #[must_use]
    pub fn new(token: impl Into<String>, role: Role) -> Self {
        Self { token: Some(token.into()), role: Some(role) }
    }

    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Credential to send as a bearer token, if any.
    #[must_use]
    pub fn credential(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    /// The role, but only when a credential is also present.
    #[must_use]
    pub fn authenticated_role(&self) -> Option<Role> {
        self.credential().and(self.role)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated_role().is_some()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    token: String,
    role: String,
}

#[derive(Debug, Deserialize)]
struct LegacyUser {
    role: Option<String>,
}

fn parse_role(raw: &str) -> Option<Role> {
    match raw.parse() {
        Ok(role) => Some(role),
        Err(e) => {
            tracing::warn!(error = %e, "persisted session has unrecognized role; treating as signed out");
            None
        }
    }
}

fn session_from_parts(token: String, role: Option<&str>) -> Session {
    let token = Some(token).filter(|t| !t.is_empty());
    let role = role.and_then(parse_role);
    Session { token, role }
}

fn read_canonical(raw: &str) -> Session {
    match serde_json::from_str::<StoredSession>(raw) {
        Ok(stored) => session_from_parts(stored.token, Some(&stored.role)),
        Err(e) => {
            tracing::warn!(error = %e, "persisted session is malformed; treating as signed out");
            Session::anonymous()
        }
    }
}

fn read_legacy<S: Storage>(storage: &S) -> Option<Session> {
    if let Some(token) = storage.get_item(LEGACY_TOKEN_KEY) {
        let role = storage.get_item(LEGACY_ROLE_KEY);
        return Some(session_from_parts(token, role.as_deref()));
    }

    let token = storage.get_item(LEGACY_BLOB_TOKEN_KEY)?;
    let role = storage
        .get_item(LEGACY_BLOB_USER_KEY)
        .and_then(|raw| serde_json::from_str::<LegacyUser>(&raw).ok())
        .and_then(|user| user.role);
    Some(session_from_parts(token, role.as_deref()))
}

fn write_canonical<S: Storage>(storage: &mut S, token: &str, role: Role) -> Result<(), StorageError> {
    let stored = StoredSession { token: token.to_owned(), role: role.as_str().to_owned() };
    storage.set_item(SESSION_KEY, &serde_json::to_string(&stored)?)
}

fn clear_legacy<S: Storage>(storage: &mut S) -> Result<(), StorageError> {
    for key in LEGACY_KEYS {
        storage.remove_item(key)?;
    }
    Ok(())
}

/// Read the session from storage, migrating a legacy shape if one is found.
///
/// Migration failures are logged; the loaded session is still returned.
pub fn load_session<S: Storage>(storage: &mut S) -> Session {
    if let Some(raw) = storage.get_item(SESSION_KEY) {
        return read_canonical(&raw);
    }

    let Some(session) = read_legacy(storage) else {
        return Session::anonymous();
    };

    let migrated = match (session.credential(), session.authenticated_role()) {
        (Some(token), Some(role)) => write_canonical(storage, token, role).and_then(|()| clear_legacy(storage)),
        _ => clear_legacy(storage),
    };
    match migrated {
        Ok(()) => tracing::info!(authenticated = session.is_authenticated(), "migrated legacy session record"),
        Err(e) => tracing::warn!(error = %e, "legacy session migration failed"),
    }

    session
}

// =============================================================================
// CONTEXT
// =============================================================================

/// Owner of the storage backend and the current session snapshot.
pub struct SessionContext<S> {
    storage: S,
    current: Session,
}

impl<S: Storage> SessionContext<S> {
    /// Load the session at application start.
    #[must_use]
    pub fn init(mut storage: S) -> Self {
        let current = load_session(&mut storage);
        Self { storage, current }
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.current
    }

    /// Re-read storage, picking up writes made by another process.
    pub fn refresh(&mut self) -> &Session {
        self.current = load_session(&mut self.storage);
        &self.current
    }

    /// Persist a freshly issued credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub fn login(&mut self, token: &str, role: Role) -> Result<&Session, StorageError> {
        write_canonical(&mut self.storage, token, role)?;
        clear_legacy(&mut self.storage)?;
        tracing::info!(%role, "session stored");
        Ok(self.refresh())
    }

    /// Drop the stored credential in every known shape.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be rewritten.
    pub fn logout(&mut self) -> Result<(), StorageError> {
        self.storage.remove_item(SESSION_KEY)?;
        clear_legacy(&mut self.storage)?;
        self.current = Session::anonymous();
        tracing::info!("session cleared");
        Ok(())
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }
}
