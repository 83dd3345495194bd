//! Navigation guard.
//!
//! DESIGN
//! ======
//! `evaluate` is a pure function of the session snapshot and the target
//! path, so evaluating the same pair twice always yields the same decision.
//!
//! Policy, in order:
//! 1. signed out + non-public target  -> `/login`
//! 2. signed in + public target       -> own dashboard
//! 3. signed in + other role's prefix -> own dashboard
//! 4. signed in + own role's prefix   -> allow
//! 5. signed in + anything else       -> own dashboard
//! 6. signed out + public target      -> allow
//!
//! A session with a token but no recognized role counts as signed out.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use super::routes::{self, LOGIN_PATH, RouteAccess};
use crate::state::session::Session;

const MAX_REDIRECTS: usize = 4;

/// Outcome of a single guard evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuardError {
    #[error("navigation to {requested} did not settle after {hops} redirects")]
    RedirectLoop { requested: String, hops: usize },
}

/// A navigation after all guard redirects have been followed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Navigation {
    pub requested: String,
    pub path: String,
    pub redirects: Vec<&'static str>,
}

impl Navigation {
    #[must_use]
    pub fn was_redirected(&self) -> bool {
        !self.redirects.is_empty()
    }
}

#[must_use]
pub fn evaluate(session: &Session, target: &str) -> Decision {
    let access = routes::classify(target);

    let decision = match (session.authenticated_role(), access) {
        (None, RouteAccess::Public) => Decision::Allow,
        (None, _) => Decision::Redirect(LOGIN_PATH),
        (Some(role), RouteAccess::Role(owner)) if owner == role => Decision::Allow,
        (Some(role), _) => Decision::Redirect(role.dashboard_path()),
    };

    tracing::debug!(
        target_path = target,
        role = ?session.authenticated_role(),
        ?access,
        ?decision,
        "guard evaluated"
    );
    decision
}

/// Follow guard redirects from `target` until navigation is allowed.
///
/// # Errors
///
/// Returns `GuardError::RedirectLoop` if the chain does not settle.
pub fn resolve(session: &Session, target: &str) -> Result<Navigation, GuardError> {
    let mut path = routes::normalize(target);
    let mut redirects = Vec::new();

    loop {
        match evaluate(session, &path) {
            Decision::Allow => {
                return Ok(Navigation { requested: target.to_owned(), path, redirects });
            }
            Decision::Redirect(next) => {
                if redirects.len() == MAX_REDIRECTS {
                    return Err(GuardError::RedirectLoop { requested: target.to_owned(), hops: MAX_REDIRECTS });
                }
                redirects.push(next);
                next.clone_into(&mut path);
            }
        }
    }
}
