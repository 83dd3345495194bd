//! In-app routing surface and the navigation guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! `routes` describes which paths exist and which role owns them; `guard`
//! decides, for a session snapshot and a target path, whether navigation
//! proceeds or is redirected.

pub mod guard;
pub mod routes;

pub use guard::{Decision, GuardError, Navigation, evaluate, resolve};
pub use routes::{RouteAccess, RouteDescriptor};
