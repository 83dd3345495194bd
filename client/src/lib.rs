//! # clinic-client
//!
//! Native client for the clinic appointment REST API.
//!
//! This crate contains the session context (persisted credential and role),
//! the navigation guard that enforces authentication and role-based access
//! before a view is opened, and the typed HTTP client used by those views.
//! The `clinic-cli` binary wires them together as the application shell.

pub mod config;
pub mod net;
pub mod router;
pub mod state;
