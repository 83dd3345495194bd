//! Client-side state.
//!
//! SYSTEM CONTEXT
//! ==============
//! `storage` is the key/value persistence seam, `session` builds the
//! explicit session context on top of it. The guard and the API client only
//! ever see a `Session` snapshot handed to them.

pub mod session;
pub mod storage;
