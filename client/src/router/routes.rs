//! Route table and path classification.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use crate::state::session::Role;

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";

pub const PUBLIC_PATHS: [&str; 3] = [HOME_PATH, LOGIN_PATH, REGISTER_PATH];

/// A navigable view and the role it requires, if any.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub path: &'static str,
    pub name: &'static str,
    pub required_role: Option<Role>,
}

const fn public(path: &'static str, name: &'static str) -> RouteDescriptor {
    RouteDescriptor { path, name, required_role: None }
}

const fn scoped(role: Role, path: &'static str, name: &'static str) -> RouteDescriptor {
    RouteDescriptor { path, name, required_role: Some(role) }
}

static ROUTES: [RouteDescriptor; 12] = [
    public(HOME_PATH, "Home"),
    public(LOGIN_PATH, "Login"),
    public(REGISTER_PATH, "Register"),
    scoped(Role::Admin, "/admin/dashboard", "AdminDashboard"),
    scoped(Role::Admin, "/admin/doctors", "AdminDoctors"),
    scoped(Role::Admin, "/admin/patients", "AdminPatients"),
    scoped(Role::Admin, "/admin/appointments", "AdminAppointments"),
    scoped(Role::Doctor, "/doctor/dashboard", "DoctorDashboard"),
    scoped(Role::Doctor, "/doctor/history", "DoctorHistory"),
    scoped(Role::Patient, "/patient/dashboard", "PatientDashboard"),
    scoped(Role::Patient, "/patient/history", "PatientHistory"),
    scoped(Role::Patient, "/patient/profile", "PatientProfile"),
];

/// Who may open a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteAccess {
    Public,
    /// Top-level segment names a role.
    Role(Role),
    /// Neither public nor under a role prefix.
    Unscoped,
}

#[must_use]
pub fn routes() -> &'static [RouteDescriptor] {
    &ROUTES
}

/// Canonical form of a navigation target.
///
/// Drops query string and fragment, collapses empty segments, resolves `.`
/// and `..` the way a URL parser would, and always yields a leading slash
/// with no trailing slash (except for `/` itself).
#[must_use]
pub fn normalize(target: &str) -> String {
    let end = target.find(['?', '#']).unwrap_or(target.len());
    let mut segments: Vec<&str> = Vec::new();
    for segment in target[..end].split('/') {
        if segment.is_empty() || is_single_dot(segment) {
            continue;
        }
        if is_double_dot(segment) {
            segments.pop();
            continue;
        }
        segments.push(segment);
    }
    format!("/{}", segments.join("/"))
}

// `%2e` decodes to `.` and URL parsers treat it as one.
fn is_single_dot(segment: &str) -> bool {
    segment == "." || segment.eq_ignore_ascii_case("%2e")
}

fn is_double_dot(segment: &str) -> bool {
    let lower = segment.to_ascii_lowercase();
    matches!(lower.as_str(), ".." | ".%2e" | "%2e." | "%2e%2e")
}

#[must_use]
pub fn find(target: &str) -> Option<&'static RouteDescriptor> {
    let path = normalize(target);
    ROUTES.iter().find(|route| route.path == path)
}

#[must_use]
pub fn classify(target: &str) -> RouteAccess {
    let path = normalize(target);
    if PUBLIC_PATHS.contains(&path.as_str()) {
        return RouteAccess::Public;
    }
    let first = path.trim_start_matches('/').split('/').next().unwrap_or_default();
    match Role::from_segment(first) {
        Some(role) => RouteAccess::Role(role),
        None => RouteAccess::Unscoped,
    }
}
