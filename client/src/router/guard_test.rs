use super::*;
use crate::router::routes::{PUBLIC_PATHS, routes};
use crate::state::session::Role;

const PROTECTED: [&str; 8] = [
    "/admin/dashboard",
    "/admin/doctors",
    "/doctor/history",
    "/patient/profile",
    "/patient",
    "/admin/unknown/deep",
    "/settings",
    "/administrator",
];

fn sessions() -> Vec<Session> {
    Role::ALL.into_iter().map(|role| Session::new("t", role)).collect()
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn doctor_visiting_admin_page_goes_to_doctor_dashboard() {
    let session = Session::new("t", Role::Doctor);
    assert_eq!(evaluate(&session, "/admin/doctors"), Decision::Redirect("/doctor/dashboard"));
}

#[test]
fn signed_out_visiting_patient_profile_goes_to_login() {
    assert_eq!(evaluate(&Session::anonymous(), "/patient/profile"), Decision::Redirect("/login"));
}

#[test]
fn patient_visiting_home_goes_to_patient_dashboard() {
    let session = Session::new("t", Role::Patient);
    assert_eq!(evaluate(&session, "/"), Decision::Redirect("/patient/dashboard"));
}

#[test]
fn patient_cannot_climb_into_admin_with_dot_segments() {
    let session = Session::new("t", Role::Patient);
    for path in ["/patient/../admin/doctors", "/patient/./../admin", "/patient/%2e%2e/admin/doctors"] {
        assert_eq!(evaluate(&session, path), Decision::Redirect("/patient/dashboard"), "{path}");
    }

    let nav = resolve(&session, "/patient/../admin/doctors").unwrap();
    assert_eq!(nav.path, "/patient/dashboard");
    assert_eq!(nav.redirects, vec!["/patient/dashboard"]);
}

#[test]
fn dot_segments_within_own_prefix_settle_on_resolved_path() {
    let session = Session::new("t", Role::Doctor);
    let nav = resolve(&session, "/doctor/./dashboard/../history").unwrap();
    assert_eq!(nav.path, "/doctor/history");
    assert!(!nav.was_redirected());
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn signed_out_always_redirected_to_login_from_protected_paths() {
    for path in PROTECTED {
        assert_eq!(evaluate(&Session::anonymous(), path), Decision::Redirect("/login"), "{path}");
    }
}

#[test]
fn signed_out_may_open_public_paths() {
    for path in PUBLIC_PATHS {
        assert_eq!(evaluate(&Session::anonymous(), path), Decision::Allow, "{path}");
    }
}

#[test]
fn signed_in_public_paths_go_to_own_dashboard() {
    for session in sessions() {
        let role = session.role.unwrap();
        for path in PUBLIC_PATHS {
            assert_eq!(evaluate(&session, path), Decision::Redirect(role.dashboard_path()), "{role} {path}");
        }
    }
}

#[test]
fn cross_role_paths_go_to_own_dashboard() {
    for session in sessions() {
        let role = session.role.unwrap();
        for route in routes() {
            match route.required_role {
                Some(owner) if owner != role => {
                    assert_eq!(evaluate(&session, route.path), Decision::Redirect(role.dashboard_path()));
                }
                Some(_) => assert_eq!(evaluate(&session, route.path), Decision::Allow, "{}", route.path),
                None => {}
            }
        }
    }
}

#[test]
fn own_role_subtree_is_allowed() {
    let session = Session::new("t", Role::Admin);
    assert_eq!(evaluate(&session, "/admin"), Decision::Allow);
    assert_eq!(evaluate(&session, "/admin/doctors?search=x"), Decision::Allow);
    assert_eq!(evaluate(&session, "/admin/reports"), Decision::Allow);
}

#[test]
fn unscoped_paths_fail_closed_for_signed_in_sessions() {
    for session in sessions() {
        let role = session.role.unwrap();
        for path in ["/settings", "/administrator", "/doctors"] {
            assert_eq!(evaluate(&session, path), Decision::Redirect(role.dashboard_path()), "{path}");
        }
    }
}

#[test]
fn token_with_unknown_role_is_treated_as_signed_out() {
    let session = Session { token: Some("t".to_owned()), role: None };
    assert_eq!(evaluate(&session, "/admin/dashboard"), Decision::Redirect("/login"));
    assert_eq!(evaluate(&session, "/login"), Decision::Allow);
}

#[test]
fn role_without_token_is_treated_as_signed_out() {
    let session = Session { token: None, role: Some(Role::Admin) };
    assert_eq!(evaluate(&session, "/admin/dashboard"), Decision::Redirect("/login"));
}

#[test]
fn evaluation_is_idempotent() {
    let mut all = sessions();
    all.push(Session::anonymous());
    let paths = PUBLIC_PATHS.iter().chain(PROTECTED.iter());
    for session in &all {
        for path in paths.clone() {
            assert_eq!(evaluate(session, path), evaluate(session, path));
        }
    }
}

// =============================================================================
// resolve
// =============================================================================

#[test]
fn resolve_allowed_target_has_no_redirects() {
    let session = Session::new("t", Role::Patient);
    let nav = resolve(&session, "/patient/history/").unwrap();
    assert_eq!(nav.path, "/patient/history");
    assert_eq!(nav.requested, "/patient/history/");
    assert!(!nav.was_redirected());
}

#[test]
fn resolve_follows_single_redirect() {
    let session = Session::new("t", Role::Doctor);
    let nav = resolve(&session, "/admin/doctors").unwrap();
    assert_eq!(nav.path, "/doctor/dashboard");
    assert_eq!(nav.redirects, vec!["/doctor/dashboard"]);
}

#[test]
fn resolve_always_settles() {
    let mut all = sessions();
    all.push(Session::anonymous());
    all.push(Session { token: Some("t".to_owned()), role: None });
    for session in &all {
        for path in PUBLIC_PATHS.iter().chain(PROTECTED.iter()) {
            let nav = resolve(session, path).unwrap();
            assert!(nav.redirects.len() <= 1, "{path}");
            assert_eq!(evaluate(session, &nav.path), Decision::Allow);
        }
    }
}
