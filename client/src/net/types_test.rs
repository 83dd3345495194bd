use super::*;

#[test]
fn default_filter_renders_no_query() {
    assert!(AppointmentFilter::default().to_query().is_empty());
}

#[test]
fn filter_renders_set_fields_in_order() {
    let filter = AppointmentFilter { status: Some(AppointmentStatus::Booked), upcoming: true, past: true };
    assert_eq!(
        filter.to_query(),
        vec![("status", "Booked".to_owned()), ("upcoming", "true".to_owned()), ("past", "true".to_owned())]
    );
}

#[test]
fn filter_to_query_does_not_mutate() {
    let filter = AppointmentFilter { status: None, upcoming: true, past: false };
    let first = filter.to_query();
    let second = filter.to_query();
    assert_eq!(first, second);
    assert_eq!(filter, AppointmentFilter { status: None, upcoming: true, past: false });
}

#[test]
fn appointment_status_parses_case_insensitively() {
    assert_eq!("booked".parse(), Ok(AppointmentStatus::Booked));
    assert_eq!("Completed".parse(), Ok(AppointmentStatus::Completed));
    assert_eq!("canceled".parse(), Ok(AppointmentStatus::Cancelled));
    assert!("pending".parse::<AppointmentStatus>().is_err());
}

#[test]
fn availability_range_skips_blank_dates() {
    let range = AvailabilityRange { start_date: Some("2025-01-01".to_owned()), end_date: Some("  ".to_owned()) };
    assert_eq!(range.to_query(), vec![("start_date", "2025-01-01".to_owned())]);
    assert!(AvailabilityRange::default().to_query().is_empty());
}

#[test]
fn search_query_only_when_non_empty() {
    assert_eq!(search_query(Some("smith")), vec![("search", "smith".to_owned())]);
    assert!(search_query(Some("")).is_empty());
    assert!(search_query(None).is_empty());
}

#[test]
fn login_response_exposes_known_role() {
    let resp: LoginResponse = serde_json::from_value(serde_json::json!({
        "message": "Login successful",
        "access_token": "jwt",
        "user": { "id": 3, "username": "drwho", "role": "doctor" }
    }))
    .unwrap();
    assert_eq!(resp.access_token, "jwt");
    assert_eq!(resp.role(), Some(Role::Doctor));
}

#[test]
fn login_response_unknown_role_is_none() {
    let resp: LoginResponse =
        serde_json::from_value(serde_json::json!({ "access_token": "jwt", "user": { "role": "janitor" } })).unwrap();
    assert_eq!(resp.role(), None);
}

#[test]
fn request_error_display_is_message() {
    let err = RequestError::http(404, "not found");
    assert_eq!(err.to_string(), "not found");
    assert_eq!(err.status, Some(404));
}

#[test]
fn network_error_has_no_status() {
    let err = RequestError::network("connection refused");
    assert_eq!(err.status, None);
    assert_eq!(err.message, "Network error occurred: connection refused");
    assert_eq!(RequestError::network("").message, "Network error occurred");
}

#[test]
fn unauthorized_covers_401_and_403() {
    assert!(RequestError::http(401, "x").is_unauthorized());
    assert!(RequestError::http(403, "x").is_unauthorized());
    assert!(!RequestError::http(404, "x").is_unauthorized());
    assert!(!RequestError::network("x").is_unauthorized());
}

#[test]
fn export_progress_deserializes_backend_shape() {
    let progress: ExportProgress =
        serde_json::from_str(r#"{"state":"PENDING","status":"Waiting to be processed..."}"#).unwrap();
    assert_eq!(progress.state, "PENDING");
    assert_eq!(progress.error, None);
    assert!(!ExportStatus::InProgress(progress).is_ready());
}
