use super::*;
use crate::config::{ClientConfig, Timeouts};
use crate::state::session::Role;

fn config() -> ClientConfig {
    ClientConfig {
        api_base_url: "http://clinic.test/api/".to_owned(),
        session_file: "session.json".into(),
        timeouts: Timeouts::default(),
    }
}

#[test]
fn failure_message_prefers_body_message() {
    assert_eq!(failure_message(404, r#"{"message":"not found"}"#), "not found");
}

#[test]
fn failure_message_falls_back_to_status() {
    assert_eq!(failure_message(500, ""), "Request failed with status 500");
    assert_eq!(failure_message(502, "<html>bad gateway</html>"), "Request failed with status 502");
    assert_eq!(failure_message(400, r#"{"error":"x"}"#), "Request failed with status 400");
    assert_eq!(failure_message(400, r#"{"message":""}"#), "Request failed with status 400");
    assert_eq!(failure_message(400, r#"{"message":42}"#), "Request failed with status 400");
}

#[test]
fn parse_success_body_handles_empty_and_json() {
    assert_eq!(parse_success_body(204, "").unwrap(), Value::Null);
    assert_eq!(parse_success_body(200, r#"{"a":1}"#).unwrap(), serde_json::json!({"a": 1}));
}

#[test]
fn parse_success_body_rejects_non_json() {
    let err = parse_success_body(200, "id,date\n1,2024-01-01").unwrap_err();
    assert_eq!(err.status, Some(200));
    assert!(err.message.starts_with("invalid JSON in response"));
}

#[test]
fn endpoint_url_joins_with_single_slash() {
    assert_eq!(endpoint_url("http://h/api", "/auth/me"), "http://h/api/auth/me");
    assert_eq!(endpoint_url("http://h/api", "auth/me"), "http://h/api/auth/me");
}

#[test]
fn client_trims_trailing_slash_from_base_url() {
    let client = ApiClient::new(&config()).unwrap();
    assert_eq!(client.base_url(), "http://clinic.test/api");
    assert!(!client.has_credential());
}

#[test]
fn client_for_session_carries_credential() {
    let client = ApiClient::for_session(&config(), &Session::new("tok", Role::Admin)).unwrap();
    assert!(client.has_credential());

    let anonymous = ApiClient::for_session(&config(), &Session::anonymous()).unwrap();
    assert!(!anonymous.has_credential());
}

#[test]
fn headers_include_json_content_type_and_bearer() {
    let client = ApiClient::new(&config()).unwrap().with_credential(Some("tok".to_owned()));
    let headers = client.build_headers(&HeaderMap::new(), Uuid::new_v4()).unwrap();

    assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer tok");
    assert!(headers.get(REQUEST_ID_HEADER).is_some());
}

#[test]
fn headers_omit_authorization_without_credential() {
    let client = ApiClient::new(&config()).unwrap().with_credential(Some(String::new()));
    let headers = client.build_headers(&HeaderMap::new(), Uuid::new_v4()).unwrap();
    assert!(headers.get(AUTHORIZATION).is_none());
}

#[test]
fn caller_headers_override_content_type_but_not_credential() {
    let client = ApiClient::new(&config()).unwrap().with_credential(Some("tok".to_owned()));
    let mut extra = HeaderMap::new();
    extra.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    extra.insert(AUTHORIZATION, HeaderValue::from_static("Bearer spoofed"));

    let headers = client.build_headers(&extra, Uuid::new_v4()).unwrap();
    assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "text/plain");
    assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer tok");
}

#[test]
fn raw_response_detects_json_content_type() {
    let raw = RawResponse {
        status: 200,
        content_type: Some("application/json; charset=utf-8".to_owned()),
        body: "{}".to_owned(),
    };
    assert!(raw.is_json());

    let csv = RawResponse { status: 200, content_type: Some("text/csv".to_owned()), body: String::new() };
    assert!(!csv.is_json());
}
