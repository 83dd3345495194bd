use super::*;

/// # Safety
/// Tests touching these variables must not run concurrently with each other;
/// they are combined into a single test for that reason.
unsafe fn clear_clinic_env() {
    unsafe {
        std::env::remove_var("CLINIC_API_BASE_URL");
        std::env::remove_var("CLINIC_SESSION_FILE");
        std::env::remove_var("CLINIC_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("CLINIC_CONNECT_TIMEOUT_SECS");
    }
}

#[test]
fn from_env_defaults_and_overrides() {
    unsafe { clear_clinic_env() };

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
    assert_eq!(cfg.timeouts, Timeouts { request_secs: None, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS });

    unsafe {
        std::env::set_var("CLINIC_API_BASE_URL", "https://clinic.example/api/");
        std::env::set_var("CLINIC_SESSION_FILE", "/tmp/clinic-test-session.json");
        std::env::set_var("CLINIC_REQUEST_TIMEOUT_SECS", "30");
        std::env::set_var("CLINIC_CONNECT_TIMEOUT_SECS", "not-a-number");
    }

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg.api_base_url, "https://clinic.example/api");
    assert_eq!(cfg.session_file, PathBuf::from("/tmp/clinic-test-session.json"));
    assert_eq!(cfg.timeouts, Timeouts { request_secs: Some(30), connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS });

    unsafe { std::env::set_var("CLINIC_API_BASE_URL", "ftp://nope") };
    assert_eq!(ClientConfig::from_env(), Err(ConfigError::InvalidBaseUrl("ftp://nope".to_owned())));

    unsafe { clear_clinic_env() };
}

#[test]
fn normalize_base_url_accepts_http_and_https() {
    assert_eq!(normalize_base_url("http://localhost:5000/api/").unwrap(), "http://localhost:5000/api");
    assert_eq!(normalize_base_url(" https://h ").unwrap(), "https://h");
}

#[test]
fn normalize_base_url_rejects_other_values() {
    for raw in ["", "localhost:5000", "http://", "ws://h/api"] {
        assert!(normalize_base_url(raw).is_err(), "{raw:?}");
    }
}

#[test]
fn with_api_base_url_revalidates() {
    let cfg = ClientConfig {
        api_base_url: DEFAULT_API_BASE_URL.to_owned(),
        session_file: PathBuf::from("s.json"),
        timeouts: Timeouts::default(),
    };
    assert_eq!(cfg.clone().with_api_base_url("http://other/api/").unwrap().api_base_url, "http://other/api");
    assert!(cfg.with_api_base_url("other").is_err());
}
