use super::*;

#[derive(Debug)]
struct Flaky;

impl std::fmt::Display for Flaky {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("upstream hiccup")
    }
}

impl ErrorCode for Flaky {
    fn error_code(&self) -> &'static str {
        "E_FLAKY"
    }

    fn retryable(&self) -> bool {
        true
    }
}

#[derive(Debug)]
struct Plain;

impl std::fmt::Display for Plain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("nope")
    }
}

impl ErrorCode for Plain {
    fn error_code(&self) -> &'static str {
        "E_PLAIN"
    }
}

#[test]
fn error_body_carries_code_message_and_retryable() {
    let body = ErrorBody::from_error(&Flaky);
    assert_eq!(body, ErrorBody { code: "E_FLAKY", message: "upstream hiccup".into(), retryable: true });
}

#[test]
fn retryable_defaults_to_false() {
    let body = ErrorBody::from_error(&Plain);
    assert!(!body.retryable);
}

#[test]
fn error_body_serializes_flat() {
    let json = serde_json::to_value(ErrorBody::from_error(&Plain)).unwrap();
    assert_eq!(json, serde_json::json!({ "code": "E_PLAIN", "message": "nope", "retryable": false }));
}
