//! Tests for domain error construction and serialisation.

use super::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case(Error::validation("bad"), ErrorCode::ValidationError, "validation_error")]
#[case(Error::not_found("gone"), ErrorCode::NotFound, "not_found_error")]
#[case(Error::unauthorized("who"), ErrorCode::Unauthorized, "unauthorized_error")]
#[case(Error::forbidden("no"), ErrorCode::Forbidden, "forbidden_error")]
#[case(Error::conflict("dup"), ErrorCode::Conflict, "conflict_error")]
#[case(Error::rate_limited("slow"), ErrorCode::RateLimited, "rate_limited")]
#[case(Error::internal("boom"), ErrorCode::InternalError, "internal_error")]
fn constructors_set_stable_tags(
    #[case] error: Error,
    #[case] code: ErrorCode,
    #[case] tag: &str,
) {
    assert_eq!(error.code(), code);
    assert_eq!(code.as_str(), tag);
    let value = serde_json::to_value(&error).expect("serialise error");
    assert_eq!(value.get("code"), Some(&json!(tag)));
}

#[rstest]
fn not_found_resource_formats_message() {
    let error = Error::not_found_resource("client");
    assert_eq!(error.message(), "client not found");
}

#[rstest]
fn serialisation_omits_empty_optionals() {
    let value = serde_json::to_value(Error::forbidden("forbidden access")).expect("serialise");
    assert_eq!(
        value,
        json!({"code": "forbidden_error", "message": "forbidden access"})
    );
}

#[rstest]
fn details_and_trace_id_serialise_camel_case() {
    let error = Error::validation("bad")
        .with_trace_id("abc")
        .with_details(json!({"field": "email"}));
    let value = serde_json::to_value(&error).expect("serialise");
    assert_eq!(value.get("traceId"), Some(&json!("abc")));
    assert_eq!(value.get("details"), Some(&json!({"field": "email"})));
}

#[rstest]
fn new_returns_none_when_trace_id_out_of_scope() {
    assert!(Error::internal("boom").trace_id().is_none());
}

#[tokio::test]
async fn new_captures_trace_id_in_scope() {
    let trace_id: TraceId = "00000000-0000-0000-0000-000000000000"
        .parse()
        .expect("valid UUID");
    let error = TraceId::scope(trace_id, async { Error::internal("boom") }).await;
    assert_eq!(error.trace_id(), Some(trace_id.to_string().as_str()));
}

#[rstest]
fn display_includes_code_and_message() {
    assert_eq!(
        Error::conflict("email already exists").to_string(),
        "conflict_error: email already exists"
    );
}
