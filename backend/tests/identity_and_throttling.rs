//! Registration, login, password changes, throttling and probes over the full
//! HTTP stack.

mod support;

use actix_web::http::{Method, StatusCode, header};
use actix_web::test as actix_test;
use logistics_api::domain::RateLimitPolicy;
use rstest::rstest;
use serde_json::{Value, json};

use support::{bearer, init_app, register, relaxed_policy};

fn login(email: &str, password: &str) -> actix_http::Request {
    actix_test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request()
}

#[rstest]
#[actix_web::test]
async fn registered_user_can_log_in() {
    let app = init_app(relaxed_policy()).await;
    register(&app, "Ada@Example.com", "client").await;

    let response = actix_test::call_service(&app, login("ada@example.com", "secret1")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert_eq!(body["tokenType"], "Bearer");
}

#[rstest]
#[case("secret1", "admin")]
#[case("abc", "client")]
#[actix_web::test]
async fn duplicate_registration_conflicts(#[case] password: &str, #[case] role: &str) {
    let app = init_app(relaxed_policy()).await;
    register(&app, "ada@example.com", "client").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({ "email": "ADA@example.com", "password": password, "role": role }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "conflict_error");
}

#[rstest]
#[case("ghost@example.com", "secret1")]
#[case("ada@example.com", "wrong-password")]
#[actix_web::test]
async fn login_failures_are_indistinguishable(#[case] email: &str, #[case] password: &str) {
    let app = init_app(relaxed_policy()).await;
    register(&app, "ada@example.com", "client").await;

    let response = actix_test::call_service(&app, login(email, password)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["message"], "invalid credentials");
}

#[rstest]
#[actix_web::test]
async fn password_change_rotates_credentials() {
    let app = init_app(relaxed_policy()).await;
    let token = register(&app, "ada@example.com", "client").await;

    let changed = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/auth/password")
            .insert_header(bearer(&token))
            .set_json(json!({ "currentPassword": "secret1", "newPassword": "secret2" }))
            .to_request(),
    )
    .await;
    assert_eq!(changed.status(), StatusCode::OK);

    let old = actix_test::call_service(&app, login("ada@example.com", "secret1")).await;
    let new = actix_test::call_service(&app, login("ada@example.com", "secret2")).await;
    assert_eq!(old.status(), StatusCode::BAD_REQUEST);
    assert_eq!(new.status(), StatusCode::OK);
}

#[rstest]
#[case(None, "authorization header required")]
#[case(Some("Bearer not.a.jwt"), "invalid token")]
#[case(Some("Token abc"), "invalid authorization header format")]
#[actix_web::test]
async fn protected_routes_reject_bad_credentials(
    #[case] header: Option<&str>,
    #[case] message: &str,
) {
    let app = init_app(relaxed_policy()).await;
    let mut request = actix_test::TestRequest::get().uri("/api/v1/orders");
    if let Some(value) = header {
        request = request.insert_header(("authorization", value));
    }

    let response = actix_test::call_service(&app, request.to_request()).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "unauthorized_error");
    assert_eq!(body["message"], message);
}

#[rstest]
#[actix_web::test]
async fn burst_exhaustion_returns_too_many_requests() {
    let app = init_app(RateLimitPolicy::new(3, 0.001).expect("valid policy")).await;

    let mut statuses = Vec::new();
    for _ in 0..4 {
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/health/live").to_request(),
        )
        .await;
        statuses.push(response.status());
    }

    assert_eq!(
        statuses,
        vec![
            StatusCode::OK,
            StatusCode::OK,
            StatusCode::OK,
            StatusCode::TOO_MANY_REQUESTS
        ]
    );
}

#[rstest]
#[actix_web::test]
async fn unknown_routes_use_error_payload() {
    let app = init_app(relaxed_policy()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/parcels").to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().contains_key("trace-id"));
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "not_found_error");
}

#[rstest]
#[case("/health/ready")]
#[case("/health/live")]
#[case("/health")]
#[actix_web::test]
async fn health_endpoints_report_in_memory_store(#[case] uri: &str) {
    let app = init_app(relaxed_policy()).await;

    let response =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
            .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn browsers_may_preflight_protected_routes() {
    let app = init_app(RateLimitPolicy::new(1, 0.001).expect("valid policy")).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/api/v1/orders")
            .insert_header((header::ORIGIN, "https://ops.example.com"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "PUT"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization"))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("trace-id"));
    for name in [
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        header::ACCESS_CONTROL_ALLOW_METHODS,
        header::ACCESS_CONTROL_ALLOW_HEADERS,
    ] {
        assert!(response.headers().contains_key(&name), "missing {name}");
    }

    let follow_up = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/health/live").to_request(),
    )
    .await;
    assert_eq!(follow_up.status(), StatusCode::OK);
}
