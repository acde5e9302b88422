//! Tests for order HTTP handlers.

use super::*;
use crate::domain::ports::UserPayload;
use crate::domain::{Email, Role, UserId};
use crate::inbound::http::authorization::RequireAuth;
use crate::inbound::http::error::{json_config, query_config};
use crate::inbound::http::test_utils::{
    ADMIN_TOKEN, CLIENT_TOKEN, MockPorts, admin, bearer, client,
};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use chrono::TimeZone;
use pagination::Paginated;
use rstest::rstest;
use serde_json::{Value, json};

fn test_app(
    ports: MockPorts,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(ports.into_state()))
        .app_data(json_config())
        .app_data(query_config())
        .service(
            web::scope("/api/v1/orders")
                .wrap(RequireAuth)
                .service(create_order)
                .service(list_orders)
                .service(get_order)
                .service(update_order_status),
        )
}

fn address(street: &str) -> AddressParts {
    AddressParts {
        street: street.to_owned(),
        zip_code: "06600".to_owned(),
        ext_num: "222".to_owned(),
        int_num: None,
        city: "Ciudad de México".to_owned(),
        state: "CDMX".to_owned(),
        country: "MX".to_owned(),
    }
}

fn order(client_id: UserId, status: OrderStatus) -> OrderPayload {
    let at = Utc
        .with_ymd_and_hms(2024, 6, 3, 9, 0, 0)
        .single()
        .expect("valid timestamp");
    OrderPayload {
        id: OrderId::random(),
        client_id,
        origin: Coordinates::new(19.4326, -99.1332),
        destination: Coordinates::new(20.6597, -103.3496),
        origin_address: address("Av. Reforma"),
        destination_address: address("Av. Chapultepec"),
        product_quantity: 2,
        total_weight: 12.5,
        package_size: PackageSize::M,
        status,
        created_at: at,
        updated_at: at,
        client: None,
    }
}

fn create_body() -> Value {
    json!({
        "originCoordinates": { "latitude": 19.4326, "longitude": -99.1332 },
        "destinationCoordinates": { "latitude": 20.6597, "longitude": -103.3496 },
        "originAddress": {
            "street": "Av. Reforma", "zipCode": "06600", "extNum": "222",
            "city": "Ciudad de México", "state": "CDMX", "country": "MX"
        },
        "destinationAddress": {
            "street": "Av. Chapultepec", "zipCode": "44100", "extNum": "15", "intNum": "4B",
            "city": "Guadalajara", "state": "JAL", "country": "MX"
        },
        "productQuantity": 2,
        "totalWeight": 12.5
    })
}

#[rstest]
#[actix_web::test]
async fn create_order_uses_caller_as_client() {
    let (admin, client) = (admin(), client());
    let client_id = client.user_id.clone();
    let mut ports = MockPorts::default();
    ports.accept_tokens(&admin, &client);
    let expected = client_id.clone();
    ports
        .orders
        .expect_create_order()
        .withf(move |request| {
            request.client_id == expected
                && request.product_quantity == 2
                && request.destination_address.int_num.as_deref() == Some("4B")
                && request.origin_address.zip_code == "06600"
        })
        .times(1)
        .return_once(move |_| {
            Ok(CreateOrderResponse {
                order: order(client_id, OrderStatus::Created),
                estimated_distance_km: Some(461.2),
            })
        });
    let app = actix_test::init_service(test_app(ports)).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/orders")
        .insert_header(bearer(CLIENT_TOKEN))
        .set_json(create_body())
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["status"], "created");
    assert_eq!(body["packageSize"], "M");
    assert_eq!(body["estimatedDistanceKm"], 461.2);
    assert_eq!(body["originAddress"]["zipCode"], "06600");
    assert!(body.get("client").is_none());
}

#[rstest]
#[actix_web::test]
async fn admin_cannot_create_orders() {
    let mut ports = MockPorts::default();
    ports.accept_tokens(&admin(), &client());
    ports.orders.expect_create_order().times(0);
    let app = actix_test::init_service(test_app(ports)).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/orders")
        .insert_header(bearer(ADMIN_TOKEN))
        .set_json(create_body())
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[actix_web::test]
async fn negative_quantity_reaches_domain_as_zero() {
    let mut ports = MockPorts::default();
    ports.accept_tokens(&admin(), &client());
    ports
        .orders
        .expect_create_order()
        .withf(|request| request.product_quantity == 0)
        .times(1)
        .return_once(|_| Err(Error::validation("product quantity must be at least 1")));
    let app = actix_test::init_service(test_app(ports)).await;

    let mut body = create_body();
    body["productQuantity"] = json!(-3);
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/orders")
        .insert_header(bearer(CLIENT_TOKEN))
        .set_json(body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn list_orders_normalises_paging_and_parses_status() {
    let (admin, client) = (admin(), client());
    let mut ports = MockPorts::default();
    ports.accept_tokens(&admin, &client);
    let owner = client.user_id.clone();
    ports
        .orders_query
        .expect_list_orders()
        .withf(|request| {
            request.actor.role == Role::Admin
                && request.status == Some(OrderStatus::InRoute)
                && request.page == PageRequest::normalised(Some(2), Some(10))
        })
        .times(1)
        .return_once(move |request| {
            let mut item = order(owner.clone(), OrderStatus::InRoute);
            item.client = Some(UserPayload {
                id: owner,
                email: Email::new("ada@example.com").expect("valid email"),
                role: Role::Client,
                created_at: item.created_at,
                updated_at: item.updated_at,
            });
            Ok(Paginated::new(vec![item], request.page, 11))
        });
    let app = actix_test::init_service(test_app(ports)).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/orders?page=2&limit=500&status=in_route")
        .insert_header(bearer(ADMIN_TOKEN))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["meta"]["total"], 11);
    assert_eq!(body["meta"]["page"], 2);
    assert_eq!(body["meta"]["limit"], 10);
    assert_eq!(body["meta"]["totalPages"], 2);
    assert_eq!(body["items"][0]["client"]["email"], "ada@example.com");
}

#[rstest]
#[actix_web::test]
async fn unknown_status_filter_is_rejected() {
    let mut ports = MockPorts::default();
    ports.accept_tokens(&admin(), &client());
    ports.orders_query.expect_list_orders().times(0);
    let app = actix_test::init_service(test_app(ports)).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/orders?status=lost")
        .insert_header(bearer(ADMIN_TOKEN))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], "status");
    assert_eq!(body["details"]["value"], "lost");
}

#[rstest]
#[actix_web::test]
async fn listing_requires_a_token() {
    let mut ports = MockPorts::default();
    ports.orders_query.expect_list_orders().times(0);
    let app = actix_test::init_service(test_app(ports)).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/orders")
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn get_order_rejects_malformed_id() {
    let mut ports = MockPorts::default();
    ports.accept_tokens(&admin(), &client());
    ports.orders_query.expect_get_order().times(0);
    let app = actix_test::init_service(test_app(ports)).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/orders/not-a-uuid")
        .insert_header(bearer(CLIENT_TOKEN))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["code"], "invalid_order_id");
}

#[rstest]
#[actix_web::test]
async fn get_order_surfaces_not_found() {
    let mut ports = MockPorts::default();
    ports.accept_tokens(&admin(), &client());
    let id = OrderId::random();
    ports
        .orders_query
        .expect_get_order()
        .withf(move |request| request.order_id == id && request.actor.role == Role::Client)
        .times(1)
        .return_once(|_| Err(Error::not_found("order not found")));
    let app = actix_test::init_service(test_app(ports)).await;

    let request = actix_test::TestRequest::get()
        .uri(&format!("/api/v1/orders/{id}"))
        .insert_header(bearer(CLIENT_TOKEN))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn admin_updates_status() {
    let (admin, client) = (admin(), client());
    let mut ports = MockPorts::default();
    ports.accept_tokens(&admin, &client);
    let owner = client.user_id.clone();
    ports
        .orders
        .expect_update_status()
        .withf(|request| request.status == OrderStatus::Collected)
        .times(1)
        .return_once(move |_| Ok(order(owner, OrderStatus::Collected)));
    let app = actix_test::init_service(test_app(ports)).await;

    let request = actix_test::TestRequest::put()
        .uri(&format!("/api/v1/orders/{}/status", OrderId::random()))
        .insert_header(bearer(ADMIN_TOKEN))
        .set_json(json!({ "status": "collected" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["status"], "collected");
}

#[rstest]
#[case(CLIENT_TOKEN, json!({ "status": "collected" }), StatusCode::FORBIDDEN)]
#[case(ADMIN_TOKEN, json!({ "status": "teleported" }), StatusCode::BAD_REQUEST)]
#[case(ADMIN_TOKEN, json!({ "state": "collected" }), StatusCode::BAD_REQUEST)]
#[actix_web::test]
async fn status_update_is_guarded(
    #[case] token: &str,
    #[case] body: Value,
    #[case] expected: StatusCode,
) {
    let mut ports = MockPorts::default();
    ports.accept_tokens(&admin(), &client());
    ports.orders.expect_update_status().times(0);
    let app = actix_test::init_service(test_app(ports)).await;

    let request = actix_test::TestRequest::put()
        .uri(&format!("/api/v1/orders/{}/status", OrderId::random()))
        .insert_header(bearer(token))
        .set_json(body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), expected);
}

#[rstest]
#[actix_web::test]
async fn illegal_transition_maps_to_bad_request() {
    let mut ports = MockPorts::default();
    ports.accept_tokens(&admin(), &client());
    ports
        .orders
        .expect_update_status()
        .return_once(|_| Err(Error::validation("cannot move order from delivered to created")));
    let app = actix_test::init_service(test_app(ports)).await;

    let request = actix_test::TestRequest::put()
        .uri(&format!("/api/v1/orders/{}/status", OrderId::random()))
        .insert_header(bearer(ADMIN_TOKEN))
        .set_json(json!({ "status": "created" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "validation_error");
}
