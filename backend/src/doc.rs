//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint, the request and response bodies,
//! the domain error payload and the bearer token security scheme. The
//! document is served through Swagger UI in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Coordinates, Error, ErrorCode, OrderStatus, PackageSize, Role};
use crate::inbound::http::auth::{
    LoginRequestBody, RegisterRequestBody, SessionResponseBody, UpdatePasswordRequestBody,
    UserResponseBody,
};
use crate::inbound::http::orders::{
    AddressBody, CreateOrderRequestBody, CreateOrderResponseBody, OrderListResponseBody,
    OrderResponseBody, PageMetaBody, UpdateOrderStatusRequestBody,
};
use crate::inbound::http::health::{CheckReport, CheckStatus, HealthReport};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Token issued by POST /api/v1/auth/register or /api/v1/auth/login.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Logistics order API",
        description = "Identity, order intake and delivery lifecycle tracking."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::update_password,
        crate::inbound::http::orders::create_order,
        crate::inbound::http::orders::list_orders,
        crate::inbound::http::orders::get_order,
        crate::inbound::http::orders::update_order_status,
        crate::inbound::http::health::health,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Role,
        OrderStatus,
        PackageSize,
        Coordinates,
        AddressBody,
        RegisterRequestBody,
        LoginRequestBody,
        UpdatePasswordRequestBody,
        UserResponseBody,
        SessionResponseBody,
        CreateOrderRequestBody,
        CreateOrderResponseBody,
        OrderResponseBody,
        OrderListResponseBody,
        PageMetaBody,
        UpdateOrderStatusRequestBody,
        HealthReport,
        CheckReport,
        CheckStatus,
    )),
    tags(
        (name = "auth", description = "Registration, login and password changes"),
        (name = "orders", description = "Order intake, listing and lifecycle"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Document structure checks.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn object_has_field(schema: &RefOr<Schema>, field: &str) -> bool {
        match schema {
            RefOr::T(Schema::Object(obj)) => obj.properties.contains_key(field),
            _ => false,
        }
    }

    #[rstest]
    #[case("/api/v1/auth/register")]
    #[case("/api/v1/auth/login")]
    #[case("/api/v1/auth/password")]
    #[case("/api/v1/orders")]
    #[case("/api/v1/orders/{id}")]
    #[case("/api/v1/orders/{id}/status")]
    #[case("/health")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn every_endpoint_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[rstest]
    fn error_schema_uses_wire_field_names() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error = schemas.get("Error").expect("Error schema");

        assert!(object_has_field(error, "code"));
        assert!(object_has_field(error, "message"));
        assert!(object_has_field(error, "traceId"));
    }

    #[rstest]
    fn order_schema_is_camel_case() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let order = schemas.get("OrderResponseBody").expect("order schema");

        assert!(object_has_field(order, "packageSize"));
        assert!(object_has_field(order, "originCoordinates"));
    }

    #[rstest]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer"));
    }
}
