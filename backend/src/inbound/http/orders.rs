//! Order API handlers.
//!
//! ```text
//! POST /api/v1/orders                 client only
//! GET  /api/v1/orders?page=1&limit=10&status=in_route
//! GET  /api/v1/orders/{id}
//! PUT  /api/v1/orders/{id}/status     admin only
//! ```
//!
//! Every route sits behind [`RequireAuth`](super::authorization::RequireAuth)
//! at scope level; the role guards are attached per route.

use std::str::FromStr;

use actix_web::{HttpResponse, get, post, put, web};
use chrono::{DateTime, Utc};
use pagination::{PageMeta, PageRequest};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{
    CreateOrderRequest, CreateOrderResponse, GetOrderRequest, ListOrdersRequest, OrderPayload,
    UpdateOrderStatusRequest,
};
use crate::domain::{
    AddressParts, AuthenticatedUser, Coordinates, Error, OrderId, OrderStatus, PackageSize,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::UserResponseBody;
use crate::inbound::http::authorization::RequireRole;
use crate::inbound::http::state::HttpState;

/// Postal address as sent and returned over HTTP.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressBody {
    #[schema(example = "Av. Reforma")]
    pub street: String,
    #[schema(example = "06600")]
    pub zip_code: String,
    #[schema(example = "222")]
    pub ext_num: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub int_num: Option<String>,
    #[schema(example = "Ciudad de México")]
    pub city: String,
    #[schema(example = "CDMX")]
    pub state: String,
    #[schema(example = "MX")]
    pub country: String,
}

impl From<AddressBody> for AddressParts {
    fn from(value: AddressBody) -> Self {
        Self {
            street: value.street,
            zip_code: value.zip_code,
            ext_num: value.ext_num,
            int_num: value.int_num,
            city: value.city,
            state: value.state,
            country: value.country,
        }
    }
}

impl From<AddressParts> for AddressBody {
    fn from(value: AddressParts) -> Self {
        Self {
            street: value.street,
            zip_code: value.zip_code,
            ext_num: value.ext_num,
            int_num: value.int_num,
            city: value.city,
            state: value.state,
            country: value.country,
        }
    }
}

/// Request payload for creating an order.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequestBody {
    pub origin_coordinates: Coordinates,
    pub destination_coordinates: Coordinates,
    pub origin_address: AddressBody,
    pub destination_address: AddressBody,
    #[schema(example = 2, minimum = 1)]
    pub product_quantity: i64,
    #[schema(example = 12.5)]
    pub total_weight: f64,
}

/// Order view returned by every order endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponseBody {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub client_id: String,
    pub origin_coordinates: Coordinates,
    pub destination_coordinates: Coordinates,
    pub origin_address: AddressBody,
    pub destination_address: AddressBody,
    pub product_quantity: u32,
    pub total_weight: f64,
    pub package_size: PackageSize,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<UserResponseBody>,
}

impl From<OrderPayload> for OrderResponseBody {
    fn from(value: OrderPayload) -> Self {
        Self {
            id: value.id.to_string(),
            client_id: value.client_id.to_string(),
            origin_coordinates: value.origin,
            destination_coordinates: value.destination,
            origin_address: value.origin_address.into(),
            destination_address: value.destination_address.into(),
            product_quantity: value.product_quantity,
            total_weight: value.total_weight,
            package_size: value.package_size,
            status: value.status,
            created_at: value.created_at,
            updated_at: value.updated_at,
            client: value.client.map(UserResponseBody::from),
        }
    }
}

/// Created order plus the estimated route length, when available.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponseBody {
    #[serde(flatten)]
    pub order: OrderResponseBody,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 461.2)]
    pub estimated_distance_km: Option<f64>,
}

impl From<CreateOrderResponse> for CreateOrderResponseBody {
    fn from(value: CreateOrderResponse) -> Self {
        Self {
            order: value.order.into(),
            estimated_distance_km: value.estimated_distance_km,
        }
    }
}

/// Pagination figures for a listing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageMetaBody {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

impl From<PageMeta> for PageMetaBody {
    fn from(value: PageMeta) -> Self {
        Self {
            total: value.total,
            page: value.page,
            limit: value.limit,
            total_pages: value.total_pages,
        }
    }
}

/// One page of orders.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderListResponseBody {
    pub items: Vec<OrderResponseBody>,
    pub meta: PageMetaBody,
}

/// Listing query parameters.
///
/// `page` below one is treated as one; `limit` outside `1..=100` falls back
/// to 10. `status` is honoured for admins only.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListOrdersQuery {
    #[param(example = 1)]
    pub page: Option<i64>,
    #[param(example = 10)]
    pub limit: Option<i64>,
    #[param(example = "in_route")]
    pub status: Option<String>,
}

/// Status change request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusRequestBody {
    #[schema(example = "collected")]
    pub status: String,
}

fn parse_order_id(raw: &str) -> Result<OrderId, Error> {
    OrderId::from_str(raw).map_err(|_| {
        Error::validation("order id must be a valid UUID")
            .with_details(json!({ "field": "id", "value": raw, "code": "invalid_order_id" }))
    })
}

fn parse_status(raw: &str, field: &str) -> Result<OrderStatus, Error> {
    OrderStatus::from_str(raw).map_err(|err| {
        Error::validation(err.to_string())
            .with_details(json!({ "field": field, "value": raw, "code": "invalid_status" }))
    })
}

/// Non-positive quantities map to zero so the domain reports them uniformly.
fn quantity(raw: i64) -> u32 {
    u32::try_from(raw.max(0)).unwrap_or(u32::MAX)
}

/// Create an order for the calling client.
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    request_body = CreateOrderRequestBody,
    responses(
        (status = 201, description = "Order created", body = CreateOrderResponseBody),
        (status = 400, description = "Invalid coordinates, address, quantity or weight", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 403, description = "Caller is not a client", body = Error),
        (status = 404, description = "Client no longer exists", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["orders"],
    operation_id = "createOrder",
    security(("bearer" = []))
)]
#[post("", wrap = "RequireRole::client()")]
pub async fn create_order(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<CreateOrderRequestBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let created = state
        .orders
        .create_order(CreateOrderRequest {
            client_id: user.user_id,
            origin: body.origin_coordinates,
            destination: body.destination_coordinates,
            origin_address: body.origin_address.into(),
            destination_address: body.destination_address.into(),
            product_quantity: quantity(body.product_quantity),
            total_weight: body.total_weight,
        })
        .await?;
    Ok(HttpResponse::Created().json(CreateOrderResponseBody::from(created)))
}

/// List orders visible to the caller.
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    params(ListOrdersQuery),
    responses(
        (status = 200, description = "Orders", body = OrderListResponseBody),
        (status = 400, description = "Invalid status filter", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["orders"],
    operation_id = "listOrders",
    security(("bearer" = []))
)]
#[get("")]
pub async fn list_orders(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    query: web::Query<ListOrdersQuery>,
) -> ApiResult<web::Json<OrderListResponseBody>> {
    let ListOrdersQuery {
        page,
        limit,
        status,
    } = query.into_inner();
    let status = status
        .as_deref()
        .filter(|raw| !raw.is_empty())
        .map(|raw| parse_status(raw, "status"))
        .transpose()?;
    let listing = state
        .orders_query
        .list_orders(ListOrdersRequest {
            actor: user,
            status,
            page: PageRequest::normalised(page, limit),
        })
        .await?;
    Ok(web::Json(OrderListResponseBody {
        meta: listing.meta.into(),
        items: listing
            .items
            .into_iter()
            .map(OrderResponseBody::from)
            .collect(),
    }))
}

/// Fetch one order.
///
/// Clients asking for another client's order receive `404`.
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    params(("id" = String, Path, description = "Order identifier", format = "uuid")),
    responses(
        (status = 200, description = "Order", body = OrderResponseBody),
        (status = 400, description = "Malformed identifier", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 404, description = "Order not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["orders"],
    operation_id = "getOrder",
    security(("bearer" = []))
)]
#[get("/{id}")]
pub async fn get_order(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<OrderResponseBody>> {
    let order_id = parse_order_id(&path.into_inner())?;
    let order = state
        .orders_query
        .get_order(GetOrderRequest {
            actor: user,
            order_id,
        })
        .await?;
    Ok(web::Json(order.into()))
}

/// Move an order along its lifecycle.
#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}/status",
    params(("id" = String, Path, description = "Order identifier", format = "uuid")),
    request_body = UpdateOrderStatusRequestBody,
    responses(
        (status = 200, description = "Status updated", body = OrderResponseBody),
        (status = 400, description = "Unknown status or illegal transition", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 403, description = "Caller is not an admin", body = Error),
        (status = 404, description = "Order not found", body = Error),
        (status = 409, description = "Concurrent modification", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["orders"],
    operation_id = "updateOrderStatus",
    security(("bearer" = []))
)]
#[put("/{id}/status", wrap = "RequireRole::admin()")]
pub async fn update_order_status(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<UpdateOrderStatusRequestBody>,
) -> ApiResult<web::Json<OrderResponseBody>> {
    let order_id = parse_order_id(&path.into_inner())?;
    let status = parse_status(&payload.status, "status")?;
    let order = state
        .orders
        .update_status(UpdateOrderStatusRequest {
            actor: user,
            order_id,
            status,
        })
        .await?;
    Ok(web::Json(order.into()))
}

#[cfg(test)]
#[path = "orders_tests.rs"]
mod tests;
