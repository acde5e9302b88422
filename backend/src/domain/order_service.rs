//! Order use cases: creation, role-scoped reads and lifecycle transitions.
//!
//! One service implements both [`OrderCommand`] and [`OrderQuery`]. Every
//! repository call is bounded by a [`Deadline`]; repository failures never
//! leak past this module and surface as internal errors.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{PageRequest, Paginated};
use tracing::{error, info, warn};

use crate::domain::ports::{
    CoordinateError, CoordinateService, CreateOrderRequest, CreateOrderResponse, GetOrderRequest,
    ListOrdersRequest, OrderCommand, OrderPayload, OrderQuery, OrderRepository,
    OrderRepositoryError, UpdateOrderStatusRequest, UserPayload, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    Address, AuthenticatedUser, Coordinates, Deadline, Error, Order, OrderDraft, OrderId,
    OrderStatus, Role, UserId,
};

/// Order service implementing the order driving ports.
#[derive(Clone)]
pub struct OrderService<O, U> {
    orders: Arc<O>,
    users: Arc<U>,
    coordinates: Arc<dyn CoordinateService>,
    clock: Arc<dyn Clock>,
    deadline: Deadline,
}

impl<O, U> OrderService<O, U> {
    /// Create a new service over the given collaborators.
    pub fn new(
        orders: Arc<O>,
        users: Arc<U>,
        coordinates: Arc<dyn CoordinateService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            orders,
            users,
            coordinates,
            clock,
            deadline: Deadline::default(),
        }
    }

    /// Bound every repository call by `deadline`.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = deadline;
        self
    }
}

/// Which slice of the order table a listing reads.
#[derive(Debug, Clone, Copy)]
enum ListingScope<'a> {
    Client(&'a UserId),
    All,
    Status(OrderStatus),
}

impl<'a> ListingScope<'a> {
    fn for_actor(actor: &'a AuthenticatedUser, status: Option<OrderStatus>) -> Self {
        match (actor.role, status) {
            (Role::Client, _) => Self::Client(&actor.user_id),
            (Role::Admin, None) => Self::All,
            (Role::Admin, Some(status)) => Self::Status(status),
        }
    }
}

impl<O, U> OrderService<O, U>
where
    O: OrderRepository,
    U: UserRepository,
{
    fn map_order_error(err: OrderRepositoryError) -> Error {
        match err {
            OrderRepositoryError::RevisionMismatch { expected, actual } => {
                warn!(expected, actual, "order changed concurrently");
                Error::conflict("order was modified concurrently, please retry")
            }
            OrderRepositoryError::Missing { order_id } => {
                warn!(%order_id, "order disappeared during update");
                Error::conflict("order was modified concurrently, please retry")
            }
            other => {
                error!(error = %other, "order repository failure");
                Error::internal("internal server error")
            }
        }
    }

    fn map_user_error(err: UserPersistenceError) -> Error {
        error!(error = %err, "user repository failure");
        Error::internal("internal server error")
    }

    async fn validate_point(&self, label: &str, point: Coordinates) -> Result<(), Error> {
        match self.coordinates.validate(point).await {
            Ok(()) => Ok(()),
            Err(CoordinateError::Invalid { message }) => {
                warn!(label, %message, "coordinates rejected");
                Err(Error::validation(format!(
                    "invalid {label} coordinates: {message}"
                )))
            }
            Err(err @ CoordinateError::Unavailable { .. }) => {
                error!(error = %err, "coordinate service failure");
                Err(Error::internal("internal server error"))
            }
        }
    }

    async fn estimate_distance(&self, order: &Order) -> Option<f64> {
        match self
            .coordinates
            .distance_km(order.origin(), order.destination())
            .await
        {
            Ok(distance) => Some(distance),
            Err(err) => {
                warn!(order_id = %order.id(), error = %err, "distance estimate unavailable");
                None
            }
        }
    }

    async fn fetch_order(&self, id: &OrderId) -> Result<Order, Error> {
        self.deadline
            .run("orders.find_by_id", self.orders.find_by_id(id))
            .await?
            .map_err(Self::map_order_error)?
            .ok_or_else(|| Error::not_found_resource("order"))
    }

    async fn list_scope(
        &self,
        scope: ListingScope<'_>,
        page: PageRequest,
    ) -> Result<(Vec<Order>, u64), Error> {
        let (limit, offset) = (page.limit(), page.offset());
        let listing = match scope {
            ListingScope::Client(client_id) => {
                let orders = self
                    .deadline
                    .run(
                        "orders.list_by_client",
                        self.orders.list_by_client(client_id, limit, offset),
                    )
                    .await?
                    .map_err(Self::map_order_error)?;
                let total = self
                    .deadline
                    .run(
                        "orders.count_by_client",
                        self.orders.count_by_client(client_id),
                    )
                    .await?
                    .map_err(Self::map_order_error)?;
                (orders, total)
            }
            ListingScope::All => {
                let orders = self
                    .deadline
                    .run("orders.list_all", self.orders.list_all(limit, offset))
                    .await?
                    .map_err(Self::map_order_error)?;
                let total = self
                    .deadline
                    .run("orders.count_total", self.orders.count_total())
                    .await?
                    .map_err(Self::map_order_error)?;
                (orders, total)
            }
            ListingScope::Status(status) => {
                let orders = self
                    .deadline
                    .run(
                        "orders.list_by_status",
                        self.orders.list_by_status(status, limit, offset),
                    )
                    .await?
                    .map_err(Self::map_order_error)?;
                let total = self
                    .deadline
                    .run("orders.count_by_status", self.orders.count_by_status(status))
                    .await?
                    .map_err(Self::map_order_error)?;
                (orders, total)
            }
        };
        Ok(listing)
    }
}

#[async_trait]
impl<O, U> OrderCommand for OrderService<O, U>
where
    O: OrderRepository,
    U: UserRepository,
{
    async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<CreateOrderResponse, Error> {
        let client = self
            .deadline
            .run("users.find_by_id", self.users.find_by_id(&request.client_id))
            .await?
            .map_err(Self::map_user_error)?
            .ok_or_else(|| {
                warn!(client_id = %request.client_id, "order submitted for unknown client");
                Error::not_found_resource("client")
            })?;

        self.validate_point("origin", request.origin).await?;
        self.validate_point("destination", request.destination).await?;

        let origin_address = Address::try_new(request.origin_address)
            .map_err(|err| Error::validation(format!("invalid origin address: {err}")))?;
        let destination_address = Address::try_new(request.destination_address)
            .map_err(|err| Error::validation(format!("invalid destination address: {err}")))?;

        let order = Order::new(
            OrderDraft {
                client_id: request.client_id,
                origin: request.origin,
                destination: request.destination,
                origin_address,
                destination_address,
                product_quantity: request.product_quantity,
                total_weight: request.total_weight,
            },
            self.clock.utc(),
        )
        .map_err(|err| Error::validation(err.to_string()))?;

        self.deadline
            .run("orders.create", self.orders.create(&order))
            .await?
            .map_err(Self::map_order_error)?;

        let estimated_distance_km = self.estimate_distance(&order).await;
        info!(
            order_id = %order.id(),
            client_id = %order.client_id(),
            package_size = %order.package_size(),
            "order created"
        );

        let mut payload = OrderPayload::from(order);
        payload.client = Some(UserPayload::from(&client));
        Ok(CreateOrderResponse {
            order: payload,
            estimated_distance_km,
        })
    }

    async fn update_status(
        &self,
        request: UpdateOrderStatusRequest,
    ) -> Result<OrderPayload, Error> {
        let UpdateOrderStatusRequest {
            actor,
            order_id,
            status,
        } = request;
        if let Err(err) = actor.require_role(Role::Admin) {
            warn!(
                user_id = %actor.user_id,
                %order_id,
                "non-admin attempted a status change"
            );
            return Err(err);
        }

        let mut order = self.fetch_order(&order_id).await?;
        let expected_revision = order.revision();
        let from = order.status();
        order
            .update_status(status, self.clock.utc())
            .map_err(|err| {
                warn!(%order_id, %from, to = %status, "invalid status transition");
                Error::validation(err.to_string())
            })?;

        self.deadline
            .run(
                "orders.update",
                self.orders.update(&order, expected_revision),
            )
            .await?
            .map_err(Self::map_order_error)?;

        info!(%order_id, %from, to = %status, "order status updated");
        Ok(OrderPayload::from(order))
    }
}

#[async_trait]
impl<O, U> OrderQuery for OrderService<O, U>
where
    O: OrderRepository,
    U: UserRepository,
{
    async fn list_orders(
        &self,
        request: ListOrdersRequest,
    ) -> Result<Paginated<OrderPayload>, Error> {
        let scope = ListingScope::for_actor(&request.actor, request.status);
        let (orders, total) = self.list_scope(scope, request.page).await?;
        Ok(Paginated::new(orders, request.page, total).map(OrderPayload::from))
    }

    async fn get_order(&self, request: GetOrderRequest) -> Result<OrderPayload, Error> {
        let order = self.fetch_order(&request.order_id).await?;
        if !request.actor.is_admin() && order.client_id() != &request.actor.user_id {
            return Err(Error::not_found_resource("order"));
        }
        Ok(OrderPayload::from(order))
    }
}

#[cfg(test)]
#[path = "order_service_tests.rs"]
mod tests;
