//! PostgreSQL-backed `OrderRepository` implementation using Diesel ORM.
//!
//! Status updates are revision-checked: the `UPDATE` only matches when the
//! stored revision still equals the one the caller read.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{OrderRepository, OrderRepositoryError};
use crate::domain::{
    Address, AddressParts, Coordinates, Order, OrderId, OrderRecord, OrderStatus, PackageSize,
    UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewOrderRow, OrderRow, OrderStatusUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::orders;

/// Diesel-backed implementation of the `OrderRepository` port.
#[derive(Clone)]
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> OrderRepositoryError {
    map_basic_pool_error(error, OrderRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> OrderRepositoryError {
    map_basic_diesel_error(
        error,
        OrderRepositoryError::query,
        OrderRepositoryError::connection,
    )
}

/// Cast domain revision (u32) to database revision (i32).
#[expect(
    clippy::cast_possible_wrap,
    reason = "revision values are always small positive integers"
)]
fn cast_revision_for_db(revision: u32) -> i32 {
    revision as i32
}

#[expect(
    clippy::cast_sign_loss,
    reason = "revision is always non-negative in database"
)]
fn cast_revision_from_db(revision: i32) -> u32 {
    revision as u32
}

fn page_bounds(limit: u32, offset: u64) -> (i64, i64) {
    (
        i64::from(limit),
        i64::try_from(offset).unwrap_or(i64::MAX),
    )
}

fn count_from_db(count: i64) -> u64 {
    count.unsigned_abs()
}

fn invalid_row(id: Uuid, field: &'static str) -> OrderRepositoryError {
    warn!(order_id = %id, field, "stored order row failed validation");
    OrderRepositoryError::query("stored order row is invalid")
}

/// Convert a database row to a domain order.
fn row_to_order(row: OrderRow) -> Result<Order, OrderRepositoryError> {
    let id = row.id;
    let origin_address = Address::try_new(AddressParts {
        street: row.origin_street,
        zip_code: row.origin_zip_code,
        ext_num: row.origin_ext_num,
        int_num: row.origin_int_num,
        city: row.origin_city,
        state: row.origin_state,
        country: row.origin_country,
    })
    .map_err(|_| invalid_row(id, "origin address"))?;
    let destination_address = Address::try_new(AddressParts {
        street: row.destination_street,
        zip_code: row.destination_zip_code,
        ext_num: row.destination_ext_num,
        int_num: row.destination_int_num,
        city: row.destination_city,
        state: row.destination_state,
        country: row.destination_country,
    })
    .map_err(|_| invalid_row(id, "destination address"))?;
    let product_quantity =
        u32::try_from(row.product_quantity).map_err(|_| invalid_row(id, "product_quantity"))?;
    let package_size =
        PackageSize::from_str(&row.package_size).map_err(|_| invalid_row(id, "package_size"))?;
    let status = OrderStatus::from_str(&row.status).map_err(|_| invalid_row(id, "status"))?;

    Ok(Order::restore(OrderRecord {
        id: OrderId::from_uuid(id),
        client_id: UserId::from_uuid(row.client_id),
        origin: Coordinates::new(row.origin_latitude, row.origin_longitude),
        destination: Coordinates::new(row.destination_latitude, row.destination_longitude),
        origin_address,
        destination_address,
        product_quantity,
        total_weight: row.total_weight,
        package_size,
        status,
        revision: cast_revision_from_db(row.revision),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

fn rows_to_orders(rows: Vec<OrderRow>) -> Result<Vec<Order>, OrderRepositoryError> {
    rows.into_iter().map(row_to_order).collect()
}

fn new_row(order: &Order) -> Result<NewOrderRow<'_>, OrderRepositoryError> {
    let origin = order.origin_address();
    let destination = order.destination_address();
    Ok(NewOrderRow {
        id: *order.id().as_uuid(),
        client_id: *order.client_id().as_uuid(),
        origin_latitude: order.origin().latitude,
        origin_longitude: order.origin().longitude,
        destination_latitude: order.destination().latitude,
        destination_longitude: order.destination().longitude,
        origin_street: origin.street(),
        origin_zip_code: origin.zip_code(),
        origin_ext_num: origin.ext_num(),
        origin_int_num: origin.int_num(),
        origin_city: origin.city(),
        origin_state: origin.state(),
        origin_country: origin.country(),
        destination_street: destination.street(),
        destination_zip_code: destination.zip_code(),
        destination_ext_num: destination.ext_num(),
        destination_int_num: destination.int_num(),
        destination_city: destination.city(),
        destination_state: destination.state(),
        destination_country: destination.country(),
        product_quantity: i32::try_from(order.product_quantity())
            .map_err(|_| OrderRepositoryError::query("product quantity out of range"))?,
        total_weight: order.total_weight(),
        package_size: order.package_size().as_str(),
        status: order.status().as_str(),
        revision: cast_revision_for_db(order.revision()),
        created_at: order.created_at(),
        updated_at: order.updated_at(),
    })
}

/// Work out why a revision-checked update matched no rows.
async fn handle_update_failure<C>(
    conn: &mut C,
    order_id: Uuid,
    expected_revision: u32,
) -> OrderRepositoryError
where
    C: AsyncConnection<Backend = Pg> + Send,
{
    let current = orders::table
        .find(order_id)
        .select(orders::revision)
        .first::<i32>(conn)
        .await
        .optional()
        .map_err(map_diesel_error);

    match current {
        Ok(Some(actual)) => {
            OrderRepositoryError::revision_mismatch(expected_revision, cast_revision_from_db(actual))
        }
        Ok(None) => OrderRepositoryError::missing(order_id.to_string()),
        Err(err) => err,
    }
}

#[async_trait]
impl OrderRepository for DieselOrderRepository {
    async fn create(&self, order: &Order) -> Result<(), OrderRepositoryError> {
        let row = new_row(order)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(orders::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<OrderRow> = orders::table
            .find(id.as_uuid())
            .select(OrderRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_order).transpose()
    }

    async fn list_by_client(
        &self,
        client_id: &UserId,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<Order>, OrderRepositoryError> {
        let (limit, offset) = page_bounds(limit, offset);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<OrderRow> = orders::table
            .filter(orders::client_id.eq(client_id.as_uuid()))
            .order((orders::created_at.desc(), orders::id.desc()))
            .limit(limit)
            .offset(offset)
            .select(OrderRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_orders(rows)
    }

    async fn list_all(&self, limit: u32, offset: u64) -> Result<Vec<Order>, OrderRepositoryError> {
        let (limit, offset) = page_bounds(limit, offset);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<OrderRow> = orders::table
            .order((orders::created_at.desc(), orders::id.desc()))
            .limit(limit)
            .offset(offset)
            .select(OrderRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_orders(rows)
    }

    async fn list_by_status(
        &self,
        status: OrderStatus,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<Order>, OrderRepositoryError> {
        let (limit, offset) = page_bounds(limit, offset);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<OrderRow> = orders::table
            .filter(orders::status.eq(status.as_str()))
            .order((orders::created_at.desc(), orders::id.desc()))
            .limit(limit)
            .offset(offset)
            .select(OrderRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_orders(rows)
    }

    async fn update(
        &self,
        order: &Order,
        expected_revision: u32,
    ) -> Result<(), OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = OrderStatusUpdate {
            status: order.status().as_str(),
            revision: cast_revision_for_db(order.revision()),
            updated_at: order.updated_at(),
        };

        let updated = diesel::update(orders::table)
            .filter(
                orders::id
                    .eq(order.id().as_uuid())
                    .and(orders::revision.eq(cast_revision_for_db(expected_revision))),
            )
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if updated == 0 {
            return Err(
                handle_update_failure(&mut conn, *order.id().as_uuid(), expected_revision).await,
            );
        }
        Ok(())
    }

    async fn count_by_client(&self, client_id: &UserId) -> Result<u64, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        orders::table
            .filter(orders::client_id.eq(client_id.as_uuid()))
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map(count_from_db)
            .map_err(map_diesel_error)
    }

    async fn count_total(&self) -> Result<u64, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        orders::table
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map(count_from_db)
            .map_err(map_diesel_error)
    }

    async fn count_by_status(&self, status: OrderStatus) -> Result<u64, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        orders::table
            .filter(orders::status.eq(status.as_str()))
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map(count_from_db)
            .map_err(map_diesel_error)
    }
}
