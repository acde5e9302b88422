//! `OrderRepository` over a process-local map.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::ports::{OrderRepository, OrderRepositoryError};
use crate::domain::{Order, OrderId, OrderStatus, UserId};

/// In-memory order store keyed by order id.
#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn page<F>(&self, limit: u32, offset: u64, keep: F) -> Vec<Order>
    where
        F: Fn(&Order) -> bool,
    {
        let orders = self.orders.read().unwrap_or_else(PoisonError::into_inner);
        let mut matching: Vec<&Order> = orders.values().filter(|order| keep(order)).collect();
        matching.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().as_uuid().cmp(a.id().as_uuid()))
        });
        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        matching
            .into_iter()
            .skip(skip)
            .take(limit as usize)
            .cloned()
            .collect()
    }

    fn count<F>(&self, keep: F) -> u64
    where
        F: Fn(&Order) -> bool,
    {
        let orders = self.orders.read().unwrap_or_else(PoisonError::into_inner);
        orders.values().filter(|order| keep(order)).count() as u64
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create(&self, order: &Order) -> Result<(), OrderRepositoryError> {
        let mut orders = self.orders.write().unwrap_or_else(PoisonError::into_inner);
        if orders.contains_key(&order.id()) {
            return Err(OrderRepositoryError::query(format!(
                "order {} already exists",
                order.id()
            )));
        }
        orders.insert(order.id(), order.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, OrderRepositoryError> {
        let orders = self.orders.read().unwrap_or_else(PoisonError::into_inner);
        Ok(orders.get(id).cloned())
    }

    async fn list_by_client(
        &self,
        client_id: &UserId,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<Order>, OrderRepositoryError> {
        Ok(self.page(limit, offset, |order| order.client_id() == client_id))
    }

    async fn list_all(&self, limit: u32, offset: u64) -> Result<Vec<Order>, OrderRepositoryError> {
        Ok(self.page(limit, offset, |_| true))
    }

    async fn list_by_status(
        &self,
        status: OrderStatus,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<Order>, OrderRepositoryError> {
        Ok(self.page(limit, offset, |order| order.status() == status))
    }

    async fn update(
        &self,
        order: &Order,
        expected_revision: u32,
    ) -> Result<(), OrderRepositoryError> {
        let mut orders = self.orders.write().unwrap_or_else(PoisonError::into_inner);
        let Some(stored) = orders.get_mut(&order.id()) else {
            return Err(OrderRepositoryError::missing(order.id().to_string()));
        };
        if stored.revision() != expected_revision {
            return Err(OrderRepositoryError::revision_mismatch(
                expected_revision,
                stored.revision(),
            ));
        }
        *stored = order.clone();
        Ok(())
    }

    async fn count_by_client(&self, client_id: &UserId) -> Result<u64, OrderRepositoryError> {
        Ok(self.count(|order| order.client_id() == client_id))
    }

    async fn count_total(&self) -> Result<u64, OrderRepositoryError> {
        Ok(self.count(|_| true))
    }

    async fn count_by_status(&self, status: OrderStatus) -> Result<u64, OrderRepositoryError> {
        Ok(self.count(|order| order.status() == status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Address, AddressParts, Coordinates, OrderDraft};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rstest::{fixture, rstest};

    fn address() -> Address {
        Address::try_new(AddressParts {
            street: "Av. Reforma".into(),
            zip_code: "06600".into(),
            ext_num: "222".into(),
            int_num: None,
            city: "Ciudad de México".into(),
            state: "CDMX".into(),
            country: "MX".into(),
        })
        .expect("valid address")
    }

    fn order(client_id: &UserId, created_at: DateTime<Utc>) -> Order {
        Order::new(
            OrderDraft {
                client_id: client_id.clone(),
                origin: Coordinates::new(19.4326, -99.1332),
                destination: Coordinates::new(20.6597, -103.3496),
                origin_address: address(),
                destination_address: address(),
                product_quantity: 1,
                total_weight: 3.0,
            },
            created_at,
        )
        .expect("valid order")
    }

    #[fixture]
    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[rstest]
    #[tokio::test]
    async fn lists_newest_first_with_paging(start: DateTime<Utc>) {
        let repo = InMemoryOrderRepository::new();
        let client = UserId::random();
        let mut ids = Vec::new();
        for minutes in 0..5 {
            let order = order(&client, start + Duration::minutes(minutes));
            ids.push(order.id());
            repo.create(&order).await.expect("create");
        }
        repo.create(&order(&UserId::random(), start))
            .await
            .expect("create foreign");

        let page = repo.list_by_client(&client, 2, 1).await.expect("list");
        let listed: Vec<OrderId> = page.iter().map(Order::id).collect();

        assert_eq!(listed, vec![ids[3], ids[2]]);
        assert_eq!(repo.count_by_client(&client).await.expect("count"), 5);
        assert_eq!(repo.count_total().await.expect("count"), 6);
    }

    #[rstest]
    #[tokio::test]
    async fn filters_by_status(start: DateTime<Utc>) {
        let repo = InMemoryOrderRepository::new();
        let client = UserId::random();
        let mut moving = order(&client, start);
        repo.create(&moving).await.expect("create");
        repo.create(&order(&client, start)).await.expect("create");

        moving
            .update_status(OrderStatus::Collected, start)
            .expect("legal transition");
        repo.update(&moving, 0).await.expect("update");

        let collected = repo
            .list_by_status(OrderStatus::Collected, 10, 0)
            .await
            .expect("list");
        assert_eq!(collected.len(), 1);
        assert_eq!(
            repo.count_by_status(OrderStatus::Created)
                .await
                .expect("count"),
            1
        );
    }

    #[rstest]
    #[tokio::test]
    async fn stale_revision_is_rejected(start: DateTime<Utc>) {
        let repo = InMemoryOrderRepository::new();
        let mut first = order(&UserId::random(), start);
        repo.create(&first).await.expect("create");
        let mut second = first.clone();

        first
            .update_status(OrderStatus::Collected, start)
            .expect("legal transition");
        repo.update(&first, 0).await.expect("first writer wins");

        second
            .update_status(OrderStatus::Cancelled, start)
            .expect("legal transition");
        let err = repo.update(&second, 0).await.expect_err("stale");

        assert!(matches!(
            err,
            OrderRepositoryError::RevisionMismatch {
                expected: 0,
                actual: 1
            }
        ));
        let stored = repo
            .find_by_id(&first.id())
            .await
            .expect("lookup")
            .expect("present");
        assert_eq!(stored.status(), OrderStatus::Collected);
    }

    #[rstest]
    #[tokio::test]
    async fn updating_unknown_order_reports_missing(start: DateTime<Utc>) {
        let repo = InMemoryOrderRepository::new();
        let err = repo
            .update(&order(&UserId::random(), start), 0)
            .await
            .expect_err("missing");
        assert!(matches!(err, OrderRepositoryError::Missing { .. }));
    }
}
