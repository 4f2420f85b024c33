use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{DocumentStore, StoreError, StoreResult};
use crate::models::{AuditEntry, Establishment, Order, OrderStatus, Product, ScheduleSlot};

#[derive(Default)]
struct Collections {
    establishments: HashMap<Uuid, Establishment>,
    products: HashMap<Uuid, Product>,
    // insertion order doubles as created_at order
    orders: Vec<Order>,
    audit: Vec<AuditEntry>,
}

/// In-process document store for tests and local runs without Postgres.
#[derive(Default)]
pub struct MemoryDocumentStore {
    inner: RwLock<Collections>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn order_count(&self) -> usize {
        self.inner.read().await.orders.len()
    }

    pub async fn audit_actions(&self) -> Vec<String> {
        self.inner
            .read()
            .await
            .audit
            .iter()
            .map(|entry| entry.action.clone())
            .collect()
    }

    /// Overwrites a product in place, used to flip `active` between calls.
    pub async fn replace_product(&self, product: Product) {
        self.inner.write().await.products.insert(product.id, product);
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn find_establishment(&self, id: Uuid) -> StoreResult<Option<Establishment>> {
        Ok(self.inner.read().await.establishments.get(&id).cloned())
    }

    async fn find_establishment_by_email(
        &self,
        email: &str,
    ) -> StoreResult<Option<Establishment>> {
        Ok(self
            .inner
            .read()
            .await
            .establishments
            .values()
            .find(|e| e.email == email)
            .cloned())
    }

    async fn insert_establishment(&self, establishment: &Establishment) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if inner
            .establishments
            .values()
            .any(|e| e.email == establishment.email)
        {
            return Err(StoreError::Duplicate(establishment.email.clone()));
        }
        inner
            .establishments
            .insert(establishment.id, establishment.clone());
        Ok(())
    }

    async fn update_schedule(&self, id: Uuid, schedule: &[ScheduleSlot]) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        match inner.establishments.get_mut(&id) {
            Some(establishment) => {
                establishment.schedule = schedule.to_vec();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_product(&self, id: Uuid) -> StoreResult<Option<Product>> {
        Ok(self.inner.read().await.products.get(&id).cloned())
    }

    async fn find_products(&self, ids: &[Uuid]) -> StoreResult<Vec<Product>> {
        let inner = self.inner.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| inner.products.get(id).cloned())
            .collect())
    }

    async fn insert_product(&self, product: &Product) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if inner.products.contains_key(&product.id) {
            return Err(StoreError::Duplicate(product.id.to_string()));
        }
        inner.products.insert(product.id, product.clone());
        Ok(())
    }

    async fn insert_order(&self, order: &Order) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if inner.orders.iter().any(|o| o.id == order.id) {
            return Err(StoreError::Duplicate(order.id.to_string()));
        }
        inner.orders.push(order.clone());
        Ok(())
    }

    async fn update_order_status(
        &self,
        establishment_id: Uuid,
        order_id: Uuid,
        status: OrderStatus,
    ) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        match inner
            .orders
            .iter_mut()
            .find(|o| o.id == order_id && o.establishment_id == establishment_id)
        {
            Some(order) => {
                order.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_order_canceled(
        &self,
        establishment_id: Uuid,
        order_id: Uuid,
    ) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        match inner
            .orders
            .iter_mut()
            .find(|o| o.id == order_id && o.establishment_id == establishment_id)
        {
            Some(order) => {
                order.canceled = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_orders(
        &self,
        establishment_id: Uuid,
        limit: u64,
        offset: u64,
    ) -> StoreResult<Vec<Order>> {
        let inner = self.inner.read().await;
        let mut orders: Vec<Order> = inner
            .orders
            .iter()
            .filter(|o| o.establishment_id == establishment_id)
            .cloned()
            .collect();
        // stable, so equal timestamps keep insertion order
        orders.sort_by_key(|o| o.created_at);
        Ok(orders
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .collect())
    }

    async fn record_audit(&self, entry: &AuditEntry) -> StoreResult<()> {
        self.inner.write().await.audit.push(entry.clone());
        Ok(())
    }
}
