use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    models::{Order, OrderLine, OrderStatus, OrderView, Product},
    services::admission::AdmittedOrder,
    store::{DocumentStore, StoreError},
};

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

/// One page of an order listing, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    page_size: u64,
}

impl PageRequest {
    /// Absent or non-positive values fall back to page 1 and the default
    /// size. The size is capped at [`MAX_PAGE_SIZE`].
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        let positive = |value: Option<i64>| {
            value
                .and_then(|v| u64::try_from(v).ok())
                .filter(|v| *v > 0)
        };
        Self {
            page: positive(page).unwrap_or(1),
            page_size: positive(page_size)
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .min(MAX_PAGE_SIZE),
        }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Rows to skip. Saturates at `i64::MAX`, the largest offset Postgres takes.
    pub fn offset(&self) -> u64 {
        (self.page - 1)
            .saturating_mul(self.page_size)
            .min(i64::MAX.unsigned_abs())
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Error)]
pub enum OrderStoreError {
    #[error("invalid order status {0:?}")]
    InvalidStatus(String),

    #[error("order not found")]
    OrderNotFound,

    #[error("persistence error")]
    Persistence(#[from] StoreError),
}

/// Order lifecycle on top of the document store.
#[derive(Clone)]
pub struct OrderStore {
    store: Arc<dyn DocumentStore>,
}

impl OrderStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Assign id and `created_at`, persist, and return the order with the
    /// product snapshots admission already loaded.
    pub async fn create(&self, admitted: AdmittedOrder) -> Result<OrderView, OrderStoreError> {
        let order = Order {
            id: Uuid::new_v4(),
            establishment_id: admitted.establishment_id,
            customer_name: admitted.customer_name,
            customer_phone: admitted.customer_phone,
            table: admitted.table,
            delivery: admitted.delivery,
            products: admitted
                .lines
                .iter()
                .map(|line| OrderLine {
                    product_id: line.product.id,
                    quantity: line.quantity,
                })
                .collect(),
            status: admitted.status,
            canceled: admitted.canceled,
            payment: admitted.payment,
            created_at: Utc::now(),
        };

        self.store.insert_order(&order).await?;

        let snapshots: HashMap<Uuid, Product> = admitted
            .lines
            .into_iter()
            .map(|line| (line.product.id, line.product))
            .collect();
        Ok(OrderView::from_order(order, |id| snapshots.get(id).cloned()))
    }

    /// Overwrites the status. Any of the five values is accepted from any state.
    pub async fn set_status(
        &self,
        establishment_id: Uuid,
        order_id: Uuid,
        status: &str,
    ) -> Result<OrderStatus, OrderStoreError> {
        let status = status
            .parse::<OrderStatus>()
            .map_err(|err| OrderStoreError::InvalidStatus(err.0))?;

        if !self
            .store
            .update_order_status(establishment_id, order_id, status)
            .await?
        {
            return Err(OrderStoreError::OrderNotFound);
        }
        Ok(status)
    }

    /// Idempotent: canceling a canceled order succeeds.
    pub async fn cancel(&self, establishment_id: Uuid, order_id: Uuid) -> Result<(), OrderStoreError> {
        if !self
            .store
            .mark_order_canceled(establishment_id, order_id)
            .await?
        {
            return Err(OrderStoreError::OrderNotFound);
        }
        Ok(())
    }

    pub async fn list(
        &self,
        establishment_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<OrderView>, OrderStoreError> {
        let orders = self
            .store
            .list_orders(establishment_id, page.page_size(), page.offset())
            .await?;

        let mut product_ids: Vec<Uuid> = orders
            .iter()
            .flat_map(|o| o.products.iter().map(|line| line.product_id))
            .collect();
        product_ids.sort_unstable();
        product_ids.dedup();

        let products: HashMap<Uuid, Product> = self
            .store
            .find_products(&product_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        Ok(orders
            .into_iter()
            .map(|order| OrderView::from_order(order, |id| products.get(id).cloned()))
            .collect())
    }
}
