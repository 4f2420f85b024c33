//! Document store boundary.
//!
//! The order core only needs a handful of lookups and writes on three
//! collections (establishments, products, orders). [`DocumentStore`] is that
//! surface; [`PgDocumentStore`] backs it with Postgres and
//! [`MemoryDocumentStore`] keeps everything in process.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{AuditEntry, Establishment, Order, OrderStatus, Product, ScheduleSlot};

pub mod memory;
pub mod postgres;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("ORM error")]
    Orm(#[from] sea_orm::DbErr),

    #[error("malformed document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("stored order has unknown status {0}")]
    UnknownStatus(String),

    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("value out of range for column {0}")]
    OutOfRange(&'static str),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_establishment(&self, id: Uuid) -> StoreResult<Option<Establishment>>;

    async fn find_establishment_by_email(&self, email: &str)
    -> StoreResult<Option<Establishment>>;

    async fn insert_establishment(&self, establishment: &Establishment) -> StoreResult<()>;

    /// Returns `false` when no establishment has that id.
    async fn update_schedule(&self, id: Uuid, schedule: &[ScheduleSlot]) -> StoreResult<bool>;

    async fn find_product(&self, id: Uuid) -> StoreResult<Option<Product>>;

    /// Missing ids are skipped, not reported.
    async fn find_products(&self, ids: &[Uuid]) -> StoreResult<Vec<Product>>;

    async fn insert_product(&self, product: &Product) -> StoreResult<()>;

    /// Persists the order together with its product lines in one unit.
    async fn insert_order(&self, order: &Order) -> StoreResult<()>;

    /// Returns `false` when the order does not exist under that establishment.
    async fn update_order_status(
        &self,
        establishment_id: Uuid,
        order_id: Uuid,
        status: OrderStatus,
    ) -> StoreResult<bool>;

    /// Returns `false` when the order does not exist under that establishment.
    async fn mark_order_canceled(&self, establishment_id: Uuid, order_id: Uuid)
    -> StoreResult<bool>;

    /// Orders of one establishment, `created_at` ascending.
    async fn list_orders(
        &self,
        establishment_id: Uuid,
        limit: u64,
        offset: u64,
    ) -> StoreResult<Vec<Order>>;

    async fn record_audit(&self, entry: &AuditEntry) -> StoreResult<()>;
}
