use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use super::{DocumentStore, StoreError, StoreResult};
use crate::{
    entity::{
        audit_logs::ActiveModel as AuditLogActive,
        establishments::{
            ActiveModel as EstablishmentActive, Column as EstCol, Entity as Establishments,
            Model as EstablishmentModel,
        },
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        products::{ActiveModel as ProductActive, Column as ProdCol, Entity as Products, Model as ProductModel},
    },
    models::{AuditEntry, Establishment, Order, OrderLine, OrderStatus, Product, ScheduleSlot},
};

/// Postgres-backed store. The sea-orm connection wraps the shared sqlx pool.
#[derive(Clone)]
pub struct PgDocumentStore {
    orm: DatabaseConnection,
}

impl PgDocumentStore {
    pub fn new(orm: DatabaseConnection) -> Self {
        Self { orm }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn find_establishment(&self, id: Uuid) -> StoreResult<Option<Establishment>> {
        Establishments::find_by_id(id)
            .one(&self.orm)
            .await?
            .map(establishment_from_entity)
            .transpose()
    }

    async fn find_establishment_by_email(
        &self,
        email: &str,
    ) -> StoreResult<Option<Establishment>> {
        Establishments::find()
            .filter(EstCol::Email.eq(email))
            .one(&self.orm)
            .await?
            .map(establishment_from_entity)
            .transpose()
    }

    async fn insert_establishment(&self, establishment: &Establishment) -> StoreResult<()> {
        EstablishmentActive {
            id: Set(establishment.id),
            name: Set(establishment.name.clone()),
            email: Set(establishment.email.clone()),
            phone: Set(establishment.phone.clone()),
            password_hash: Set(establishment.password_hash.clone()),
            schedule: Set(serde_json::to_value(&establishment.schedule)?),
            created_at: Set(establishment.created_at.into()),
        }
        .insert(&self.orm)
        .await
        .map_err(|err| match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                StoreError::Duplicate(establishment.email.clone())
            }
            _ => StoreError::from(err),
        })?;
        Ok(())
    }

    async fn update_schedule(&self, id: Uuid, schedule: &[ScheduleSlot]) -> StoreResult<bool> {
        let result = Establishments::update_many()
            .col_expr(EstCol::Schedule, Expr::value(serde_json::to_value(schedule)?))
            .filter(EstCol::Id.eq(id))
            .exec(&self.orm)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn find_product(&self, id: Uuid) -> StoreResult<Option<Product>> {
        Products::find_by_id(id)
            .one(&self.orm)
            .await?
            .map(product_from_entity)
            .transpose()
    }

    async fn find_products(&self, ids: &[Uuid]) -> StoreResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Products::find()
            .filter(ProdCol::Id.is_in(ids.iter().copied()))
            .all(&self.orm)
            .await?
            .into_iter()
            .map(product_from_entity)
            .collect()
    }

    async fn insert_product(&self, product: &Product) -> StoreResult<()> {
        ProductActive {
            id: Set(product.id),
            establishment_id: Set(product.establishment_id),
            category_id: Set(product.category_id),
            name: Set(product.name.clone()),
            description: Set(product.description.clone()),
            price: Set(product.price),
            active: Set(product.active),
            ingredients: Set(serde_json::to_value(&product.ingredients)?),
            created_at: Set(product.created_at.into()),
        }
        .insert(&self.orm)
        .await?;
        Ok(())
    }

    async fn insert_order(&self, order: &Order) -> StoreResult<()> {
        let txn = self.orm.begin().await?;

        OrderActive {
            id: Set(order.id),
            establishment_id: Set(order.establishment_id),
            customer_name: Set(order.customer_name.clone()),
            customer_phone: Set(order.customer_phone.clone()),
            table_label: Set(order.table.clone()),
            delivery: Set(serde_json::to_value(&order.delivery)?),
            status: Set(order.status.as_str().to_string()),
            canceled: Set(order.canceled),
            payment: Set(order.payment.as_ref().map(serde_json::to_value).transpose()?),
            created_at: Set(order.created_at.into()),
        }
        .insert(&txn)
        .await?;

        for (position, line) in order.products.iter().enumerate() {
            OrderItemActive {
                id: Set(Uuid::new_v4()),
                order_id: Set(order.id),
                product_id: Set(line.product_id),
                quantity: Set(
                    i32::try_from(line.quantity)
                        .map_err(|_| StoreError::OutOfRange("order_items.quantity"))?,
                ),
                position: Set(
                    i32::try_from(position)
                        .map_err(|_| StoreError::OutOfRange("order_items.position"))?,
                ),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(())
    }

    async fn update_order_status(
        &self,
        establishment_id: Uuid,
        order_id: Uuid,
        status: OrderStatus,
    ) -> StoreResult<bool> {
        let result = Orders::update_many()
            .col_expr(OrderCol::Status, Expr::value(status.as_str()))
            .filter(OrderCol::Id.eq(order_id))
            .filter(OrderCol::EstablishmentId.eq(establishment_id))
            .exec(&self.orm)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn mark_order_canceled(
        &self,
        establishment_id: Uuid,
        order_id: Uuid,
    ) -> StoreResult<bool> {
        let result = Orders::update_many()
            .col_expr(OrderCol::Canceled, Expr::value(true))
            .filter(OrderCol::Id.eq(order_id))
            .filter(OrderCol::EstablishmentId.eq(establishment_id))
            .exec(&self.orm)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn list_orders(
        &self,
        establishment_id: Uuid,
        limit: u64,
        offset: u64,
    ) -> StoreResult<Vec<Order>> {
        let orders = Orders::find()
            .filter(OrderCol::EstablishmentId.eq(establishment_id))
            .order_by_asc(OrderCol::CreatedAt)
            .order_by_asc(OrderCol::Id)
            .limit(limit)
            .offset(offset)
            .all(&self.orm)
            .await?;

        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
        let mut lines: HashMap<Uuid, Vec<OrderItemModel>> = HashMap::new();
        for item in OrderItems::find()
            .filter(OrderItemCol::OrderId.is_in(order_ids))
            .order_by_asc(OrderItemCol::Position)
            .all(&self.orm)
            .await?
        {
            lines.entry(item.order_id).or_default().push(item);
        }

        orders
            .into_iter()
            .map(|model| {
                let items = lines.remove(&model.id).unwrap_or_default();
                order_from_entity(model, items)
            })
            .collect()
    }

    async fn record_audit(&self, entry: &AuditEntry) -> StoreResult<()> {
        AuditLogActive {
            id: Set(entry.id),
            establishment_id: Set(entry.establishment_id),
            action: Set(entry.action.clone()),
            resource: Set(entry.resource.clone()),
            metadata: Set(entry.metadata.clone()),
            created_at: Set(entry.created_at.into()),
        }
        .insert(&self.orm)
        .await?;
        Ok(())
    }
}

fn establishment_from_entity(model: EstablishmentModel) -> StoreResult<Establishment> {
    Ok(Establishment {
        id: model.id,
        name: model.name,
        email: model.email,
        phone: model.phone,
        password_hash: model.password_hash,
        schedule: serde_json::from_value(model.schedule)?,
        created_at: model.created_at.with_timezone(&Utc),
    })
}

fn product_from_entity(model: ProductModel) -> StoreResult<Product> {
    Ok(Product {
        id: model.id,
        establishment_id: model.establishment_id,
        category_id: model.category_id,
        name: model.name,
        description: model.description,
        price: model.price,
        active: model.active,
        ingredients: serde_json::from_value(model.ingredients)?,
        created_at: model.created_at.with_timezone(&Utc),
    })
}

fn order_from_entity(model: OrderModel, items: Vec<OrderItemModel>) -> StoreResult<Order> {
    let status = model
        .status
        .parse::<OrderStatus>()
        .map_err(|err| StoreError::UnknownStatus(err.0))?;

    let products = items
        .into_iter()
        .map(|item| {
            Ok(OrderLine {
                product_id: item.product_id,
                quantity: u32::try_from(item.quantity)
                    .map_err(|_| StoreError::OutOfRange("order_items.quantity"))?,
            })
        })
        .collect::<StoreResult<Vec<_>>>()?;

    Ok(Order {
        id: model.id,
        establishment_id: model.establishment_id,
        customer_name: model.customer_name,
        customer_phone: model.customer_phone,
        table: model.table_label,
        delivery: serde_json::from_value(model.delivery)?,
        products,
        status,
        canceled: model.canceled,
        payment: model.payment.map(serde_json::from_value).transpose()?,
        created_at: model.created_at.with_timezone(&Utc),
    })
}
