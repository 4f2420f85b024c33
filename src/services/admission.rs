//! Order admission: every check a draft must pass before it is persisted.
//!
//! Checks run in a fixed order and stop at the first failure. Input-shape
//! checks come first; establishment, schedule and product lookups hit the
//! store and only run once the draft itself is well formed.

use chrono::NaiveDateTime;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    dto::orders::{AddressRequest, CreateOrderRequest},
    models::{Address, Delivery, OrderStatus, Payment, Product},
    services::schedule::is_open_at,
    store::{DocumentStore, StoreError},
};

/// Largest quantity a single line may carry; order lines are stored as `INTEGER`.
pub const MAX_LINE_QUANTITY: u32 = i32::MAX.unsigned_abs();

#[derive(Debug, Error)]
pub enum AdmissionError {
    #[error("customer name is required")]
    MissingCustomerName,

    #[error("cart is empty")]
    EmptyCart,

    #[error("choose either a table for dine-in or delivery with a complete address")]
    InvalidFulfillmentMode,

    #[error("establishment not found")]
    EstablishmentNotFound,

    #[error("establishment is currently closed")]
    EstablishmentClosed,

    #[error("invalid quantity for product {0}")]
    InvalidQuantity(Uuid),

    #[error("product {0} is unavailable")]
    ProductUnavailable(Uuid),

    #[error("persistence error")]
    Persistence(#[from] StoreError),
}

#[derive(Debug, Clone)]
pub struct AdmittedLine {
    pub product: Product,
    pub quantity: u32,
}

/// A draft that passed admission, shaped the way it will be stored.
#[derive(Debug, Clone)]
pub struct AdmittedOrder {
    pub establishment_id: Uuid,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub table: Option<String>,
    pub delivery: Delivery,
    pub lines: Vec<AdmittedLine>,
    pub payment: Option<Payment>,
    pub status: OrderStatus,
    pub canceled: bool,
}

enum Fulfillment {
    DineIn(String),
    Delivery(Address),
}

/// Validate `draft` for `establishment_id` as of `at` (server-local time).
pub async fn admit_order(
    store: &dyn DocumentStore,
    establishment_id: Uuid,
    draft: CreateOrderRequest,
    at: NaiveDateTime,
) -> Result<AdmittedOrder, AdmissionError> {
    let customer_name = draft.customer_name.trim();
    if customer_name.is_empty() {
        return Err(AdmissionError::MissingCustomerName);
    }

    if draft.products.is_empty() {
        return Err(AdmissionError::EmptyCart);
    }

    let fulfillment = fulfillment_of(&draft)?;

    let establishment = store
        .find_establishment(establishment_id)
        .await?
        .ok_or(AdmissionError::EstablishmentNotFound)?;

    if !is_open_at(&establishment.schedule, at) {
        return Err(AdmissionError::EstablishmentClosed);
    }

    let mut lines = Vec::with_capacity(draft.products.len());
    for line in &draft.products {
        let quantity = u32::try_from(line.quantity)
            .ok()
            .filter(|q| (1..=MAX_LINE_QUANTITY).contains(q))
            .ok_or(AdmissionError::InvalidQuantity(line.product_id))?;

        let product = store
            .find_product(line.product_id)
            .await?
            .filter(|p| p.establishment_id == establishment_id && p.active)
            .ok_or(AdmissionError::ProductUnavailable(line.product_id))?;

        lines.push(AdmittedLine { product, quantity });
    }

    let (table, delivery) = match fulfillment {
        Fulfillment::DineIn(table) => (Some(table), Delivery::dine_in()),
        Fulfillment::Delivery(address) => (
            None,
            Delivery {
                is_delivery: true,
                address: Some(address),
            },
        ),
    };

    Ok(AdmittedOrder {
        establishment_id,
        customer_name: customer_name.to_string(),
        customer_phone: draft
            .customer_phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty()),
        table,
        delivery,
        lines,
        payment: draft.payment,
        status: OrderStatus::Waiting,
        canceled: false,
    })
}

fn fulfillment_of(draft: &CreateOrderRequest) -> Result<Fulfillment, AdmissionError> {
    let wants_delivery = draft.delivery.as_ref().is_some_and(|d| d.is_delivery);
    let table = draft
        .table
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());

    match (wants_delivery, table) {
        (false, Some(table)) => Ok(Fulfillment::DineIn(table.to_string())),
        (true, None) => draft
            .delivery
            .as_ref()
            .and_then(|d| d.address.as_ref())
            .and_then(complete_address)
            .map(Fulfillment::Delivery)
            .ok_or(AdmissionError::InvalidFulfillmentMode),
        _ => Err(AdmissionError::InvalidFulfillmentMode),
    }
}

fn complete_address(address: &AddressRequest) -> Option<Address> {
    fn required(value: &Option<String>) -> Option<String> {
        value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
    }

    Some(Address {
        street: required(&address.street)?,
        number: required(&address.number)?,
        neighborhood: required(&address.neighborhood)?,
        city: required(&address.city)?,
        complement: address.complement.clone(),
    })
}
