use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{OrderStatus, Payment};

/// Body of `POST /api/establishments/{id}/orders`.
///
/// Fields the admission checks report on are defaulted rather than required so
/// a missing value surfaces as a domain error instead of a JSON rejection.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub table: Option<String>,
    pub delivery: Option<DeliveryRequest>,
    #[serde(default)]
    pub products: Vec<OrderLineRequest>,
    pub payment: Option<Payment>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryRequest {
    #[serde(default)]
    pub is_delivery: bool,
    pub address: Option<AddressRequest>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AddressRequest {
    pub street: Option<String>,
    pub number: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub complement: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineRequest {
    pub product_id: Uuid,
    pub quantity: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderCreated {
    pub id: Uuid,
    pub status: OrderStatus,
    pub message: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}
