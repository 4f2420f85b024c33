#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Utc};
use kitchen_orders_api::{
    dto::orders::{AddressRequest, CreateOrderRequest, DeliveryRequest, OrderLineRequest},
    models::{Establishment, Ingredient, Product, ScheduleSlot},
    realtime::ConnectionRegistry,
    state::AppState,
    store::{DocumentStore, MemoryDocumentStore},
};
use uuid::Uuid;

pub const SECRET: &str = "test-secret";

/// A fixed local instant on 2026-10-14.
pub fn at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 14)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .expect("valid test instant")
}

pub fn day_of(instant: NaiveDateTime) -> u8 {
    instant.weekday().num_days_from_sunday() as u8
}

pub fn slot(day_of_week: u8, opens: &str, closes: &str, closed: bool) -> ScheduleSlot {
    ScheduleSlot {
        day_of_week,
        opens: opens.to_string(),
        closes: closes.to_string(),
        closed,
    }
}

/// 08:00-22:00 on the day of [`at`].
pub fn open_today() -> Vec<ScheduleSlot> {
    vec![slot(day_of(at(12, 0)), "08:00", "22:00", false)]
}

pub fn test_state() -> (AppState, Arc<MemoryDocumentStore>) {
    let store = Arc::new(MemoryDocumentStore::new());
    let state = AppState::new(store.clone(), ConnectionRegistry::new(), SECRET);
    (state, store)
}

pub async fn seed_establishment(
    store: &MemoryDocumentStore,
    schedule: Vec<ScheduleSlot>,
) -> Establishment {
    let id = Uuid::new_v4();
    let establishment = Establishment {
        id,
        name: "Cantina".into(),
        email: format!("{id}@example.com"),
        phone: None,
        password_hash: "dummy".into(),
        schedule,
        created_at: Utc::now(),
    };
    store
        .insert_establishment(&establishment)
        .await
        .expect("insert establishment");
    establishment
}

pub async fn seed_product(store: &MemoryDocumentStore, establishment_id: Uuid, active: bool) -> Product {
    let product = Product {
        id: Uuid::new_v4(),
        establishment_id,
        category_id: None,
        name: "X-Burger".into(),
        description: Some("house burger".into()),
        price: 2500,
        active,
        ingredients: vec![Ingredient {
            name: "cheese".into(),
            icon: "🧀".into(),
        }],
        created_at: Utc::now(),
    };
    store.insert_product(&product).await.expect("insert product");
    product
}

pub fn dine_in(product_id: Uuid, quantity: i64) -> CreateOrderRequest {
    CreateOrderRequest {
        customer_name: "Ana".into(),
        table: Some("5".into()),
        products: vec![OrderLineRequest {
            product_id,
            quantity,
        }],
        ..Default::default()
    }
}

pub fn full_address() -> AddressRequest {
    AddressRequest {
        street: Some("Rua das Flores".into()),
        number: Some("42".into()),
        neighborhood: Some("Centro".into()),
        city: Some("Recife".into()),
        complement: None,
    }
}

pub fn delivery(product_id: Uuid, address: AddressRequest) -> CreateOrderRequest {
    CreateOrderRequest {
        customer_name: "Bruno".into(),
        customer_phone: Some("+55 81 99999-0000".into()),
        delivery: Some(DeliveryRequest {
            is_delivery: true,
            address: Some(address),
        }),
        products: vec![OrderLineRequest {
            product_id,
            quantity: 1,
        }],
        ..Default::default()
    }
}
