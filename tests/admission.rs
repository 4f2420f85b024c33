mod common;

use common::{at, delivery, dine_in, full_address, open_today, seed_establishment, seed_product};
use kitchen_orders_api::{
    dto::orders::{AddressRequest, CreateOrderRequest, DeliveryRequest, OrderLineRequest},
    models::OrderStatus,
    services::admission::{AdmissionError, MAX_LINE_QUANTITY, admit_order},
    store::MemoryDocumentStore,
};
use uuid::Uuid;

#[tokio::test]
async fn admits_open_dine_in_order() -> anyhow::Result<()> {
    let store = MemoryDocumentStore::new();
    let est = seed_establishment(&store, open_today()).await;
    let p1 = seed_product(&store, est.id, true).await;

    let admitted = admit_order(&store, est.id, dine_in(p1.id, 2), at(12, 0)).await?;

    assert_eq!(admitted.customer_name, "Ana");
    assert_eq!(admitted.status, OrderStatus::Waiting);
    assert!(!admitted.canceled);
    assert!(!admitted.delivery.is_delivery);
    assert!(admitted.delivery.address.is_none());
    assert_eq!(admitted.table.as_deref(), Some("5"));
    assert_eq!(admitted.lines.len(), 1);
    assert_eq!(admitted.lines[0].product.id, p1.id);
    assert_eq!(admitted.lines[0].quantity, 2);
    Ok(())
}

#[tokio::test]
async fn delivery_order_keeps_address_and_drops_table() -> anyhow::Result<()> {
    let store = MemoryDocumentStore::new();
    let est = seed_establishment(&store, open_today()).await;
    let p1 = seed_product(&store, est.id, true).await;

    let admitted = admit_order(&store, est.id, delivery(p1.id, full_address()), at(19, 30)).await?;

    assert!(admitted.delivery.is_delivery);
    let address = admitted.delivery.address.expect("address kept");
    assert_eq!(address.street, "Rua das Flores");
    assert_eq!(address.city, "Recife");
    assert!(admitted.table.is_none());
    assert_eq!(admitted.customer_phone.as_deref(), Some("+55 81 99999-0000"));
    Ok(())
}

#[tokio::test]
async fn blank_customer_name_is_rejected_first() {
    let store = MemoryDocumentStore::new();
    // no establishment at all: the name check must fire before any lookup
    let mut draft = dine_in(Uuid::new_v4(), 1);
    draft.customer_name = "   ".into();
    draft.products.clear();

    let err = admit_order(&store, Uuid::new_v4(), draft, at(12, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AdmissionError::MissingCustomerName));
}

#[tokio::test]
async fn empty_cart_is_rejected_even_when_everything_else_is_valid() {
    let store = MemoryDocumentStore::new();
    let est = seed_establishment(&store, open_today()).await;
    let mut draft = dine_in(Uuid::new_v4(), 1);
    draft.products.clear();

    let err = admit_order(&store, est.id, draft, at(12, 0)).await.unwrap_err();
    assert!(matches!(err, AdmissionError::EmptyCart));
}

#[tokio::test]
async fn table_and_delivery_together_are_rejected() {
    let store = MemoryDocumentStore::new();
    let est = seed_establishment(&store, open_today()).await;
    let p1 = seed_product(&store, est.id, true).await;
    let mut draft = delivery(p1.id, full_address());
    draft.table = Some("7".into());

    let err = admit_order(&store, est.id, draft, at(12, 0)).await.unwrap_err();
    assert!(matches!(err, AdmissionError::InvalidFulfillmentMode));
}

#[tokio::test]
async fn neither_table_nor_delivery_is_rejected() {
    let store = MemoryDocumentStore::new();
    let est = seed_establishment(&store, open_today()).await;
    let p1 = seed_product(&store, est.id, true).await;

    let mut draft = dine_in(p1.id, 1);
    draft.table = Some("  ".into());
    let err = admit_order(&store, est.id, draft, at(12, 0)).await.unwrap_err();
    assert!(matches!(err, AdmissionError::InvalidFulfillmentMode));

    let mut draft = dine_in(p1.id, 1);
    draft.table = None;
    draft.delivery = Some(DeliveryRequest {
        is_delivery: false,
        address: Some(full_address()),
    });
    let err = admit_order(&store, est.id, draft, at(12, 0)).await.unwrap_err();
    assert!(matches!(err, AdmissionError::InvalidFulfillmentMode));
}

#[tokio::test]
async fn incomplete_address_is_rejected() {
    let store = MemoryDocumentStore::new();
    let est = seed_establishment(&store, open_today()).await;
    let p1 = seed_product(&store, est.id, true).await;

    let address = AddressRequest {
        neighborhood: Some(" ".into()),
        ..full_address()
    };
    let err = admit_order(&store, est.id, delivery(p1.id, address), at(12, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AdmissionError::InvalidFulfillmentMode));

    let mut draft = delivery(p1.id, full_address());
    if let Some(d) = draft.delivery.as_mut() {
        d.address = None;
    }
    let err = admit_order(&store, est.id, draft, at(12, 0)).await.unwrap_err();
    assert!(matches!(err, AdmissionError::InvalidFulfillmentMode));
}

#[tokio::test]
async fn unknown_establishment_is_reported() {
    let store = MemoryDocumentStore::new();

    let err = admit_order(&store, Uuid::new_v4(), dine_in(Uuid::new_v4(), 1), at(12, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AdmissionError::EstablishmentNotFound));
}

#[tokio::test]
async fn closed_establishment_is_rejected_before_product_checks() {
    let store = MemoryDocumentStore::new();
    let est = seed_establishment(&store, open_today()).await;

    // product does not exist; closing time must be reported instead
    let err = admit_order(&store, est.id, dine_in(Uuid::new_v4(), 1), at(22, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AdmissionError::EstablishmentClosed));

    let no_slots = seed_establishment(&store, Vec::new()).await;
    let err = admit_order(&store, no_slots.id, dine_in(Uuid::new_v4(), 1), at(12, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AdmissionError::EstablishmentClosed));
}

#[tokio::test]
async fn out_of_range_quantity_names_the_product() {
    let store = MemoryDocumentStore::new();
    let est = seed_establishment(&store, open_today()).await;
    let p1 = seed_product(&store, est.id, true).await;

    for quantity in [0, -3, i64::from(i32::MAX) + 1, i64::from(u32::MAX)] {
        let err = admit_order(&store, est.id, dine_in(p1.id, quantity), at(12, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, AdmissionError::InvalidQuantity(id) if id == p1.id));
        assert!(err.to_string().contains(&p1.id.to_string()));
    }
}

#[tokio::test]
async fn inactive_product_is_unavailable_and_nothing_is_stored() {
    let store = MemoryDocumentStore::new();
    let est = seed_establishment(&store, open_today()).await;
    let p1 = seed_product(&store, est.id, false).await;

    let err = admit_order(&store, est.id, dine_in(p1.id, 2), at(12, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AdmissionError::ProductUnavailable(id) if id == p1.id));
    assert_eq!(store.order_count().await, 0);
}

#[tokio::test]
async fn foreign_or_missing_product_is_unavailable() {
    let store = MemoryDocumentStore::new();
    let est = seed_establishment(&store, open_today()).await;
    let other = seed_establishment(&store, open_today()).await;
    let foreign = seed_product(&store, other.id, true).await;
    let mine = seed_product(&store, est.id, true).await;

    let draft = CreateOrderRequest {
        products: vec![
            OrderLineRequest {
                product_id: mine.id,
                quantity: 1,
            },
            OrderLineRequest {
                product_id: foreign.id,
                quantity: 1,
            },
        ],
        ..dine_in(mine.id, 1)
    };
    let err = admit_order(&store, est.id, draft, at(12, 0)).await.unwrap_err();
    assert!(matches!(err, AdmissionError::ProductUnavailable(id) if id == foreign.id));

    let missing = Uuid::new_v4();
    let err = admit_order(&store, est.id, dine_in(missing, 1), at(12, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AdmissionError::ProductUnavailable(id) if id == missing));
}

#[tokio::test]
async fn largest_storable_quantity_is_accepted() -> anyhow::Result<()> {
    let store = MemoryDocumentStore::new();
    let est = seed_establishment(&store, open_today()).await;
    let p1 = seed_product(&store, est.id, true).await;

    let admitted = admit_order(
        &store,
        est.id,
        dine_in(p1.id, i64::from(MAX_LINE_QUANTITY)),
        at(12, 0),
    )
    .await?;
    assert_eq!(admitted.lines[0].quantity, MAX_LINE_QUANTITY);
    assert_eq!(i64::from(MAX_LINE_QUANTITY), i64::from(i32::MAX));
    Ok(())
}
