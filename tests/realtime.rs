mod common;

use chrono::Utc;
use common::{SECRET, at, dine_in, open_today, seed_establishment, seed_product, test_state};
use jsonwebtoken::{EncodingKey, Header, encode};
use kitchen_orders_api::{
    dto::auth::Claims,
    middleware::auth::issue_token,
    realtime::gateway::{
        ConnectionState, HandshakeQuery, HandshakeRejection, Session, authenticate,
    },
    services::order_service::place_order_at,
};
use uuid::Uuid;

fn query(token: Option<&str>) -> HandshakeQuery {
    HandshakeQuery {
        token: token.map(str::to_string),
    }
}

#[test]
fn handshake_without_token_closes_with_4008() {
    for q in [query(None), query(Some("")), query(Some("   "))] {
        let err = authenticate(&q, SECRET).unwrap_err();
        assert_eq!(err, HandshakeRejection::MissingToken);
        assert_eq!(err.close_code(), 4008);
        assert_eq!(err.to_string(), "token not provided");
    }
}

#[test]
fn handshake_with_bad_token_closes_with_4001() {
    let foreign = issue_token(Uuid::new_v4(), "another-secret").unwrap();
    for token in ["not-a-jwt", foreign.as_str()] {
        let err = authenticate(&query(Some(token)), SECRET).unwrap_err();
        assert_eq!(err, HandshakeRejection::InvalidToken);
        assert_eq!(err.close_code(), 4001);
        assert_eq!(err.to_string(), "invalid token");
    }
}

#[test]
fn handshake_with_expired_token_closes_with_4001() {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: Uuid::new_v4().to_string(),
        exp: (now - 3600) as usize,
        iat: (now - 7200) as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    let err = authenticate(&query(Some(&token)), SECRET).unwrap_err();
    assert_eq!(err, HandshakeRejection::InvalidToken);
    assert_eq!(err.close_code(), 4001);
}

#[test]
fn repeated_token_parameter_is_an_invalid_token() {
    let uri: axum::http::Uri = "/ws?token=a&token=b".parse().unwrap();
    assert_eq!(
        HandshakeQuery::from_uri(&uri).unwrap_err(),
        HandshakeRejection::InvalidToken
    );

    let uri: axum::http::Uri = "/ws".parse().unwrap();
    assert!(HandshakeQuery::from_uri(&uri).unwrap().token.is_none());
}

#[test]
fn handshake_resolves_tenant_from_subject() {
    let establishment_id = Uuid::new_v4();
    let token = issue_token(establishment_id, SECRET).unwrap();

    assert_eq!(
        authenticate(&query(Some(&token)), SECRET).unwrap(),
        establishment_id.to_string()
    );
    let bearer = format!("Bearer {token}");
    assert_eq!(
        authenticate(&query(Some(&bearer)), SECRET).unwrap(),
        establishment_id.to_string()
    );
}

#[test]
fn session_moves_through_its_states_and_cleans_up() {
    let (state, _) = test_state();
    let establishment_id = Uuid::new_v4();
    let token = issue_token(establishment_id, SECRET).unwrap();
    let tenant = establishment_id.to_string();

    let mut session = Session::new(state.connections.clone());
    assert_eq!(session.state(), ConnectionState::Connecting);
    assert!(session.open().is_none());

    session.authenticate(&query(Some(&token)), SECRET).unwrap();
    assert_eq!(session.state(), ConnectionState::Authenticated);
    assert_eq!(state.connections.connection_count(&tenant), 0);

    let _rx = session.open().expect("queue");
    assert_eq!(session.state(), ConnectionState::Open);
    assert_eq!(state.connections.connection_count(&tenant), 1);

    session.close();
    session.close();
    assert_eq!(session.state(), ConnectionState::Closed);
    assert_eq!(state.connections.tenant_count(), 0);
}

#[test]
fn rejected_session_never_registers() {
    let (state, _) = test_state();
    let mut session = Session::new(state.connections.clone());

    let err = session.authenticate(&query(None), SECRET).unwrap_err();
    assert_eq!(err.close_code(), 4008);
    assert_eq!(session.state(), ConnectionState::Closed);
    assert!(session.open().is_none());
    assert_eq!(state.connections.tenant_count(), 0);
}

#[test]
fn dropping_an_open_session_unregisters_it() {
    let (state, _) = test_state();
    let token = issue_token(Uuid::new_v4(), SECRET).unwrap();

    let mut first = Session::new(state.connections.clone());
    first.authenticate(&query(Some(&token)), SECRET).unwrap();
    let _rx1 = first.open();
    let mut second = Session::new(state.connections.clone());
    second.authenticate(&query(Some(&token)), SECRET).unwrap();
    let _rx2 = second.open();

    let tenant = first.tenant_id().unwrap().to_string();
    assert_eq!(state.connections.connection_count(&tenant), 2);

    drop(first);
    assert_eq!(state.connections.connection_count(&tenant), 1);
    drop(second);
    assert_eq!(state.connections.tenant_count(), 0);
}

#[tokio::test]
async fn placed_order_is_pushed_to_open_dashboards() -> anyhow::Result<()> {
    let (state, store) = test_state();
    let est = seed_establishment(&store, open_today()).await;
    let product = seed_product(&store, est.id, true).await;
    let token = issue_token(est.id, SECRET)?;

    let mut session = Session::new(state.connections.clone());
    session
        .authenticate(&query(Some(&token)), SECRET)
        .map_err(anyhow::Error::from)?;
    let mut rx = session.open().expect("queue");

    let mut other = Session::new(state.connections.clone());
    other
        .authenticate(&query(Some(&issue_token(Uuid::new_v4(), SECRET)?)), SECRET)
        .map_err(anyhow::Error::from)?;
    let mut other_rx = other.open().expect("queue");

    let created = place_order_at(&state, est.id, dine_in(product.id, 3), at(12, 0)).await?;

    let payload = rx.try_recv()?;
    let json: serde_json::Value = serde_json::from_str(payload.as_str())?;
    assert_eq!(json["type"], "NEW_ORDER");
    assert_eq!(json["data"]["id"], created.id.to_string());
    assert_eq!(json["data"]["status"], "WAITING");
    assert_eq!(json["data"]["canceled"], false);
    assert_eq!(json["data"]["delivery"]["isDelivery"], false);
    assert_eq!(json["data"]["products"][0]["quantity"], 3);
    assert_eq!(json["data"]["products"][0]["product"]["name"], "X-Burger");

    assert!(other_rx.try_recv().is_err());
    assert_eq!(store.audit_actions().await, ["order_created"]);
    Ok(())
}

#[tokio::test]
async fn rejected_order_is_not_pushed() {
    let (state, store) = test_state();
    let est = seed_establishment(&store, open_today()).await;
    let product = seed_product(&store, est.id, false).await;
    let token = issue_token(est.id, SECRET).unwrap();

    let mut session = Session::new(state.connections.clone());
    session.authenticate(&query(Some(&token)), SECRET).unwrap();
    let mut rx = session.open().unwrap();

    assert!(
        place_order_at(&state, est.id, dine_in(product.id, 1), at(12, 0))
            .await
            .is_err()
    );
    assert!(rx.try_recv().is_err());
    assert_eq!(store.order_count().await, 0);
}
