use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    models::AuditEntry,
    store::{DocumentStore, StoreResult},
};

pub async fn log_audit(
    store: &dyn DocumentStore,
    establishment_id: Option<Uuid>,
    action: &str,
    resource: Option<&str>,
    metadata: Option<Value>,
) -> StoreResult<()> {
    let entry = AuditEntry {
        id: Uuid::new_v4(),
        establishment_id,
        action: action.to_string(),
        resource: resource.map(str::to_string),
        metadata,
        created_at: Utc::now(),
    };
    store.record_audit(&entry).await
}
