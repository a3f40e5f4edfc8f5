use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generic envelope wrapping any typed payload broadcast over the internal
/// event path, matching the reference workspace's `EventEnvelope<T>` shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope<T> {
    pub event_id: Uuid,
    pub strategy_id: Option<Uuid>,
    pub ts_utc: DateTime<Utc>,
    pub topic: String,
    pub payload: T,
}

impl<T> EventEnvelope<T> {
    pub fn new(event_id: Uuid, strategy_id: Option<Uuid>, ts_utc: DateTime<Utc>, topic: impl Into<String>, payload: T) -> Self {
        Self {
            event_id,
            strategy_id,
            ts_utc,
            topic: topic.into(),
            payload,
        }
    }
}
