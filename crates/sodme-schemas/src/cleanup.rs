use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanupReason {
    PositionClosed,
    PositionReduced,
    Stale,
    ExpiredInstrument,
    Duplicate,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanupAction {
    Cancelled,
    Skipped,
    Failed,
}

/// Deterministic idempotency key: `{order_id, reason, day}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CleanupKey {
    pub order_id: Uuid,
    pub reason: CleanupReason,
    pub day: NaiveDate,
}

impl std::fmt::Display for CleanupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{:?}:{}", self.order_id, self.reason, self.day)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CleanupLog {
    pub key: CleanupKey,
    pub order_id: Uuid,
    pub reason: CleanupReason,
    pub action: CleanupAction,
    pub was_auto: bool,
    pub pre_position_qty: i64,
    pub post_position_qty: i64,
    pub ts_utc: DateTime<Utc>,
}
