use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Paise;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Buy,
    Sell,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    Market,
    Limit,
    Stop,
    StopMarket,
    Twap,
    Iceberg,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Open,
    Filled,
    PartiallyFilled,
    Cancelled,
    Rejected,
    Expired,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanReason {
    PositionClosed,
    PositionReduced,
    NoCoveringPosition,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub strategy_id: Uuid,
    pub instrument_token: i64,
    pub side: Side,
    pub order_type: OrderType,
    pub quantity_lots: i64,
    pub price: Option<Paise>,
    pub trigger_price: Option<Paise>,
    pub status: OrderStatus,
    pub parent_position: Option<Uuid>,
    pub is_orphan: bool,
    pub orphan_reason: Option<OrphanReason>,
    pub placed_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub idempotency_key: String,
}

impl Order {
    /// Invariant: if `is_orphan`, `parent_position` is either absent or
    /// points at a parent whose quantity is known (by the caller) to be zero.
    /// This helper checks the syntactic half of the invariant the type alone
    /// can express; the zero-quantity half requires the position store.
    pub fn orphan_invariant_holds_syntactically(&self) -> bool {
        if !self.is_orphan {
            return true;
        }
        self.parent_position.is_none() || self.orphan_reason.is_some()
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status,
            OrderStatus::Filled
                | OrderStatus::Cancelled
                | OrderStatus::Rejected
                | OrderStatus::Expired
        )
    }

    pub fn is_stop_or_target(&self) -> bool {
        matches!(self.order_type, OrderType::Stop | OrderType::StopMarket)
    }

    pub fn age_hours(&self, now: DateTime<Utc>) -> f64 {
        (now - self.placed_at).num_minutes() as f64 / 60.0
    }
}
