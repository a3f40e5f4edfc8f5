use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::margin::Severity;

/// Closed set of typed alert events — the bus accepts only these variants
/// (spec.md §9 "event emitters with string topics" redesign).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertPayload {
    WideSpread {
        order_id: Uuid,
        spread_pct: f64,
    },
    HighImpact {
        order_id: Uuid,
        impact_bps: i64,
    },
    InsufficientLiquidity {
        order_id: Uuid,
        requested_qty: i64,
        available_qty: i64,
    },
    MarginWarning {
        strategy_id: Uuid,
        utilization_pct: f64,
    },
    MarginShortfall {
        strategy_id: Uuid,
        shortfall: crate::money::Paise,
        deadline: DateTime<Utc>,
    },
    MarginIncreased {
        strategy_id: Uuid,
        pct_change: f64,
    },
    RiskBreach {
        strategy_id: Uuid,
        level: String,
    },
    OrphanedOrder {
        order_id: Uuid,
        reason: String,
        was_auto: bool,
    },
    GreeksRisk {
        strategy_id: Uuid,
        greek: String,
        classification: String,
    },
    SettlementComplete {
        instrument_token: i64,
    },
    HousekeepingComplete {
        strategy_id: Uuid,
        actions_taken: u32,
    },
}

impl AlertPayload {
    pub fn type_name(&self) -> &'static str {
        match self {
            AlertPayload::WideSpread { .. } => "WIDE_SPREAD",
            AlertPayload::HighImpact { .. } => "HIGH_IMPACT",
            AlertPayload::InsufficientLiquidity { .. } => "INSUFFICIENT_LIQUIDITY",
            AlertPayload::MarginWarning { .. } => "MARGIN_WARNING",
            AlertPayload::MarginShortfall { .. } => "MARGIN_SHORTFALL",
            AlertPayload::MarginIncreased { .. } => "MARGIN_INCREASED",
            AlertPayload::RiskBreach { .. } => "RISK_BREACH",
            AlertPayload::OrphanedOrder { .. } => "ORPHANED_ORDER",
            AlertPayload::GreeksRisk { .. } => "GREEKS_RISK",
            AlertPayload::SettlementComplete { .. } => "SETTLEMENT_COMPLETE",
            AlertPayload::HousekeepingComplete { .. } => "HOUSEKEEPING_COMPLETE",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertResponseAction {
    Acknowledge,
    Override,
    Dismiss,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlertResponse {
    pub action: AlertResponseAction,
    pub responded_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub strategy_id: Option<Uuid>,
    pub severity: Severity,
    pub title: String,
    pub body: String,
    pub payload: AlertPayload,
    pub proposed_actions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub response: Option<AlertResponse>,
    pub read: bool,
}
