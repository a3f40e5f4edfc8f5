use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Paise;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpreadTier {
    Tight,
    Normal,
    Wide,
    VeryWide,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiquidityTier {
    High,
    Medium,
    Low,
    Illiquid,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    ExecuteMarket,
    ExecuteLimit,
    AlertUser,
    RequireApproval,
    Reject,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedType {
    Market,
    Limit,
}

/// Sentinel impact value used when an order cannot be fully filled against
/// the visible book. Never a real basis-point figure.
pub const INSUFFICIENT_LIQUIDITY_IMPACT_BPS: i64 = 9999;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExecutionAnalysis {
    pub id: Uuid,
    pub order_id: Uuid,
    /// Set when this record supersedes/extends an earlier pre-trade record
    /// for the same order (append-only policy — see SPEC_FULL.md §9 Open
    /// Questions #3).
    pub correlates_with: Option<Uuid>,
    pub spread_abs: Paise,
    pub spread_pct: f64,
    pub liquidity_tier: LiquidityTier,
    pub liquidity_score: f64,
    pub estimated_fill_price: Paise,
    pub impact_bps: i64,
    pub impact_cost: Paise,
    pub levels_consumed: u32,
    pub can_fill_completely: bool,
    pub warnings: Vec<String>,
    pub recommended_action: RecommendedAction,
    pub recommended_type: Option<RecommendedType>,
    pub actual_fill_price: Option<Paise>,
    pub actual_slippage: Option<Paise>,
    pub quality_score: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub order_value: Paise,
    pub brokerage: Paise,
    pub stt: Paise,
    pub exchange_charges: Paise,
    pub gst: Paise,
    pub sebi_charges: Paise,
    pub stamp_duty: Paise,
    pub total_charges: Paise,
    pub net_cost: Paise,
}
