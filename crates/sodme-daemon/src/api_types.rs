//! Request and response types for every sodme-daemon HTTP endpoint.
//!
//! These are `Serialize + Deserialize` wire shapes, not domain types — the
//! actual business logic lives in the engine crates.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sodme_schemas::{
    Alert, AlertResponseAction, CostBreakdown, DepthSnapshot, ExecutionAnalysis, MarginSnapshot,
    Order, Position, Segment, Side, StrategySettings,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: &'static str,
    pub version: &'static str,
}

/// Typed error payload per SPEC_FULL.md's error-kind propagation policy.
/// Every failure response carries a kind, a short message, and a client
/// hint — never a bare string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub kind: String,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self { kind: kind.into(), message: message.into() }
    }
}

// ---------------------------------------------------------------------------
// POST /orders/analyze-execution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeExecutionRequest {
    pub order_id: Uuid,
    pub correlates_with: Option<Uuid>,
    pub instrument_token: i64,
    pub segment: Segment,
    pub side: Side,
    pub quantity: i64,
    pub depth: Option<DepthSnapshot>,
    pub settings: StrategySettings,
}

pub type AnalyzeExecutionResponse = ExecutionAnalysis;

// ---------------------------------------------------------------------------
// POST /orders/calculate-costs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateCostsRequest {
    pub order_id: Option<Uuid>,
    pub order_value: sodme_schemas::Paise,
    pub side: Side,
    pub segment: Segment,
}

pub type CalculateCostsResponse = CostBreakdown;

// ---------------------------------------------------------------------------
// POST /strategies/{id}/calculate-margin
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateMarginRequest {
    pub inputs: Vec<sodme_margin::InstrumentMarginInput>,
    pub vix: f64,
    pub price_move_pct: f64,
    pub regulatory_overrides: Vec<f64>,
    pub effective_date: NaiveDate,
    pub available_margin: sodme_schemas::Paise,
    pub buffer_pct: f64,
    pub source: sodme_schemas::MarginSource,
    /// Present only when the caller wants this calculation to also drive a
    /// Risk Monitor evaluation (scenario F's shortfall/auto-square-off path).
    pub risk: Option<RiskCheckRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskCheckRequest {
    pub loss_pct: f64,
    pub max_loss_pct: f64,
    pub auto_square_off_on_loss: bool,
    pub net_greeks: sodme_risk::NetGreeks,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateMarginResponse {
    pub snapshot: MarginSnapshot,
    pub risk_level: Option<&'static str>,
}

// ---------------------------------------------------------------------------
// GET /strategies/{id}/margin/history
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct MarginHistoryQuery {
    pub days: Option<i64>,
}

// ---------------------------------------------------------------------------
// orphaned-orders
// ---------------------------------------------------------------------------

/// Orders and positions are supplied by the caller rather than fetched from
/// a dedicated store: the reference surface (spec.md §6) is explicitly
/// representative, and no persisted order/position store is part of this
/// system — `sodme-gateway` is the broker's live read path, `sodme-db` owns
/// only the analysis/margin/alert tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrphanedOrdersRequest {
    pub orders: Vec<Order>,
    pub positions: Vec<Position>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrphanedOrderReport {
    pub order_id: Uuid,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrphanedOrdersResponse {
    pub orphaned: Vec<OrphanedOrderReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupOrphanedOrdersResponse {
    pub actions: Vec<CleanupActionReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupActionReport {
    pub order_id: Uuid,
    pub reason: String,
    pub action: String,
}

// ---------------------------------------------------------------------------
// alerts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RespondToAlertRequest {
    pub action: AlertResponseAction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsListResponse {
    pub alerts: Vec<Alert>,
}

pub fn now() -> DateTime<Utc> {
    Utc::now()
}
