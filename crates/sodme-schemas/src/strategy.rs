use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyStatus {
    Draft,
    Active,
    Paused,
    Closed,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub id: Uuid,
    pub owner_account: String,
    pub status: StrategyStatus,
    pub is_default: bool,
}

/// Enumerated, closed settings surface. Unknown keys submitted over the wire
/// are rejected at the boundary rather than silently dropped — see
/// `deny_unknown_fields`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StrategySettings {
    pub auto_cleanup: bool,
    pub cleanup_on_exit: bool,
    pub allow_orphans: bool,
    pub max_spread_pct: f64,
    pub min_liquidity_score: f64,
    pub max_impact_bps: i64,
    pub require_approval_high_impact: bool,
    pub margin_buffer_pct: f64,
    pub check_margin_before_order: bool,
    pub max_loss_pct: f64,
    pub max_margin_utilization_pct: f64,
    pub auto_square_off_on_loss: bool,
    pub intraday: bool,
    pub square_off_time: NaiveTime,
    pub warning_time: NaiveTime,
    pub stale_order_hours: i64,
}

impl StrategySettings {
    /// Validate the ranges spec.md enumerates alongside each option.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=f64::INFINITY).contains(&self.max_spread_pct) {
            return Err("max_spread_pct must be >= 0".into());
        }
        if !(0.0..=100.0).contains(&self.min_liquidity_score) {
            return Err("min_liquidity_score must be in 0..100".into());
        }
        if !(0.0..=100.0).contains(&self.margin_buffer_pct) {
            return Err("margin_buffer_pct must be in 0..100".into());
        }
        if !(0.0..=100.0).contains(&self.max_loss_pct) {
            return Err("max_loss_pct must be in 0..100".into());
        }
        if !(0.0..=100.0).contains(&self.max_margin_utilization_pct) {
            return Err("max_margin_utilization_pct must be in 0..100".into());
        }
        if self.stale_order_hours < 0 {
            return Err("stale_order_hours must be >= 0".into());
        }
        Ok(())
    }

    pub fn sane_defaults() -> Self {
        Self {
            auto_cleanup: true,
            cleanup_on_exit: true,
            allow_orphans: false,
            max_spread_pct: 1.0,
            min_liquidity_score: 40.0,
            max_impact_bps: 50,
            require_approval_high_impact: true,
            margin_buffer_pct: 10.0,
            check_margin_before_order: true,
            max_loss_pct: 5.0,
            max_margin_utilization_pct: 90.0,
            auto_square_off_on_loss: true,
            intraday: true,
            square_off_time: NaiveTime::from_hms_opt(15, 20, 0).unwrap(),
            warning_time: NaiveTime::from_hms_opt(15, 15, 0).unwrap(),
            stale_order_hours: 4,
        }
    }
}
