use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Margin-utilization ladder, L1 (normal) through L6 (emergency/shortfall).
/// Ordered so `max` across loss/utilization/greeks picks the worst level.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskLevel {
    L1,
    L2,
    L3,
    L4,
    L5,
    L6,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::L1 => "L1",
            RiskLevel::L2 => "L2",
            RiskLevel::L3 => "L3",
            RiskLevel::L4 => "L4",
            RiskLevel::L5 => "L5",
            RiskLevel::L6 => "L6",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GreekClass {
    Low,
    Medium,
    High,
    Extreme,
}

/// Absolute-value thresholds for one Greek. Exact equality takes the
/// stricter tier, consistent with the spread/impact/VIX boundary rule.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GreekThreshold {
    pub medium: f64,
    pub high: f64,
    pub extreme: f64,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GreekThresholds {
    pub delta: GreekThreshold,
    pub gamma: GreekThreshold,
    pub vega: GreekThreshold,
    pub theta: GreekThreshold,
}

impl GreekThresholds {
    pub fn sane_defaults() -> Self {
        let t = GreekThreshold {
            medium: 50.0,
            high: 150.0,
            extreme: 300.0,
        };
        Self {
            delta: t,
            gamma: t,
            vega: t,
            theta: t,
        }
    }
}

/// Net Greeks for a strategy, aggregated by position direction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NetGreeks {
    pub delta: f64,
    pub gamma: f64,
    pub vega: f64,
    pub theta: f64,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RiskConfig {
    /// Grace window before an unresolved L6 margin shortfall triggers
    /// auto square-off, in minutes. Default 60 per spec.
    pub shortfall_grace_minutes: i64,
    /// Target time to flatten a strategy once a flatten decision is made;
    /// a target, not an enforced deadline — actual completion depends on
    /// the broker gateway. Default 30 seconds.
    pub loss_flatten_target_secs: i64,
    pub greek_thresholds: GreekThresholds,
}

impl RiskConfig {
    pub fn sane_defaults() -> Self {
        Self {
            shortfall_grace_minutes: 60,
            loss_flatten_target_secs: 30,
            greek_thresholds: GreekThresholds::sane_defaults(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RiskAction {
    NoAction,
    InfoAlert,
    WarningAlert,
    CriticalAlertStopNewOrders,
    UrgentAlertBlockMarginConsumingActions,
    EmergencyAlertStartGraceWindow,
    AutoSquareOff,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RiskDecision {
    pub level: RiskLevel,
    pub action: RiskAction,
    pub reasons: Vec<String>,
    pub worst_greek: Option<(&'static str, GreekClass)>,
}

/// Per-strategy sticky state: the monotonic-worse-until-hysteresis-clears
/// level tracker, and the open margin-shortfall grace window if any.
#[derive(Clone, Debug, PartialEq)]
pub struct RiskState {
    pub current_level: RiskLevel,
    /// A level seen as an improvement over `current_level`; held for one
    /// full recompute cycle before it is allowed to take effect.
    pub pending_downgrade: Option<RiskLevel>,
    pub shortfall_deadline: Option<DateTime<Utc>>,
    pub flattened: bool,
}

impl RiskState {
    pub fn new() -> Self {
        Self {
            current_level: RiskLevel::L1,
            pending_downgrade: None,
            shortfall_deadline: None,
            flattened: false,
        }
    }
}

impl Default for RiskState {
    fn default() -> Self {
        Self::new()
    }
}
