use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Paise;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginSource {
    Broker,
    Internal,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FactorKind {
    Vix,
    Expiry,
    PriceMove,
    Regulatory,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppliedFactor {
    pub kind: FactorKind,
    /// Human-readable tag, e.g. `EXPIRY_PROXIMITY(0d)`.
    pub label: String,
    pub multiplier: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarginSnapshot {
    pub id: Uuid,
    pub strategy_id: Uuid,
    pub ts_utc: DateTime<Utc>,
    pub span: Paise,
    pub exposure: Paise,
    pub premium: Paise,
    pub additional: Paise,
    pub total: Paise,
    pub applied_factors: Vec<AppliedFactor>,
    pub available_margin: Paise,
    pub utilization_pct: f64,
    pub warnings: Vec<String>,
    pub source: MarginSource,
}

impl MarginSnapshot {
    /// Invariant: total >= span + exposure + premium within rounding epsilon.
    pub fn satisfies_floor_invariant(&self, epsilon: Paise) -> bool {
        let floor = self.span + self.exposure + self.premium;
        self.total + epsilon >= floor
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Critical,
    Urgent,
}

impl Severity {
    pub fn rank(self) -> u8 {
        match self {
            Severity::Info => 0,
            Severity::Warning => 1,
            Severity::Critical => 2,
            Severity::Urgent => 3,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarginChangeEvent {
    pub strategy_id: Uuid,
    pub old_total: Paise,
    pub new_total: Paise,
    pub pct_change: f64,
    pub reason: String,
    pub severity: Severity,
    pub action_taken: Option<String>,
    pub ts_utc: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SettlementRecord {
    pub instrument_token: i64,
    pub date: NaiveDate,
    pub previous_settlement: Paise,
    pub new_settlement: Paise,
    pub m2m_pnl: Paise,
}
