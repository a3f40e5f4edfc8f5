use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use sodme_schemas::money::Paise;

/// Last-traded-price snapshot for one instrument.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub instrument_token: i64,
    pub last_price: Paise,
    pub ts: DateTime<Utc>,
}

/// Implied-vol/Greeks snapshot for one options instrument. Meaningless for
/// futures/equity instruments; callers only request it for `Segment::Options`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    pub instrument_token: i64,
    pub iv: f64,
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub vega: f64,
    pub ts: DateTime<Utc>,
}

/// A single numeric India VIX reading.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VixReading {
    pub value: f64,
    pub ts: DateTime<Utc>,
}

/// One row of the daily NSE margin file: the cached SPAN base margin and
/// exposure percentage for a single instrument on a single trading day.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NseMarginFileRow {
    pub instrument_token: i64,
    pub as_of_date: NaiveDate,
    pub base_span: Paise,
    pub exposure_pct: f64,
}

/// A per-instrument, per-date settlement price (futures daily/final
/// settlement).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SettlementPrice {
    pub instrument_token: i64,
    pub settlement_date: NaiveDate,
    pub price: Paise,
}
