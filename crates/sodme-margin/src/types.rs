use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sodme_schemas::money::Paise;

/// Per-instrument input to the margin formula chain. Netted at the
/// instrument level — if a strategy holds both long and short legs on the
/// same instrument, the caller nets them into one `contract_value`/`premium`
/// pair before calling `calculate_for_order`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InstrumentMarginInput {
    pub instrument_token: i64,
    pub contract_value: Paise,
    /// Premium owed if this is a net short option position; `Paise::ZERO`
    /// for long options, futures, and equity.
    pub short_option_premium: Paise,
    pub additional: Paise,
    pub days_to_expiry: i64,
    pub time_of_day: NaiveTime,
}

/// Market/regulatory context shared across every instrument in a batch.
pub struct MarginFactorContext {
    pub vix: f64,
    pub price_move_pct: f64,
    pub regulatory_overrides: Vec<f64>,
    pub effective_date: NaiveDate,
}

pub struct InstrumentMarginBreakdown {
    pub instrument_token: i64,
    pub base_span: Paise,
    pub span_adjusted: Paise,
    pub exposure: Paise,
    pub premium: Paise,
    pub additional: Paise,
    pub total: Paise,
    pub applied_factors: Vec<sodme_schemas::margin::AppliedFactor>,
}

/// Lookup for the cached NSE per-instrument SPAN base margin.
pub trait NseMarginCache {
    fn base_span(&self, instrument_token: i64, effective_date: NaiveDate) -> Option<Paise>;
}
