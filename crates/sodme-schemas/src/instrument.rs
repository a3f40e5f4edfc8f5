use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    Equity,
    Futures,
    Options,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionType {
    Call,
    Put,
}

/// Immutable-per-trading-day instrument descriptor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub token: i64,
    pub tradingsymbol: String,
    pub segment: Segment,
    pub underlying: String,
    pub expiry: Option<NaiveDate>,
    pub strike: Option<f64>,
    pub option_type: Option<OptionType>,
    pub lot_size: i64,
    pub tick_size: f64,
}

impl Instrument {
    pub fn is_derivative(&self) -> bool {
        matches!(self.segment, Segment::Futures | Segment::Options)
    }

    pub fn is_short_option_eligible(&self) -> bool {
        matches!(self.segment, Segment::Options)
    }

    /// Days to expiry relative to `today`. `None` for non-derivatives.
    pub fn days_to_expiry(&self, today: NaiveDate) -> Option<i64> {
        self.expiry.map(|e| (e - today).num_days())
    }
}
