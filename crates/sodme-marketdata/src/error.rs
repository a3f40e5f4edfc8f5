use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MarketDataError {
    #[error("instrument {instrument_token} has no cached {what}")]
    Unavailable { instrument_token: i64, what: &'static str },

    #[error("broker market data request to {endpoint} failed: {message}")]
    BrokerError { endpoint: String, message: String },

    #[error("quote for instrument {instrument_token} is stale: {age_secs}s old")]
    StaleQuote { instrument_token: i64, age_secs: i64 },

    #[error("ticker feed message could not be decoded: {0}")]
    DecodeError(String),
}
