use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarginError {
    #[error("margin shortfall for strategy {strategy_id}: required {required}, available {available}")]
    MarginShortfallError {
        strategy_id: uuid::Uuid,
        required: sodme_schemas::money::Paise,
        available: sodme_schemas::money::Paise,
    },

    #[error("margin for instrument {instrument_token} increased unexpectedly: {old_total} -> {new_total}")]
    MarginIncreasedError {
        instrument_token: i64,
        old_total: sodme_schemas::money::Paise,
        new_total: sodme_schemas::money::Paise,
    },

    #[error("no NSE margin cache entry for instrument {instrument_token}")]
    CacheMissError { instrument_token: i64 },
}
