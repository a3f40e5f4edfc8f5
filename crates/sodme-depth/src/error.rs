use thiserror::Error;

/// Error kinds the analyzer can return. Decision-related outcomes (wide
/// spread, high impact, insufficient liquidity) are NOT errors — those are
/// encoded in `ExecutionAnalysis::recommended_action` and surfaced as
/// alerts. These variants are the ones that stop analysis before a decision
/// can be produced at all.
#[derive(Debug, Error)]
pub enum DepthError {
    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("depth unavailable for instrument {instrument_token}")]
    DepthUnavailableError { instrument_token: i64 },
}
