use thiserror::Error;

/// Error kinds a `BrokerAdapter` call or the gateway's own policy layer can
/// produce. Transient and permanent broker errors are distinguished so
/// callers know which ones are worth retrying.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("broker transient error on {endpoint}: {message}")]
    BrokerTransient { endpoint: String, message: String },

    #[error("broker permanent error on {endpoint}: {message}")]
    BrokerPermanent { endpoint: String, message: String },

    #[error("rate limit exceeded for {endpoint}")]
    RateLimited { endpoint: String },

    #[error("duplicate order for idempotency key {idempotency_key}")]
    DuplicateOrder { idempotency_key: String },

    #[error("circuit open for broker, request refused without calling out")]
    CircuitOpen,

    #[error("session invalid, broker rejected new orders pending refresh")]
    SessionInvalid,
}

impl GatewayError {
    /// Transient broker and rate-limit conditions are worth retrying with
    /// backoff; permanent errors, duplicates and an invalid session are not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GatewayError::BrokerTransient { .. })
    }
}
