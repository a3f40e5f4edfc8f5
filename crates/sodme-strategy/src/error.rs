use sodme_schemas::StrategyStatus;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StrategyError {
    #[error("strategy {0} not found")]
    NotFound(Uuid),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("invalid status transition for strategy {id}: {from:?} -> {to:?}")]
    InvalidStatusTransition { id: Uuid, from: StrategyStatus, to: StrategyStatus },
}
