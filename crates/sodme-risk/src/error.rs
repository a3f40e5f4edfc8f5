use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum RiskError {
    #[error("risk limit breached for strategy {strategy_id}: level {level}")]
    RiskLimitBreachError { strategy_id: Uuid, level: String },

    #[error("greeks risk breach for strategy {strategy_id}: {greek} classified {classification}")]
    GreeksRiskError {
        strategy_id: Uuid,
        greek: String,
        classification: String,
    },
}
