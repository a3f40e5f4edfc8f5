use sodme_schemas::StrategyStatus;

/// Whether moving a strategy from `from` to `to` is a legal status
/// transition. `Closed` is terminal; `Draft` only ever moves forward to
/// `Active`; `Active` and `Paused` freely toggle between each other and
/// both can close.
pub fn is_valid_transition(from: StrategyStatus, to: StrategyStatus) -> bool {
    use StrategyStatus::*;
    if from == to {
        return true;
    }
    matches!(
        (from, to),
        (Draft, Active) | (Active, Paused) | (Paused, Active) | (Active, Closed) | (Paused, Closed)
    )
}
