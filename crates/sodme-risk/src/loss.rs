use crate::types::RiskLevel;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LossVerdict {
    Within,
    AlertOnly,
    FlattenRequired,
}

/// `max_loss_pct` breach with `auto_square_off_on_loss` enabled requires a
/// flatten; breach without auto square-off degrades to an alert only.
pub fn evaluate_loss(loss_pct: f64, max_loss_pct: f64, auto_square_off_on_loss: bool) -> LossVerdict {
    if loss_pct < max_loss_pct {
        LossVerdict::Within
    } else if auto_square_off_on_loss {
        LossVerdict::FlattenRequired
    } else {
        LossVerdict::AlertOnly
    }
}

/// Loss is emergency-grade (L6) once a flatten is required; an alert-only
/// breach without auto square-off still escalates to L4 (critical) since
/// it represents a real breach the operator must act on manually.
pub fn level_for_loss(verdict: LossVerdict) -> RiskLevel {
    match verdict {
        LossVerdict::Within => RiskLevel::L1,
        LossVerdict::AlertOnly => RiskLevel::L4,
        LossVerdict::FlattenRequired => RiskLevel::L6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loss_within_limit_is_fine() {
        assert_eq!(evaluate_loss(3.0, 5.0, true), LossVerdict::Within);
    }

    #[test]
    fn exact_boundary_breaches() {
        assert_eq!(evaluate_loss(5.0, 5.0, true), LossVerdict::FlattenRequired);
    }

    #[test]
    fn breach_without_auto_square_off_is_alert_only() {
        assert_eq!(evaluate_loss(6.0, 5.0, false), LossVerdict::AlertOnly);
    }
}
