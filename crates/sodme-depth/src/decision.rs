use sodme_schemas::execution::{LiquidityTier, RecommendedAction, SpreadTier};
use sodme_schemas::strategy::StrategySettings;

fn rank(action: RecommendedAction) -> u8 {
    match action {
        RecommendedAction::ExecuteMarket => 0,
        RecommendedAction::ExecuteLimit => 1,
        RecommendedAction::AlertUser => 2,
        RecommendedAction::RequireApproval => 3,
        RecommendedAction::Reject => 4,
    }
}

/// Combine spread tier, impact, liquidity and fill feasibility into a single
/// recommended action via a precedence table: any REJECT dominates;
/// otherwise APPROVAL > ALERT > EXECUTE. Each input contributes its own
/// candidate action and the strictest one wins.
pub fn decide(
    spread_tier: SpreadTier,
    impact_bps: i64,
    can_fill_completely: bool,
    liquidity_tier: LiquidityTier,
    liquidity_score: f64,
    settings: &StrategySettings,
) -> RecommendedAction {
    let mut candidates = Vec::with_capacity(5);

    if liquidity_score < settings.min_liquidity_score {
        candidates.push(RecommendedAction::AlertUser);
    }

    if !can_fill_completely {
        candidates.push(RecommendedAction::Reject);
    }

    candidates.push(match spread_tier {
        SpreadTier::Tight => RecommendedAction::ExecuteMarket,
        SpreadTier::Normal => RecommendedAction::ExecuteLimit,
        SpreadTier::Wide => RecommendedAction::AlertUser,
        SpreadTier::VeryWide => RecommendedAction::RequireApproval,
    });

    if impact_bps >= settings.max_impact_bps {
        candidates.push(if settings.require_approval_high_impact {
            RecommendedAction::RequireApproval
        } else {
            RecommendedAction::AlertUser
        });
    }

    candidates.push(match liquidity_tier {
        LiquidityTier::High | LiquidityTier::Medium => RecommendedAction::ExecuteLimit,
        LiquidityTier::Low => RecommendedAction::AlertUser,
        LiquidityTier::Illiquid => RecommendedAction::RequireApproval,
    });

    candidates
        .into_iter()
        .max_by_key(|a| rank(*a))
        .unwrap_or(RecommendedAction::ExecuteLimit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> StrategySettings {
        StrategySettings::sane_defaults()
    }

    #[test]
    fn wide_spread_alerts() {
        let action = decide(SpreadTier::Wide, 10, true, LiquidityTier::Medium, 65.0, &settings());
        assert_eq!(action, RecommendedAction::AlertUser);
    }

    #[test]
    fn very_wide_spread_requires_approval() {
        let action = decide(SpreadTier::VeryWide, 10, true, LiquidityTier::High, 90.0, &settings());
        assert_eq!(action, RecommendedAction::RequireApproval);
    }

    #[test]
    fn insufficient_liquidity_rejects_regardless_of_spread() {
        let action = decide(SpreadTier::Tight, 9999, false, LiquidityTier::Illiquid, 5.0, &settings());
        assert_eq!(action, RecommendedAction::Reject);
    }

    #[test]
    fn tight_spread_high_liquidity_executes_at_market() {
        let mut cfg = settings();
        cfg.max_impact_bps = 1000;
        let action = decide(SpreadTier::Tight, 5, true, LiquidityTier::High, 95.0, &cfg);
        assert_eq!(action, RecommendedAction::ExecuteMarket);
    }

    #[test]
    fn below_min_liquidity_score_forces_at_least_an_alert() {
        let mut cfg = settings();
        cfg.min_liquidity_score = 90.0;
        let action = decide(SpreadTier::Tight, 5, true, LiquidityTier::High, 85.0, &cfg);
        assert_eq!(action, RecommendedAction::AlertUser);
    }
}
