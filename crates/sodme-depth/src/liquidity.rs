use sodme_schemas::execution::LiquidityTier;

/// Blend three 0..100 sub-scores into the liquidity score: how tight the
/// spread is relative to the tight-tier threshold, how much of the
/// requested quantity the top-5 opposite levels could cover, and how many
/// levels are actually populated (a 2-level book is thinner than a 5-level
/// one even at the same price/quantity). Weighted evenly since spec.md
/// names the three inputs without ranking them.
pub fn liquidity_score(
    spread_pct: f64,
    tight_threshold_pct: f64,
    top5_opposite_quantity: i64,
    requested_quantity: i64,
    levels_present: usize,
) -> f64 {
    let spread_component = if tight_threshold_pct <= 0.0 {
        0.0
    } else {
        (1.0 - (spread_pct / tight_threshold_pct)).clamp(0.0, 1.0) * 100.0
    };

    let depth_component = if requested_quantity <= 0 {
        100.0
    } else {
        (top5_opposite_quantity as f64 / requested_quantity as f64).clamp(0.0, 1.0) * 100.0
    };

    let levels_component = (levels_present as f64 / 5.0).clamp(0.0, 1.0) * 100.0;

    (spread_component + depth_component + levels_component) / 3.0
}

pub fn liquidity_tier(score: f64) -> LiquidityTier {
    if score >= 80.0 {
        LiquidityTier::High
    } else if score >= 60.0 {
        LiquidityTier::Medium
    } else if score >= 40.0 {
        LiquidityTier::Low
    } else {
        LiquidityTier::Illiquid
    }
}
