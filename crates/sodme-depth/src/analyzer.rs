use chrono::Utc;
use uuid::Uuid;

use sodme_schemas::depth::DepthSnapshot;
use sodme_schemas::execution::{ExecutionAnalysis, SpreadTier};
use sodme_schemas::instrument::Segment;
use sodme_schemas::order::Side;
use sodme_schemas::strategy::StrategySettings;

use crate::decision::decide;
use crate::error::DepthError;
use crate::impact::walk_impact;
use crate::liquidity::{liquidity_score, liquidity_tier};
use crate::thresholds::{recommended_type_for_tier, spread_tier};

/// Request for a single pre-trade execution analysis.
pub struct AnalyzeRequest<'a> {
    pub order_id: Uuid,
    pub correlates_with: Option<Uuid>,
    pub instrument_token: i64,
    pub segment: Segment,
    pub side: Side,
    pub quantity: i64,
    pub depth: Option<&'a DepthSnapshot>,
    pub settings: &'a StrategySettings,
}

/// Produce an `ExecutionAnalysis` from live depth. Never fabricates
/// liquidity: a missing or unusable book is a hard `DepthError`, not a
/// best-guess decision.
pub fn analyze(request: AnalyzeRequest<'_>) -> Result<ExecutionAnalysis, DepthError> {
    let depth = request.depth.ok_or(DepthError::DepthUnavailableError {
        instrument_token: request.instrument_token,
    })?;

    if depth.bids.is_empty() || depth.asks.is_empty() {
        return Err(DepthError::DepthUnavailableError {
            instrument_token: depth.instrument_token,
        });
    }

    if depth.is_crossed() {
        return Err(DepthError::ValidationError(format!(
            "instrument {}: crossed or locked book (best_bid >= best_ask)",
            depth.instrument_token
        )));
    }

    let mid = depth.mid().ok_or(DepthError::DepthUnavailableError {
        instrument_token: depth.instrument_token,
    })?;
    let best_bid = depth.best_bid().expect("checked non-empty above");
    let best_ask = depth.best_ask().expect("checked non-empty above");
    let spread_abs = best_ask - best_bid;
    let spread_pct = spread_abs.pct_of(mid);

    let tier = spread_tier(request.segment, spread_pct);
    let tight_threshold_pct = match request.segment {
        Segment::Futures => 0.02,
        Segment::Equity | Segment::Options => 0.2,
    };

    let impact = walk_impact(depth, request.side, request.quantity, mid);

    let top5_qty = depth.top5_opposite_quantity(request.side);
    let levels_present = depth.opposite_side(request.side).len();
    let score = liquidity_score(
        spread_pct,
        tight_threshold_pct,
        top5_qty,
        request.quantity,
        levels_present,
    );
    let tier_liquidity = liquidity_tier(score);

    let mut warnings = Vec::new();
    if !impact.can_fill_completely {
        warnings.push("INSUFFICIENT_LIQUIDITY".to_string());
    }
    if matches!(tier, SpreadTier::Wide | SpreadTier::VeryWide) {
        warnings.push("WIDE_SPREAD".to_string());
    }
    if impact.impact_bps >= request.settings.max_impact_bps && impact.can_fill_completely {
        warnings.push("HIGH_IMPACT".to_string());
    }

    let action = decide(
        tier,
        impact.impact_bps,
        impact.can_fill_completely,
        tier_liquidity,
        score,
        request.settings,
    );

    Ok(ExecutionAnalysis {
        id: Uuid::new_v4(),
        order_id: request.order_id,
        correlates_with: request.correlates_with,
        spread_abs,
        spread_pct,
        liquidity_tier: tier_liquidity,
        liquidity_score: score,
        estimated_fill_price: impact.estimated_fill_price,
        impact_bps: impact.impact_bps,
        impact_cost: impact.impact_cost,
        levels_consumed: impact.levels_consumed,
        can_fill_completely: impact.can_fill_completely,
        warnings,
        recommended_action: action,
        recommended_type: Some(recommended_type_for_tier(tier)),
        actual_fill_price: None,
        actual_slippage: None,
        quality_score: None,
        created_at: Utc::now(),
    })
}
