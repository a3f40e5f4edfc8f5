use sodme_schemas::depth::DepthSnapshot;
use sodme_schemas::money::Paise;
use sodme_schemas::order::Side;
use sodme_schemas::execution::INSUFFICIENT_LIQUIDITY_IMPACT_BPS;

pub struct ImpactResult {
    pub estimated_fill_price: Paise,
    pub impact_bps: i64,
    pub impact_cost: Paise,
    pub levels_consumed: u32,
    pub can_fill_completely: bool,
}

/// Walk the book opposite `side`, consuming quantity level by level, and
/// return the size-weighted average fill price plus the basis-point
/// distance from mid. `quantity` not fully consumed sets the sentinel
/// `INSUFFICIENT_LIQUIDITY_IMPACT_BPS` rather than a partial figure — a
/// partial fill has no meaningful "impact" since the rest was never priced.
pub fn walk_impact(depth: &DepthSnapshot, side: Side, quantity: i64, mid: Paise) -> ImpactResult {
    let levels = depth.opposite_side(side);
    let mut remaining = quantity;
    let mut notional = Paise::ZERO;
    let mut filled = 0i64;
    let mut levels_consumed = 0u32;

    for level in levels {
        if remaining <= 0 {
            break;
        }
        let take = remaining.min(level.quantity);
        if take <= 0 {
            continue;
        }
        notional += level.price * take;
        filled += take;
        remaining -= take;
        levels_consumed += 1;
    }

    if remaining > 0 || filled == 0 {
        return ImpactResult {
            estimated_fill_price: Paise::ZERO,
            impact_bps: INSUFFICIENT_LIQUIDITY_IMPACT_BPS,
            impact_cost: Paise::ZERO,
            levels_consumed,
            can_fill_completely: false,
        };
    }

    let avg_fill = notional.scaled_by(1.0 / filled as f64);
    let impact_bps = if mid.raw() == 0 {
        0
    } else {
        ((avg_fill - mid).abs().to_f64_rupees() / mid.to_f64_rupees() * 10_000.0).round() as i64
    };
    let impact_cost = (avg_fill - mid).abs() * filled;

    ImpactResult {
        estimated_fill_price: avg_fill,
        impact_bps,
        impact_cost,
        levels_consumed,
        can_fill_completely: true,
    }
}
