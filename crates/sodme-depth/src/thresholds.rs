use sodme_schemas::execution::{RecommendedType, SpreadTier};
use sodme_schemas::instrument::Segment;

/// Spread tier boundaries, expressed as percent-of-mid upper bounds.
/// Options and equity share the same table; futures are scaled ×10
/// tighter since futures spreads are typically a fraction of an option's.
struct SpreadBand {
    tight: f64,
    normal: f64,
    wide: f64,
}

const OPTIONS_BAND: SpreadBand = SpreadBand {
    tight: 0.2,
    normal: 0.5,
    wide: 1.0,
};

fn band_for(segment: Segment) -> SpreadBand {
    match segment {
        Segment::Futures => SpreadBand {
            tight: OPTIONS_BAND.tight / 10.0,
            normal: OPTIONS_BAND.normal / 10.0,
            wide: OPTIONS_BAND.wide / 10.0,
        },
        Segment::Equity | Segment::Options => SpreadBand {
            tight: OPTIONS_BAND.tight,
            normal: OPTIONS_BAND.normal,
            wide: OPTIONS_BAND.wide,
        },
    }
}

/// Spread exactly on a threshold takes the looser tier, so every bound
/// below is inclusive (`<=`) — a spread sitting exactly at the wide/
/// very-wide boundary is still `Wide`, not `VeryWide`.
pub fn spread_tier(segment: Segment, spread_pct: f64) -> SpreadTier {
    let band = band_for(segment);
    if spread_pct <= band.tight {
        SpreadTier::Tight
    } else if spread_pct <= band.normal {
        SpreadTier::Normal
    } else if spread_pct <= band.wide {
        SpreadTier::Wide
    } else {
        SpreadTier::VeryWide
    }
}

pub fn recommended_type_for_tier(tier: SpreadTier) -> RecommendedType {
    match tier {
        SpreadTier::Tight => RecommendedType::Market,
        SpreadTier::Normal | SpreadTier::Wide | SpreadTier::VeryWide => RecommendedType::Limit,
    }
}
