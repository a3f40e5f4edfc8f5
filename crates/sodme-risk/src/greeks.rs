use crate::types::{GreekClass, GreekThreshold, GreekThresholds, NetGreeks, RiskLevel};

/// One instrument's per-lot Greeks, signed by the caller's convention
/// (long positive, short negative) before aggregation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PositionGreeks {
    pub delta: f64,
    pub gamma: f64,
    pub vega: f64,
    pub theta: f64,
}

/// Sums signed per-position Greeks into the strategy's net exposure.
pub fn aggregate_greeks(positions: &[PositionGreeks]) -> NetGreeks {
    positions.iter().fold(NetGreeks::default(), |acc, g| NetGreeks {
        delta: acc.delta + g.delta,
        gamma: acc.gamma + g.gamma,
        vega: acc.vega + g.vega,
        theta: acc.theta + g.theta,
    })
}

/// Classifies one Greek's absolute net value against its thresholds.
/// Exact equality takes the stricter (next) tier.
pub fn classify(value: f64, t: GreekThreshold) -> GreekClass {
    let v = value.abs();
    if v < t.medium {
        GreekClass::Low
    } else if v < t.high {
        GreekClass::Medium
    } else if v < t.extreme {
        GreekClass::High
    } else {
        GreekClass::Extreme
    }
}

/// Classifies all four Greeks and returns the worst (name, classification)
/// pair, used to drive recommendations and the overall risk level.
pub fn classify_all(net: NetGreeks, thresholds: GreekThresholds) -> [(&'static str, GreekClass); 4] {
    [
        ("delta", classify(net.delta, thresholds.delta)),
        ("gamma", classify(net.gamma, thresholds.gamma)),
        ("vega", classify(net.vega, thresholds.vega)),
        ("theta", classify(net.theta, thresholds.theta)),
    ]
}

fn rank(c: GreekClass) -> u8 {
    match c {
        GreekClass::Low => 0,
        GreekClass::Medium => 1,
        GreekClass::High => 2,
        GreekClass::Extreme => 3,
    }
}

pub fn worst(classified: [(&'static str, GreekClass); 4]) -> (&'static str, GreekClass) {
    classified
        .into_iter()
        .max_by_key(|(_, c)| rank(*c))
        .expect("classify_all always returns 4 entries")
}

/// A net-delta-positive book recommends a short-delta (opposite) hedge and
/// vice versa; returned only when the worst Greek is High or Extreme.
pub fn hedge_recommendation(net: NetGreeks, worst: (&'static str, GreekClass)) -> Option<String> {
    if rank(worst.1) < rank(GreekClass::High) {
        return None;
    }
    match worst.0 {
        "delta" => {
            let side = if net.delta > 0.0 { "short" } else { "long" };
            Some(format!("add {side}-delta hedge to offset net delta {:.2}", net.delta))
        }
        "gamma" => Some(format!("reduce gamma exposure, net gamma {:.2}", net.gamma)),
        "vega" => Some(format!("reduce vega exposure, net vega {:.2}", net.vega)),
        "theta" => Some(format!("review theta decay exposure, net theta {:.2}", net.theta)),
        _ => None,
    }
}

/// Maps a Greek classification onto the shared risk ladder so Greeks risk
/// can be combined with loss/utilization level via `max`. Low/Medium stay
/// informational; High stops new orders (L4); Extreme is emergency-grade
/// (L6), matching the loss/utilization ladder's own severity jumps.
pub fn level_for_greek_class(class: GreekClass) -> RiskLevel {
    match class {
        GreekClass::Low => RiskLevel::L1,
        GreekClass::Medium => RiskLevel::L2,
        GreekClass::High => RiskLevel::L4,
        GreekClass::Extreme => RiskLevel::L6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t() -> GreekThreshold {
        GreekThreshold {
            medium: 50.0,
            high: 150.0,
            extreme: 300.0,
        }
    }

    #[test]
    fn aggregates_signed_greeks_across_positions() {
        let positions = vec![
            PositionGreeks { delta: 100.0, gamma: 5.0, vega: 20.0, theta: -10.0 },
            PositionGreeks { delta: -30.0, gamma: 2.0, vega: 5.0, theta: -4.0 },
        ];
        let net = aggregate_greeks(&positions);
        assert_eq!(net.delta, 70.0);
        assert_eq!(net.theta, -14.0);
    }

    #[test]
    fn exact_boundary_takes_stricter_tier() {
        assert_eq!(classify(50.0, t()), GreekClass::High);
        assert_eq!(classify(150.0, t()), GreekClass::Extreme);
    }

    #[test]
    fn negative_values_classify_by_magnitude() {
        assert_eq!(classify(-200.0, t()), GreekClass::High);
    }

    #[test]
    fn worst_picks_the_highest_ranked_classification() {
        let net = NetGreeks { delta: 400.0, gamma: 1.0, vega: 1.0, theta: 1.0 };
        let classified = classify_all(net, GreekThresholds::sane_defaults());
        assert_eq!(worst(classified), ("delta", GreekClass::Extreme));
    }

    #[test]
    fn hedge_recommendation_only_fires_above_high() {
        let net = NetGreeks { delta: 10.0, gamma: 0.0, vega: 0.0, theta: 0.0 };
        assert!(hedge_recommendation(net, ("delta", GreekClass::Medium)).is_none());
        assert!(hedge_recommendation(net, ("delta", GreekClass::High)).is_some());
    }
}
