use crate::types::RiskLevel;

/// Margin-utilization ladder. Boundaries take the stricter (higher) tier at
/// exact equality, consistent with the spread/impact/VIX boundary rule.
pub fn level_for_utilization(utilization_pct: f64) -> RiskLevel {
    if utilization_pct < 70.0 {
        RiskLevel::L1
    } else if utilization_pct < 80.0 {
        RiskLevel::L2
    } else if utilization_pct < 90.0 {
        RiskLevel::L3
    } else if utilization_pct < 95.0 {
        RiskLevel::L4
    } else if utilization_pct < 100.0 {
        RiskLevel::L5
    } else {
        RiskLevel::L6
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_70_is_l1() {
        assert_eq!(level_for_utilization(69.9), RiskLevel::L1);
    }

    #[test]
    fn exactly_70_is_l2() {
        assert_eq!(level_for_utilization(70.0), RiskLevel::L2);
    }

    #[test]
    fn exactly_80_is_l3() {
        assert_eq!(level_for_utilization(80.0), RiskLevel::L3);
    }

    #[test]
    fn scenario_d_eighty_pct_utilization_is_at_least_l3() {
        assert!(level_for_utilization(80.0) >= RiskLevel::L3);
    }

    #[test]
    fn exactly_90_is_l4() {
        assert_eq!(level_for_utilization(90.0), RiskLevel::L4);
    }

    #[test]
    fn exactly_95_is_l5() {
        assert_eq!(level_for_utilization(95.0), RiskLevel::L5);
    }

    #[test]
    fn exactly_100_is_l6() {
        assert_eq!(level_for_utilization(100.0), RiskLevel::L6);
    }

    #[test]
    fn above_100_is_l6() {
        assert_eq!(level_for_utilization(140.0), RiskLevel::L6);
    }
}
