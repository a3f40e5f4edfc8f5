//! Bounded, monotone multiplier tables. Every boundary value maps to the
//! upper (stricter) tier, matching the spread/impact boundary rule spec.md
//! applies elsewhere: buckets are checked with `<` against the *next*
//! tier's floor, never `<=`.

use chrono::NaiveTime;

pub fn vix_multiplier(vix: f64) -> f64 {
    if vix < 15.0 {
        1.0
    } else if vix < 20.0 {
        1.1
    } else if vix < 25.0 {
        1.3
    } else if vix < 30.0 {
        1.5
    } else if vix < 40.0 {
        1.7
    } else {
        2.0
    }
}

fn days_to_expiry_multiplier(days_to_expiry: i64) -> f64 {
    if days_to_expiry >= 7 {
        1.0
    } else if days_to_expiry >= 2 {
        1.1
    } else if days_to_expiry == 1 {
        1.3
    } else {
        2.5
    }
}

fn intraday_multiplier(time: NaiveTime) -> f64 {
    if time < NaiveTime::from_hms_opt(13, 30, 0).unwrap() {
        2.0
    } else if time < NaiveTime::from_hms_opt(15, 0, 0).unwrap() {
        2.5
    } else {
        3.5
    }
}

/// `final = max(days_mul, intraday_mul)`, the intraday overlay only applying
/// on expiry day itself (`days_to_expiry <= 0`).
pub fn expiry_multiplier(days_to_expiry: i64, time_of_day: NaiveTime) -> f64 {
    let days_mul = days_to_expiry_multiplier(days_to_expiry);
    if days_to_expiry <= 0 {
        days_mul.max(intraday_multiplier(time_of_day))
    } else {
        days_mul
    }
}

pub fn price_move_multiplier(abs_pct_change: f64) -> f64 {
    let abs_pct_change = abs_pct_change.abs();
    if abs_pct_change < 1.0 {
        1.0
    } else if abs_pct_change < 2.0 {
        1.1
    } else if abs_pct_change < 3.0 {
        1.2
    } else if abs_pct_change < 5.0 {
        1.4
    } else {
        1.6
    }
}

/// Regulatory multiplier inputs: NSE circular override, broker override, or
/// an active internal circular, taken as the max of whichever are present.
/// Absent all three, the multiplier is neutral (1.0).
pub fn regulatory_multiplier(overrides: &[f64]) -> f64 {
    overrides
        .iter()
        .copied()
        .fold(1.0_f64, |acc, v| acc.max(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vix_spike_matches_scenario_c() {
        assert_eq!(vix_multiplier(28.0), 1.5);
    }

    #[test]
    fn vix_boundary_uses_upper_tier() {
        assert_eq!(vix_multiplier(15.0), 1.1);
        assert_eq!(vix_multiplier(20.0), 1.3);
        assert_eq!(vix_multiplier(25.0), 1.5);
        assert_eq!(vix_multiplier(30.0), 1.7);
        assert_eq!(vix_multiplier(40.0), 2.0);
    }

    #[test]
    fn expiry_day_final_thirty_minutes_uses_highest_intraday_multiplier() {
        let t = NaiveTime::from_hms_opt(15, 10, 0).unwrap();
        assert_eq!(expiry_multiplier(0, t), 3.5);
    }

    #[test]
    fn expiry_multiplier_away_from_expiry_ignores_time_of_day() {
        let t = NaiveTime::from_hms_opt(9, 20, 0).unwrap();
        assert_eq!(expiry_multiplier(7, t), 1.0);
    }

    #[test]
    fn price_move_matches_scenario_c() {
        assert_eq!(price_move_multiplier(2.5), 1.2);
    }

    #[test]
    fn regulatory_defaults_to_neutral() {
        assert_eq!(regulatory_multiplier(&[]), 1.0);
        assert_eq!(regulatory_multiplier(&[1.2, 1.05]), 1.2);
    }
}
