use chrono::Utc;
use sodme_schemas::margin::{AppliedFactor, FactorKind, MarginSnapshot, MarginSource};
use sodme_schemas::money::Paise;
use uuid::Uuid;

use crate::error::MarginError;
use crate::factors::{expiry_multiplier, price_move_multiplier, regulatory_multiplier, vix_multiplier};
use crate::types::{InstrumentMarginBreakdown, InstrumentMarginInput, MarginFactorContext, NseMarginCache};

const EXPOSURE_MARGIN_PCT: f64 = 0.03;

/// `calculate_for_order` — the per-instrument formula chain:
/// base_span → span' → instrument_margin. `span'` applies the four bounded
/// multiplier tables; exposure is a flat 3% of contract value; premium
/// applies only to net-short option positions.
pub fn calculate_for_order(
    input: &InstrumentMarginInput,
    ctx: &MarginFactorContext,
    cache: &dyn NseMarginCache,
) -> Result<InstrumentMarginBreakdown, MarginError> {
    let base_span = cache
        .base_span(input.instrument_token, ctx.effective_date)
        .ok_or(MarginError::CacheMissError {
            instrument_token: input.instrument_token,
        })?;

    let vix_mul = vix_multiplier(ctx.vix);
    let expiry_mul = expiry_multiplier(input.days_to_expiry, input.time_of_day);
    let price_mul = price_move_multiplier(ctx.price_move_pct);
    let regulatory_mul = regulatory_multiplier(&ctx.regulatory_overrides);

    let span_adjusted = base_span
        .scaled_by(vix_mul)
        .scaled_by(expiry_mul)
        .scaled_by(price_mul)
        .scaled_by(regulatory_mul);

    let exposure = input.contract_value.scaled_by(EXPOSURE_MARGIN_PCT);
    let premium = input.short_option_premium;
    let total = span_adjusted + exposure + premium + input.additional;

    let mut applied_factors = vec![
        AppliedFactor {
            kind: FactorKind::Vix,
            label: format!("VIX({:.1})", ctx.vix),
            multiplier: vix_mul,
        },
        AppliedFactor {
            kind: FactorKind::Expiry,
            label: format!("EXPIRY_PROXIMITY({}d)", input.days_to_expiry),
            multiplier: expiry_mul,
        },
        AppliedFactor {
            kind: FactorKind::PriceMove,
            label: format!("PRICE_MOVE({:.2}%)", ctx.price_move_pct),
            multiplier: price_mul,
        },
    ];
    if regulatory_mul != 1.0 {
        applied_factors.push(AppliedFactor {
            kind: FactorKind::Regulatory,
            label: "REGULATORY_OVERRIDE".to_string(),
            multiplier: regulatory_mul,
        });
    }

    Ok(InstrumentMarginBreakdown {
        instrument_token: input.instrument_token,
        base_span,
        span_adjusted,
        exposure,
        premium,
        additional: input.additional,
        total,
        applied_factors,
    })
}

/// `calculate_batch` — sum per-instrument breakdowns into a strategy-level
/// snapshot. Batch-then-sum, matching the reference workspace's portfolio
/// accounting shape: compute each line independently, fold into one total.
pub fn calculate_batch(
    strategy_id: Uuid,
    inputs: &[InstrumentMarginInput],
    ctx: &MarginFactorContext,
    cache: &dyn NseMarginCache,
    available_margin: Paise,
    buffer_pct: f64,
    source: MarginSource,
) -> Result<MarginSnapshot, MarginError> {
    let mut span = Paise::ZERO;
    let mut exposure = Paise::ZERO;
    let mut premium = Paise::ZERO;
    let mut additional = Paise::ZERO;
    let mut total = Paise::ZERO;
    let mut applied_factors = Vec::new();

    for input in inputs {
        let breakdown = calculate_for_order(input, ctx, cache)?;
        span += breakdown.span_adjusted;
        exposure += breakdown.exposure;
        premium += breakdown.premium;
        additional += breakdown.additional;
        total += breakdown.total;
        applied_factors.extend(breakdown.applied_factors);
    }

    // buffer_pct is an advisory overlay only: it never inflates `total`
    // itself, so it is surfaced purely as a warning when the buffer would be
    // breached, not folded into the required-margin figure.
    let buffered_required = total.scaled_by(1.0 + buffer_pct / 100.0);
    let utilization_pct = total.pct_of(available_margin.max(Paise::new(1)));

    let mut warnings = Vec::new();
    if available_margin < buffered_required {
        warnings.push(format!(
            "available margin {available_margin} is below the {buffer_pct:.1}% buffered requirement of {buffered_required}"
        ));
    }

    Ok(MarginSnapshot {
        id: Uuid::new_v4(),
        strategy_id,
        ts_utc: Utc::now(),
        span,
        exposure,
        premium,
        additional,
        total,
        applied_factors,
        available_margin,
        utilization_pct,
        warnings,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    struct FixedCache(Paise);
    impl NseMarginCache for FixedCache {
        fn base_span(&self, _instrument_token: i64, _effective_date: chrono::NaiveDate) -> Option<Paise> {
            Some(self.0)
        }
    }

    #[test]
    fn scenario_c_margin_with_vix_spike() {
        let cache = FixedCache(Paise::from_rupees(30_000));
        let ctx = MarginFactorContext {
            vix: 28.0,
            price_move_pct: 2.5,
            regulatory_overrides: vec![],
            effective_date: chrono::NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
        };
        let input = InstrumentMarginInput {
            instrument_token: 1,
            contract_value: Paise::from_rupees(1_000_000),
            short_option_premium: Paise::ZERO,
            additional: Paise::ZERO,
            days_to_expiry: 2,
            time_of_day: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        };
        let breakdown = calculate_for_order(&input, &ctx, &cache).unwrap();
        assert_eq!(breakdown.span_adjusted, Paise::from_rupees(59_400));
        assert_eq!(breakdown.exposure, Paise::from_rupees(30_000));
        assert!(breakdown.total >= Paise::from_rupees(89_400));
    }

    #[test]
    fn missing_cache_entry_is_an_error() {
        struct EmptyCache;
        impl NseMarginCache for EmptyCache {
            fn base_span(&self, _: i64, _: chrono::NaiveDate) -> Option<Paise> {
                None
            }
        }
        let ctx = MarginFactorContext {
            vix: 10.0,
            price_move_pct: 0.0,
            regulatory_overrides: vec![],
            effective_date: chrono::NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
        };
        let input = InstrumentMarginInput {
            instrument_token: 99,
            contract_value: Paise::ZERO,
            short_option_premium: Paise::ZERO,
            additional: Paise::ZERO,
            days_to_expiry: 10,
            time_of_day: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        };
        assert!(matches!(
            calculate_for_order(&input, &ctx, &EmptyCache),
            Err(MarginError::CacheMissError { instrument_token: 99 })
        ));
    }
}
