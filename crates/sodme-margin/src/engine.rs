use std::collections::{HashMap, HashSet};

use sodme_schemas::margin::{FactorKind, MarginSnapshot, MarginSource};
use sodme_schemas::money::Paise;
use uuid::Uuid;

use crate::calculator::calculate_batch;
use crate::dual_path::DualPathTracker;
use crate::error::MarginError;
use crate::types::{InstrumentMarginInput, MarginFactorContext, NseMarginCache};

/// Supplies the netted per-instrument margin inputs and available margin
/// for a strategy. An external collaborator — `sodme-strategy`/`sodme-db`
/// own the actual position store; the engine only depends on this trait.
pub trait StrategyMarginInputs {
    fn inputs(&self, strategy_id: Uuid) -> Vec<InstrumentMarginInput>;
    fn available_margin(&self, strategy_id: Uuid) -> Paise;
    fn buffer_pct(&self, strategy_id: Uuid) -> f64;
}

/// Ties the formula chain (`calculator`) and the broker/internal dual-path
/// invariant (`dual_path`) together into the four public operations spec.md
/// §4.2 names. One tracker per strategy; `on_factor_change` only marks
/// strategies dirty, it does not itself fetch positions or recompute —
/// callers drain `take_dirty` and call `refresh_strategy` for each.
pub struct MarginEngine<C: NseMarginCache> {
    cache: C,
    trackers: HashMap<Uuid, DualPathTracker>,
    dirty: HashSet<Uuid>,
}

impl<C: NseMarginCache> MarginEngine<C> {
    /// Direct access to the underlying factor cache, e.g. to load a new
    /// day's NSE margin file without rebuilding the engine (and losing
    /// every strategy's dual-path tracker history).
    pub fn cache_mut(&mut self) -> &mut C {
        &mut self.cache
    }

    pub fn new(cache: C) -> Self {
        Self {
            cache,
            trackers: HashMap::new(),
            dirty: HashSet::new(),
        }
    }

    pub fn calculate_batch(
        &mut self,
        strategy_id: Uuid,
        inputs: &[InstrumentMarginInput],
        ctx: &MarginFactorContext,
        available_margin: Paise,
        buffer_pct: f64,
        source: MarginSource,
    ) -> Result<MarginSnapshot, MarginError> {
        let snapshot = calculate_batch(
            strategy_id,
            inputs,
            ctx,
            &self.cache,
            available_margin,
            buffer_pct,
            source,
        )?;

        let tracker = self.trackers.entry(strategy_id).or_default();
        let reconciled = match source {
            MarginSource::Broker => {
                tracker.record_broker_snapshot(snapshot.clone());
                snapshot
            }
            MarginSource::Internal => {
                let factor_dropped = tracker
                    .last_broker_total()
                    .map(|floor| snapshot.total < floor && factors_demonstrably_dropped(&snapshot))
                    .unwrap_or(false);
                tracker.reconcile_internal(snapshot, factor_dropped)
            }
        };
        Ok(reconciled)
    }

    pub fn refresh_strategy(
        &mut self,
        strategy_id: Uuid,
        source_data: &dyn StrategyMarginInputs,
        ctx: &MarginFactorContext,
        source: MarginSource,
    ) -> Result<MarginSnapshot, MarginError> {
        let inputs = source_data.inputs(strategy_id);
        let available = source_data.available_margin(strategy_id);
        let buffer_pct = source_data.buffer_pct(strategy_id);
        self.dirty.remove(&strategy_id);
        self.calculate_batch(strategy_id, &inputs, ctx, available, buffer_pct, source)
    }

    /// `on_factor_change` — invalidate strategies that hold a position
    /// sensitive to the given factor kind. Recompute is the caller's
    /// responsibility via `refresh_strategy` once `take_dirty` is drained.
    pub fn on_factor_change(&mut self, affected_strategies: impl IntoIterator<Item = Uuid>) {
        self.dirty.extend(affected_strategies);
    }

    pub fn take_dirty(&mut self) -> Vec<Uuid> {
        self.dirty.drain().collect()
    }
}

/// A factor is considered "demonstrably dropped" when every applied
/// multiplier in the new snapshot is at its neutral floor (1.0) — i.e. VIX
/// fell back under 15, price move settled under 1%, and no regulatory
/// override remains. A partial drop is not sufficient on its own; the
/// margin engine stays conservative until the whole multiplier chain
/// relaxes.
fn factors_demonstrably_dropped(snapshot: &MarginSnapshot) -> bool {
    snapshot
        .applied_factors
        .iter()
        .all(|f| f.kind == FactorKind::Expiry || f.multiplier <= 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    struct FixedCache;
    impl NseMarginCache for FixedCache {
        fn base_span(&self, _: i64, _: chrono::NaiveDate) -> Option<Paise> {
            Some(Paise::from_rupees(10_000))
        }
    }

    fn ctx(vix: f64) -> MarginFactorContext {
        MarginFactorContext {
            vix,
            price_move_pct: 0.0,
            regulatory_overrides: vec![],
            effective_date: chrono::NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
        }
    }

    fn input() -> InstrumentMarginInput {
        InstrumentMarginInput {
            instrument_token: 1,
            contract_value: Paise::from_rupees(100_000),
            short_option_premium: Paise::ZERO,
            additional: Paise::ZERO,
            days_to_expiry: 10,
            time_of_day: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn internal_path_cannot_undercut_broker_without_a_factor_drop() {
        let mut engine = MarginEngine::new(FixedCache);
        let strategy_id = Uuid::new_v4();

        engine
            .calculate_batch(strategy_id, &[input()], &ctx(28.0), Paise::from_rupees(1_000_000), 10.0, MarginSource::Broker)
            .unwrap();

        let internal = engine
            .calculate_batch(strategy_id, &[input()], &ctx(10.0), Paise::from_rupees(1_000_000), 10.0, MarginSource::Internal)
            .unwrap();

        // VIX dropped fully under 15 (all factors relax to neutral), so the
        // lower internal number is accepted rather than clamped.
        assert!(internal.total < Paise::from_rupees(15_000));
    }

    #[test]
    fn on_factor_change_marks_strategies_dirty() {
        let mut engine = MarginEngine::new(FixedCache);
        let strategy_id = Uuid::new_v4();
        engine.on_factor_change([strategy_id]);
        assert_eq!(engine.take_dirty(), vec![strategy_id]);
        assert!(engine.take_dirty().is_empty());
    }
}
