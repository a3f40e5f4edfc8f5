use sodme_schemas::margin::{MarginSnapshot, MarginSource};

/// Tracks the last broker-sourced snapshot per strategy so internal
/// recomputes can be reconciled against it.
///
/// Invariant: broker-path numbers, once observed, are truth. A subsequent
/// internal recompute must not report a lower `total` than the last broker
/// snapshot in the same window unless a factor has demonstrably dropped
/// (`factor_dropped = true`) — otherwise the internal number is clamped up
/// to the broker floor and a warning is attached.
#[derive(Default)]
pub struct DualPathTracker {
    last_broker: Option<MarginSnapshot>,
}

impl DualPathTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_broker_snapshot(&mut self, snapshot: MarginSnapshot) {
        debug_assert_eq!(snapshot.source, MarginSource::Broker);
        self.last_broker = Some(snapshot);
    }

    pub fn last_broker_total(&self) -> Option<sodme_schemas::money::Paise> {
        self.last_broker.as_ref().map(|s| s.total)
    }

    /// Reconcile an internal-path snapshot against the last known broker
    /// floor. `factor_dropped` must be supplied by the caller (the margin
    /// engine compares the applied-factor multipliers of the internal
    /// snapshot against the broker one's) — this function enforces the
    /// clamp, it does not detect the drop itself.
    pub fn reconcile_internal(&self, mut internal: MarginSnapshot, factor_dropped: bool) -> MarginSnapshot {
        debug_assert_eq!(internal.source, MarginSource::Internal);
        if let Some(floor) = self.last_broker_total() {
            if !factor_dropped && internal.total < floor {
                internal.total = floor;
                internal
                    .warnings
                    .push("internal recompute clamped to last broker value; no factor drop observed".to_string());
            }
        }
        internal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sodme_schemas::money::Paise;
    use uuid::Uuid;

    fn snapshot(total: Paise, source: MarginSource) -> MarginSnapshot {
        MarginSnapshot {
            id: Uuid::new_v4(),
            strategy_id: Uuid::new_v4(),
            ts_utc: Utc::now(),
            span: total,
            exposure: Paise::ZERO,
            premium: Paise::ZERO,
            additional: Paise::ZERO,
            total,
            applied_factors: vec![],
            available_margin: Paise::from_rupees(1_000_000),
            utilization_pct: 0.0,
            warnings: vec![],
            source,
        }
    }

    #[test]
    fn internal_recompute_is_clamped_to_broker_floor_without_factor_drop() {
        let mut tracker = DualPathTracker::new();
        tracker.record_broker_snapshot(snapshot(Paise::from_rupees(100_000), MarginSource::Broker));

        let lower_internal = snapshot(Paise::from_rupees(80_000), MarginSource::Internal);
        let reconciled = tracker.reconcile_internal(lower_internal, false);
        assert_eq!(reconciled.total, Paise::from_rupees(100_000));
        assert!(!reconciled.warnings.is_empty());
    }

    #[test]
    fn internal_recompute_allowed_below_floor_when_factor_dropped() {
        let mut tracker = DualPathTracker::new();
        tracker.record_broker_snapshot(snapshot(Paise::from_rupees(100_000), MarginSource::Broker));

        let lower_internal = snapshot(Paise::from_rupees(80_000), MarginSource::Internal);
        let reconciled = tracker.reconcile_internal(lower_internal, true);
        assert_eq!(reconciled.total, Paise::from_rupees(80_000));
    }
}
