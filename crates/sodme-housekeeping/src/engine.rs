use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use sodme_schemas::cleanup::{CleanupAction, CleanupKey, CleanupLog, CleanupReason};
use sodme_schemas::margin::Severity;
use sodme_schemas::order::{Order, OrphanReason};
use sodme_schemas::position::Position;
use sodme_schemas::strategy::StrategySettings;
use uuid::Uuid;

use crate::orphan::classify_orphan;

/// Cancels a live order via the broker gateway. An external collaborator —
/// `sodme-gateway` owns the actual wire call; housekeeping only depends on
/// this trait, matching the reference workspace's gate-before-broker-call
/// separation between `mqk-execution::gateway` and its callers.
pub trait OrderCanceller {
    fn cancel(&mut self, order_id: Uuid) -> Result<(), String>;
}

fn orphan_reason_to_cleanup_reason(reason: OrphanReason) -> CleanupReason {
    match reason {
        OrphanReason::PositionClosed => CleanupReason::PositionClosed,
        OrphanReason::PositionReduced => CleanupReason::PositionReduced,
        OrphanReason::NoCoveringPosition => CleanupReason::PositionClosed,
    }
}

/// Outcome of processing one order through a single housekeeping pass:
/// the idempotency-keyed log entry, and an alert severity/reason pair for
/// the bus, when one was warranted.
pub struct HousekeepingOutcome {
    pub log: CleanupLog,
    pub alert_severity: Severity,
    pub alert_reason: String,
}

/// Tracks which `{order_id, reason, day}` keys have already produced a
/// CANCEL this process lifetime, mirroring the reference workspace's
/// `OmsOrder::applied` idempotent-replay set.
#[derive(Default)]
pub struct HousekeepingEngine {
    applied: HashSet<CleanupKey>,
}

impl HousekeepingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Orphan detection + auto-cleanup for one order. Returns `None` when
    /// the order is not orphaned, or when the key was already processed
    /// today (idempotent replay — e.g. a duplicate periodic-sweep tick).
    pub fn process_order(
        &mut self,
        order: &Order,
        positions: &[Position],
        settings: &StrategySettings,
        canceller: &mut dyn OrderCanceller,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Option<HousekeepingOutcome> {
        let orphan_reason = classify_orphan(order, positions)?;
        if settings.allow_orphans {
            return None;
        }

        let cleanup_reason = orphan_reason_to_cleanup_reason(orphan_reason);
        let key = CleanupKey {
            order_id: order.id,
            reason: cleanup_reason,
            day: today,
        };
        if self.applied.contains(&key) {
            return None;
        }
        self.applied.insert(key.clone());

        if !settings.auto_cleanup {
            return Some(HousekeepingOutcome {
                log: CleanupLog {
                    key,
                    order_id: order.id,
                    reason: cleanup_reason,
                    action: CleanupAction::Skipped,
                    was_auto: false,
                    pre_position_qty: 0,
                    post_position_qty: 0,
                    ts_utc: now,
                },
                alert_severity: Severity::Info,
                alert_reason: format!("{orphan_reason:?}"),
            });
        }

        let (action, severity) = match canceller.cancel(order.id) {
            Ok(()) => (CleanupAction::Cancelled, Severity::Info),
            Err(_) => (CleanupAction::Failed, Severity::Warning),
        };

        Some(HousekeepingOutcome {
            log: CleanupLog {
                key,
                order_id: order.id,
                reason: cleanup_reason,
                action,
                was_auto: true,
                pre_position_qty: order.quantity_lots,
                post_position_qty: 0,
                ts_utc: now,
            },
            alert_severity: severity,
            alert_reason: format!("{orphan_reason:?}"),
        })
    }

    /// Cancel every pending order for an instrument expiring today and
    /// archive its worthless option positions (archival is the caller's
    /// concern via `sodme-db`; this only reports which orders/positions
    /// qualify).
    pub fn expiring_today(
        &mut self,
        orders: &[Order],
        instrument_token: i64,
        today: NaiveDate,
        canceller: &mut dyn OrderCanceller,
        now: DateTime<Utc>,
    ) -> Vec<HousekeepingOutcome> {
        orders
            .iter()
            .filter(|o| o.instrument_token == instrument_token && !o.is_terminal())
            .filter_map(|o| {
                let key = CleanupKey {
                    order_id: o.id,
                    reason: CleanupReason::ExpiredInstrument,
                    day: today,
                };
                if self.applied.contains(&key) {
                    return None;
                }
                self.applied.insert(key.clone());
                let (action, severity) = match canceller.cancel(o.id) {
                    Ok(()) => (CleanupAction::Cancelled, Severity::Info),
                    Err(_) => (CleanupAction::Failed, Severity::Warning),
                };
                Some(HousekeepingOutcome {
                    log: CleanupLog {
                        key,
                        order_id: o.id,
                        reason: CleanupReason::ExpiredInstrument,
                        action,
                        was_auto: true,
                        pre_position_qty: o.quantity_lots,
                        post_position_qty: 0,
                        ts_utc: now,
                    },
                    alert_severity: severity,
                    alert_reason: "instrument expires today".to_string(),
                })
            })
            .collect()
    }
}
