//! sodme-scheduler
//!
//! Cron-like timer table producing internal events for the fixed NSE daily
//! calendar (margin refresh, pre-market, open, square-off warning, MIS
//! square-off, close snapshot, futures settlement, EOD reconciliation),
//! plus a standalone VIX-triggered recompute check. Next-fire times are
//! plain data (`TimerState`) so restart survival is just persisting and
//! reloading them.

pub mod calendar;
pub mod scheduler;
pub mod table;
pub mod vix_trigger;

pub use calendar::{next_fire_after, TimerName, EXCHANGE_TZ};
pub use scheduler::{spawn_timer_table, TimerFired};
pub use table::{TimerState, TimerTable};
pub use vix_trigger::vix_recompute_needed;
