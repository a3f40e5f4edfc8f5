//! sodme-alerts
//!
//! Typed event bus: publishes to a persistent store and fans out to live
//! subscribers through per-subscriber bounded mailboxes with a
//! severity-aware drop policy (drop oldest `info`/`warning` first, never
//! drop `critical`/`urgent`), plus a side channel carrying only `urgent`
//! alerts for out-of-band notification.

pub mod bus;
pub mod error;
pub mod queue;
pub mod store;

pub use bus::{AlertBus, DEFAULT_SUBSCRIBER_CAPACITY};
pub use error::AlertsError;
pub use queue::SubscriberQueue;
pub use store::{AlertStore, InMemoryAlertStore};
