use std::collections::VecDeque;

use sodme_schemas::{Alert, Severity};
use tokio::sync::{Mutex, Notify};

fn is_droppable(severity: Severity) -> bool {
    severity.rank() < Severity::Critical.rank()
}

/// A single subscriber's bounded mailbox. Full queues drop the oldest
/// `info`/`warning` entry to make room for a new one; `critical`/`urgent`
/// entries are never dropped — once the queue holds nothing but
/// undroppable entries, `push` suspends the publisher until the consumer
/// drains one.
pub struct SubscriberQueue {
    capacity: usize,
    items: Mutex<VecDeque<Alert>>,
    item_available: Notify,
    space_available: Notify,
}

impl SubscriberQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: Mutex::new(VecDeque::with_capacity(capacity)),
            item_available: Notify::new(),
            space_available: Notify::new(),
        }
    }

    /// Enqueues `alert`, applying the severity-aware drop/block policy.
    /// Returns `true` if an older entry was dropped to make room.
    pub async fn push(&self, alert: Alert) -> bool {
        loop {
            let mut items = self.items.lock().await;
            if items.len() < self.capacity {
                items.push_back(alert);
                drop(items);
                self.item_available.notify_one();
                return false;
            }

            if let Some(pos) = items.iter().position(|a| is_droppable(a.severity)) {
                items.remove(pos);
                items.push_back(alert);
                drop(items);
                self.item_available.notify_one();
                return true;
            }

            if is_droppable(alert.severity) {
                // Queue is saturated with undroppable entries; a droppable
                // one is simply not admitted rather than blocking.
                return true;
            }

            // Undroppable alert, no droppable victim: block until the
            // consumer frees a slot.
            drop(items);
            self.space_available.notified().await;
        }
    }

    pub async fn pop(&self) -> Alert {
        loop {
            let mut items = self.items.lock().await;
            if let Some(alert) = items.pop_front() {
                drop(items);
                self.space_available.notify_one();
                return alert;
            }
            drop(items);
            self.item_available.notified().await;
        }
    }

    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }
}
