use std::sync::Arc;

use chrono::{DateTime, Utc};
use sodme_schemas::{Alert, AlertPayload, Severity};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::queue::SubscriberQueue;
use crate::store::AlertStore;

/// Default bound for a subscriber mailbox, matching the reference
/// workspace's SSE broadcast channel capacity.
pub const DEFAULT_SUBSCRIBER_CAPACITY: usize = 1024;

/// Fans out published alerts to a persistent store and to live
/// subscribers, plus a side channel that only ever carries `urgent`
/// alerts, for out-of-band notification.
pub struct AlertBus<S: AlertStore> {
    store: S,
    subscribers: std::sync::Mutex<Vec<Arc<SubscriberQueue>>>,
    urgent_tx: broadcast::Sender<Alert>,
}

impl<S: AlertStore> AlertBus<S> {
    pub fn new(store: S) -> Self {
        let (urgent_tx, _rx) = broadcast::channel(256);
        Self {
            store,
            subscribers: std::sync::Mutex::new(Vec::new()),
            urgent_tx,
        }
    }

    pub fn subscribe(&self) -> Arc<SubscriberQueue> {
        self.subscribe_with_capacity(DEFAULT_SUBSCRIBER_CAPACITY)
    }

    pub fn subscribe_with_capacity(&self, capacity: usize) -> Arc<SubscriberQueue> {
        let queue = Arc::new(SubscriberQueue::new(capacity));
        self.subscribers.lock().expect("lock poisoned").push(queue.clone());
        queue
    }

    pub fn subscribe_urgent(&self) -> broadcast::Receiver<Alert> {
        self.urgent_tx.subscribe()
    }

    /// Persists `alert`, then fans it out to every live subscriber in
    /// registration order. Subscriber pushes run concurrently but the
    /// publish call itself does not return until every subscriber has
    /// admitted (or definitively dropped) the alert, preserving
    /// per-strategy delivery order across sequential `publish` calls.
    pub async fn publish(&self, alert: Alert) -> Result<(), String> {
        self.store.persist(&alert)?;

        if alert.severity == Severity::Urgent {
            let _ = self.urgent_tx.send(alert.clone());
        }

        let subscribers = self.subscribers.lock().expect("lock poisoned").clone();
        for queue in subscribers {
            queue.push(alert.clone()).await;
        }
        Ok(())
    }

    /// Builds and publishes an `Alert` from a typed event payload.
    #[allow(clippy::too_many_arguments)]
    pub async fn publish_event(
        &self,
        strategy_id: Option<Uuid>,
        severity: Severity,
        title: impl Into<String>,
        body: impl Into<String>,
        payload: AlertPayload,
        proposed_actions: Vec<String>,
        now: DateTime<Utc>,
    ) -> Result<Alert, String> {
        let alert = Alert {
            id: Uuid::new_v4(),
            strategy_id,
            severity,
            title: title.into(),
            body: body.into(),
            payload,
            proposed_actions,
            created_at: now,
            expires_at: None,
            response: None,
            read: false,
        };
        self.publish(alert.clone()).await?;
        Ok(alert)
    }
}
