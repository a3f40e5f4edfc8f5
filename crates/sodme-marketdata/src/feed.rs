use std::collections::HashMap;
use std::sync::Mutex;

use sodme_schemas::depth::DepthSnapshot;
use tokio::sync::watch;

/// Fan-out point for live depth ticks: one `watch` channel per instrument
/// token. A `watch` channel (rather than a queue) matches the data's own
/// replace-on-update nature — a depth snapshot supersedes the previous one
/// rather than accumulating, so a slow subscriber should see the latest
/// book, not a backlog of stale ones. This gives both halves of the "pull"
/// (borrow the current value) and "subscribe" (await the next change)
/// interface from one handle.
pub struct DepthFeedHub {
    channels: Mutex<HashMap<i64, watch::Sender<Option<DepthSnapshot>>>>,
}

impl DepthFeedHub {
    pub fn new() -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
        }
    }

    fn sender_for(&self, instrument_token: i64) -> watch::Sender<Option<DepthSnapshot>> {
        let mut channels = self.channels.lock().expect("lock poisoned");
        channels
            .entry(instrument_token)
            .or_insert_with(|| watch::channel(None).0)
            .clone()
    }

    /// Publishes a new snapshot, creating the channel for this instrument
    /// token on first use.
    pub fn publish(&self, snapshot: DepthSnapshot) {
        let sender = self.sender_for(snapshot.instrument_token);
        let _ = sender.send(Some(snapshot));
    }

    /// Current snapshot for an instrument, if any tick has ever arrived.
    pub fn latest(&self, instrument_token: i64) -> Option<DepthSnapshot> {
        self.channels
            .lock()
            .expect("lock poisoned")
            .get(&instrument_token)
            .and_then(|tx| tx.borrow().clone())
    }

    /// Subscribe to future updates for an instrument token. The returned
    /// receiver's `borrow()` is the pull half; `changed().await` is the
    /// subscribe half.
    pub fn subscribe(&self, instrument_token: i64) -> watch::Receiver<Option<DepthSnapshot>> {
        self.sender_for(instrument_token).subscribe()
    }
}

impl Default for DepthFeedHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sodme_schemas::depth::DepthLevel;
    use sodme_schemas::money::Paise;

    fn snapshot(instrument_token: i64, bid: i64) -> DepthSnapshot {
        DepthSnapshot {
            instrument_token,
            bids: vec![DepthLevel { price: Paise::from_rupees(bid), quantity: 50 }],
            asks: vec![DepthLevel { price: Paise::from_rupees(bid + 1), quantity: 50 }],
        }
    }

    #[test]
    fn latest_is_none_before_any_publish() {
        let hub = DepthFeedHub::new();
        assert!(hub.latest(111).is_none());
    }

    #[test]
    fn publish_updates_latest_for_that_instrument_only() {
        let hub = DepthFeedHub::new();
        hub.publish(snapshot(111, 100));
        hub.publish(snapshot(222, 200));

        assert_eq!(hub.latest(111).unwrap().best_bid(), Some(Paise::from_rupees(100)));
        assert_eq!(hub.latest(222).unwrap().best_bid(), Some(Paise::from_rupees(200)));
    }

    #[tokio::test]
    async fn subscriber_observes_a_later_publish() {
        let hub = DepthFeedHub::new();
        hub.publish(snapshot(111, 100));

        let mut rx = hub.subscribe(111);
        assert_eq!(rx.borrow().clone().unwrap().best_bid(), Some(Paise::from_rupees(100)));

        hub.publish(snapshot(111, 105));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().clone().unwrap().best_bid(), Some(Paise::from_rupees(105)));
    }
}
