use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::time::Duration;

use crate::calendar::TimerName;
use crate::table::TimerTable;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimerFired {
    pub name: TimerName,
    pub fired_at_poll: DateTime<Utc>,
}

/// Generalizes the reference workspace's single fixed-interval heartbeat
/// task into a poll loop over a table of named timers. Each tick checks
/// every timer against wall-clock `now` and emits one `TimerFired` per due
/// timer into `out`; `out` is typically drained into `sodme-alerts`'s
/// internal event path or directly into the margin/housekeeping workers'
/// input queues.
pub fn spawn_timer_table(mut table: TimerTable, poll_interval: Duration, out: mpsc::Sender<TimerFired>) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(poll_interval);
        loop {
            ticker.tick().await;
            let now = Utc::now();
            for name in table.due(now) {
                if out.send(TimerFired { name, fired_at_poll: now }).await.is_err() {
                    return;
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TimerState;

    #[tokio::test(start_paused = true)]
    async fn due_timer_is_emitted_on_the_next_poll() {
        let now = Utc::now();
        let overdue = TimerState { name: TimerName::PreMarket, next_fire: now - chrono::Duration::seconds(1) };
        let table = TimerTable::restore(&[overdue], now);

        let (tx, mut rx) = mpsc::channel(8);
        spawn_timer_table(table, Duration::from_millis(10), tx);

        tokio::time::advance(Duration::from_millis(15)).await;
        let fired = rx.recv().await.expect("channel still open");
        assert_eq!(fired.name, TimerName::PreMarket);
    }
}
