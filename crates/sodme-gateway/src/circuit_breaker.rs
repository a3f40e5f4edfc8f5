use chrono::{DateTime, Duration, Utc};

/// Declarative circuit breaker state. Opens after `failure_threshold`
/// consecutive failures observed inside `failure_window`; while open, every
/// request is refused without reaching the broker until `open_duration` has
/// elapsed, at which point a single half-open probe is allowed through. A
/// successful probe closes the breaker; a failed one reopens it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitPhase {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug, Clone)]
pub struct CircuitBreaker {
    phase: CircuitPhase,
    consecutive_failures: u32,
    failure_threshold: u32,
    failure_window: Duration,
    open_duration: Duration,
    window_start: Option<DateTime<Utc>>,
    opened_at: Option<DateTime<Utc>>,
    half_open_probe_in_flight: bool,
}

impl CircuitBreaker {
    pub fn new(failure_threshold: u32, failure_window: Duration, open_duration: Duration) -> Self {
        Self {
            phase: CircuitPhase::Closed,
            consecutive_failures: 0,
            failure_threshold,
            failure_window,
            open_duration,
            window_start: None,
            opened_at: None,
            half_open_probe_in_flight: false,
        }
    }

    pub fn phase(&self) -> CircuitPhase {
        self.phase
    }

    /// Whether the caller may attempt this request. Transitions `Open` to
    /// `HalfOpen` once the open duration has elapsed and admits exactly one
    /// probe; every other request while `Open` is refused.
    pub fn allow_request(&mut self, now: DateTime<Utc>) -> bool {
        match self.phase {
            CircuitPhase::Closed => true,
            CircuitPhase::HalfOpen => !self.half_open_probe_in_flight,
            CircuitPhase::Open => {
                let opened_at = self.opened_at.expect("opened_at set when entering Open");
                if now - opened_at >= self.open_duration {
                    self.phase = CircuitPhase::HalfOpen;
                    self.half_open_probe_in_flight = true;
                    true
                } else {
                    false
                }
            }
        }
    }

    pub fn record_success(&mut self, _now: DateTime<Utc>) {
        self.consecutive_failures = 0;
        self.window_start = None;
        self.half_open_probe_in_flight = false;
        self.phase = CircuitPhase::Closed;
        self.opened_at = None;
    }

    pub fn record_failure(&mut self, now: DateTime<Utc>) {
        if self.phase == CircuitPhase::HalfOpen {
            self.half_open_probe_in_flight = false;
            self.trip(now);
            return;
        }

        match self.window_start {
            Some(start) if now - start <= self.failure_window => {
                self.consecutive_failures += 1;
            }
            _ => {
                self.window_start = Some(now);
                self.consecutive_failures = 1;
            }
        }

        if self.consecutive_failures >= self.failure_threshold {
            self.trip(now);
        }
    }

    fn trip(&mut self, now: DateTime<Utc>) {
        self.phase = CircuitPhase::Open;
        self.opened_at = Some(now);
        self.consecutive_failures = 0;
        self.window_start = None;
    }
}
