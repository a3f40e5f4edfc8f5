use chrono::{DateTime, Utc};

/// A token bucket limiter. Capacity and refill rate are both expressed in
/// tokens per second; fractional tokens accumulate between calls so a
/// sub-1/s rate (margin calc, default 0.2/s) is representable.
#[derive(Debug, Clone)]
pub struct TokenBucket {
    capacity: f64,
    tokens: f64,
    refill_per_sec: f64,
    last_refill: DateTime<Utc>,
}

impl TokenBucket {
    pub fn new(refill_per_sec: f64, now: DateTime<Utc>) -> Self {
        let capacity = refill_per_sec.max(1.0);
        Self {
            capacity,
            tokens: capacity,
            refill_per_sec,
            last_refill: now,
        }
    }

    fn refill(&mut self, now: DateTime<Utc>) {
        let elapsed = (now - self.last_refill).num_milliseconds().max(0) as f64 / 1000.0;
        self.tokens = (self.tokens + elapsed * self.refill_per_sec).min(self.capacity);
        self.last_refill = now;
    }

    /// Attempts to take one token. Returns `true` and debits the bucket on
    /// success, leaves it untouched on failure.
    pub fn try_acquire(&mut self, now: DateTime<Utc>) -> bool {
        self.refill(now);
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Per-endpoint-class token buckets for the two rate-limited call classes:
/// order placement/modification/cancellation, and margin-basket calculation.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    orders: TokenBucket,
    margin_calc: TokenBucket,
}

pub const DEFAULT_ORDERS_PER_SEC: f64 = 10.0;
pub const DEFAULT_MARGIN_CALC_PER_SEC: f64 = 0.2;

impl RateLimiter {
    pub fn new(orders_per_sec: f64, margin_calc_per_sec: f64, now: DateTime<Utc>) -> Self {
        Self {
            orders: TokenBucket::new(orders_per_sec, now),
            margin_calc: TokenBucket::new(margin_calc_per_sec, now),
        }
    }

    pub fn default_limits(now: DateTime<Utc>) -> Self {
        Self::new(DEFAULT_ORDERS_PER_SEC, DEFAULT_MARGIN_CALC_PER_SEC, now)
    }

    pub fn try_acquire_order(&mut self, now: DateTime<Utc>) -> bool {
        self.orders.try_acquire(now)
    }

    pub fn try_acquire_margin_calc(&mut self, now: DateTime<Utc>) -> bool {
        self.margin_calc.try_acquire(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn bucket_starts_full_and_drains() {
        let mut bucket = TokenBucket::new(10.0, t(0));
        for _ in 0..10 {
            assert!(bucket.try_acquire(t(0)));
        }
        assert!(!bucket.try_acquire(t(0)));
    }

    #[test]
    fn bucket_refills_over_time() {
        let mut bucket = TokenBucket::new(10.0, t(0));
        for _ in 0..10 {
            bucket.try_acquire(t(0));
        }
        assert!(!bucket.try_acquire(t(0)));
        assert!(bucket.try_acquire(t(1)));
    }

    #[test]
    fn sub_one_per_second_rate_needs_several_seconds_to_refill() {
        let mut bucket = TokenBucket::new(0.2, t(0));
        bucket.try_acquire(t(0));
        assert!(!bucket.try_acquire(t(1)));
        assert!(!bucket.try_acquire(t(4)));
        assert!(bucket.try_acquire(t(5)));
    }

    #[test]
    fn order_and_margin_buckets_are_independent() {
        let mut limiter = RateLimiter::default_limits(t(0));
        for _ in 0..10 {
            assert!(limiter.try_acquire_order(t(0)));
        }
        assert!(!limiter.try_acquire_order(t(0)));
        assert!(limiter.try_acquire_margin_calc(t(0)));
    }
}
