use chrono::NaiveTime;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SquareOffPhase {
    BeforeWarning,
    /// At `warning_time`: send an advisory, no orders placed yet.
    Advisory,
    /// At `square_off_time`: place market orders to flatten MIS positions.
    Flatten,
    /// 5 minutes after `square_off_time`: retry any remainders.
    Retry,
}

const RETRY_DELAY_MINUTES: i64 = 5;

pub fn phase_at(now: NaiveTime, warning_time: NaiveTime, square_off_time: NaiveTime) -> SquareOffPhase {
    let retry_at = square_off_time + chrono::Duration::minutes(RETRY_DELAY_MINUTES);
    if now < warning_time {
        SquareOffPhase::BeforeWarning
    } else if now < square_off_time {
        SquareOffPhase::Advisory
    } else if now < retry_at {
        SquareOffPhase::Flatten
    } else {
        SquareOffPhase::Retry
    }
}
