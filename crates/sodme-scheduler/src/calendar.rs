use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Asia::Kolkata;
use chrono_tz::Tz;

pub const EXCHANGE_TZ: Tz = Kolkata;

/// The fixed daily NSE-local-time fire points.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TimerName {
    MarginRefresh,
    PreMarket,
    Open,
    SquareOffWarning,
    MisSquareOff,
    CloseSnapshot,
    FuturesSettlement,
    EodReconciliation,
}

impl TimerName {
    pub const ALL: [TimerName; 8] = [
        TimerName::MarginRefresh,
        TimerName::PreMarket,
        TimerName::Open,
        TimerName::SquareOffWarning,
        TimerName::MisSquareOff,
        TimerName::CloseSnapshot,
        TimerName::FuturesSettlement,
        TimerName::EodReconciliation,
    ];

    /// Local (`Asia/Kolkata`) time of day this timer fires at.
    pub fn local_time(self) -> NaiveTime {
        match self {
            TimerName::MarginRefresh => NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            TimerName::PreMarket => NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            TimerName::Open => NaiveTime::from_hms_opt(9, 15, 0).unwrap(),
            TimerName::SquareOffWarning => NaiveTime::from_hms_opt(15, 15, 0).unwrap(),
            TimerName::MisSquareOff => NaiveTime::from_hms_opt(15, 20, 0).unwrap(),
            TimerName::CloseSnapshot => NaiveTime::from_hms_opt(15, 30, 0).unwrap(),
            TimerName::FuturesSettlement => NaiveTime::from_hms_opt(15, 35, 0).unwrap(),
            // EOD reconciliation runs after settlement; modeled as a fixed
            // fire point rather than an event-chained one, matching the
            // other entries in this table.
            TimerName::EodReconciliation => NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
        }
    }
}

/// The next UTC instant, strictly after `after_utc`, at which `timer`
/// fires in exchange-local time.
pub fn next_fire_after(timer: TimerName, after_utc: DateTime<Utc>) -> DateTime<Utc> {
    let local_now = after_utc.with_timezone(&EXCHANGE_TZ);
    let mut candidate_date = local_now.date_naive();
    loop {
        let candidate_local = EXCHANGE_TZ
            .from_local_datetime(&candidate_date.and_time(timer.local_time()))
            .single()
            .expect("NSE fire times never land on a DST transition in Asia/Kolkata");
        let candidate_utc = candidate_local.with_timezone(&Utc);
        if candidate_utc > after_utc {
            return candidate_utc;
        }
        candidate_date = candidate_date.succ_opt().expect("date arithmetic in range");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn utc_at(y: i32, m: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.from_utc_datetime(&NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, mi, 0).unwrap())
    }

    #[test]
    fn fires_later_today_when_before_the_fire_time() {
        // 08:00 IST on 2026-03-10 is 02:30 UTC.
        let after = utc_at(2026, 3, 10, 2, 30);
        let fire = next_fire_after(TimerName::Open, after);
        let local = fire.with_timezone(&EXCHANGE_TZ);
        assert_eq!(local.naive_local().date(), NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());
        assert_eq!(local.time(), TimerName::Open.local_time());
    }

    #[test]
    fn rolls_to_tomorrow_when_fire_time_already_passed() {
        // 16:00 IST is past the 09:15 open.
        let after = utc_at(2026, 3, 10, 10, 30);
        let fire = next_fire_after(TimerName::Open, after);
        let local = fire.with_timezone(&EXCHANGE_TZ);
        assert_eq!(local.naive_local().date(), NaiveDate::from_ymd_opt(2026, 3, 11).unwrap());
    }

    #[test]
    fn is_strictly_after_the_reference_instant() {
        let exact_fire_time = next_fire_after(TimerName::MisSquareOff, utc_at(2026, 3, 10, 0, 0));
        let next = next_fire_after(TimerName::MisSquareOff, exact_fire_time);
        assert!(next > exact_fire_time);
    }
}
