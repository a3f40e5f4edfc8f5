use std::collections::HashMap;

use chrono::NaiveDate;
use sodme_margin::types::NseMarginCache;
use sodme_schemas::money::Paise;

use crate::types::NseMarginFileRow;

/// In-memory cache of the daily NSE margin file, refreshed wholesale once a
/// day (the 18:00 NSE margin refresh timer in `sodme-scheduler`). Implements
/// `sodme_margin::types::NseMarginCache` directly so the margin engine never
/// needs to know this data came from a flat file ingest rather than a live
/// broker call.
#[derive(Default)]
pub struct NseMarginFileCache {
    rows: HashMap<(i64, NaiveDate), NseMarginFileRow>,
}

impl NseMarginFileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every cached row for `as_of_date` with the freshly ingested
    /// file. Rows for other dates are left untouched, so a same-day retry
    /// after a partial parse failure does not lose yesterday's cache.
    pub fn load_day(&mut self, as_of_date: NaiveDate, rows: impl IntoIterator<Item = NseMarginFileRow>) {
        self.rows.retain(|(_, date), _| *date != as_of_date);
        for row in rows {
            self.rows.insert((row.instrument_token, row.as_of_date), row);
        }
    }

    pub fn exposure_pct(&self, instrument_token: i64, as_of_date: NaiveDate) -> Option<f64> {
        self.rows.get(&(instrument_token, as_of_date)).map(|r| r.exposure_pct)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl NseMarginCache for NseMarginFileCache {
    fn base_span(&self, instrument_token: i64, effective_date: NaiveDate) -> Option<Paise> {
        self.rows.get(&(instrument_token, effective_date)).map(|r| r.base_span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(instrument_token: i64, date: NaiveDate, span: i64) -> NseMarginFileRow {
        NseMarginFileRow {
            instrument_token,
            as_of_date: date,
            base_span: Paise::from_rupees(span),
            exposure_pct: 3.0,
        }
    }

    #[test]
    fn base_span_is_none_before_any_load() {
        let cache = NseMarginFileCache::new();
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        assert_eq!(cache.base_span(111, today), None);
    }

    #[test]
    fn loading_a_day_replaces_only_that_day() {
        let mut cache = NseMarginFileCache::new();
        let d1 = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2026, 3, 11).unwrap();

        cache.load_day(d1, vec![row(111, d1, 30_000)]);
        cache.load_day(d2, vec![row(111, d2, 31_000)]);

        assert_eq!(cache.base_span(111, d1), Some(Paise::from_rupees(30_000)));
        assert_eq!(cache.base_span(111, d2), Some(Paise::from_rupees(31_000)));
    }

    #[test]
    fn reloading_the_same_day_overwrites_stale_rows() {
        let mut cache = NseMarginFileCache::new();
        let d1 = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();

        cache.load_day(d1, vec![row(111, d1, 30_000)]);
        cache.load_day(d1, vec![row(111, d1, 32_000)]);

        assert_eq!(cache.base_span(111, d1), Some(Paise::from_rupees(32_000)));
        assert_eq!(cache.len(), 1);
    }
}
