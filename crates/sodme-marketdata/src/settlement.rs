use std::collections::HashMap;

use chrono::NaiveDate;

use crate::types::SettlementPrice;

/// In-memory cache of per-instrument, per-date futures settlement prices,
/// fed by the 15:35 settlement-ingest timer.
#[derive(Default)]
pub struct SettlementCache {
    prices: HashMap<(i64, NaiveDate), SettlementPrice>,
}

impl SettlementCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, price: SettlementPrice) {
        self.prices.insert((price.instrument_token, price.settlement_date), price);
    }

    pub fn get(&self, instrument_token: i64, settlement_date: NaiveDate) -> Option<SettlementPrice> {
        self.prices.get(&(instrument_token, settlement_date)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sodme_schemas::money::Paise;

    #[test]
    fn records_and_fetches_by_instrument_and_date() {
        let mut cache = SettlementCache::new();
        let d = NaiveDate::from_ymd_opt(2026, 3, 27).unwrap();
        cache.record(SettlementPrice { instrument_token: 111, settlement_date: d, price: Paise::from_rupees(21_500) });

        assert_eq!(cache.get(111, d).unwrap().price, Paise::from_rupees(21_500));
        assert!(cache.get(222, d).is_none());
    }

    #[test]
    fn a_later_record_for_the_same_key_overwrites() {
        let mut cache = SettlementCache::new();
        let d = NaiveDate::from_ymd_opt(2026, 3, 27).unwrap();
        cache.record(SettlementPrice { instrument_token: 111, settlement_date: d, price: Paise::from_rupees(21_500) });
        cache.record(SettlementPrice { instrument_token: 111, settlement_date: d, price: Paise::from_rupees(21_510) });

        assert_eq!(cache.get(111, d).unwrap().price, Paise::from_rupees(21_510));
    }
}
