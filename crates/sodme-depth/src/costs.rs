use sodme_schemas::execution::CostBreakdown;
use sodme_schemas::instrument::Segment;
use sodme_schemas::money::Paise;
use sodme_schemas::order::Side;

/// Statutory and broker charge rates, expressed as a fraction of order
/// value. Varies by segment (STT is sell-side-only on options premium,
/// double-sided on futures turnover; stamp duty is buy-side-only). Exposed
/// as a struct rather than module constants so a strategy's settings can
/// override rates without this crate knowing about broker-specific plans.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CostRateTable {
    /// Flat brokerage per executed order, capped by `brokerage_pct` of
    /// order value, whichever is lower — the discount-broker convention.
    pub brokerage_flat: Paise,
    pub brokerage_pct: f64,
    pub stt_buy_pct: f64,
    pub stt_sell_pct: f64,
    pub exchange_txn_pct: f64,
    pub gst_pct: f64,
    pub sebi_pct: f64,
    pub stamp_duty_buy_pct: f64,
}

impl CostRateTable {
    pub fn futures() -> Self {
        Self {
            brokerage_flat: Paise::from_rupees(20),
            brokerage_pct: 0.0003,
            stt_buy_pct: 0.0,
            stt_sell_pct: 0.0002,
            exchange_txn_pct: 0.0000173,
            gst_pct: 0.18,
            sebi_pct: 0.0000001,
            stamp_duty_buy_pct: 0.00002,
        }
    }

    pub fn options() -> Self {
        Self {
            brokerage_flat: Paise::from_rupees(20),
            brokerage_pct: 0.0003,
            stt_buy_pct: 0.0,
            stt_sell_pct: 0.001,
            exchange_txn_pct: 0.0003503,
            gst_pct: 0.18,
            sebi_pct: 0.0000001,
            stamp_duty_buy_pct: 0.00003,
        }
    }

    pub fn for_segment(segment: Segment) -> Self {
        match segment {
            Segment::Futures => Self::futures(),
            Segment::Options => Self::options(),
            Segment::Equity => Self::futures(),
        }
    }
}

/// Computes the full statutory + broker charge breakdown for one order.
/// `order_value` is always a positive quantity (price × quantity × lot
/// size, unsigned); `side` determines which STT/stamp-duty leg applies and
/// the sign of `net_cost`.
pub fn calculate_costs(order_value: Paise, side: Side, rates: &CostRateTable) -> CostBreakdown {
    let brokerage = rates.brokerage_flat.min(order_value.scaled_by(rates.brokerage_pct));

    let stt = match side {
        Side::Buy => order_value.scaled_by(rates.stt_buy_pct),
        Side::Sell => order_value.scaled_by(rates.stt_sell_pct),
    };
    let exchange_charges = order_value.scaled_by(rates.exchange_txn_pct);
    let sebi_charges = order_value.scaled_by(rates.sebi_pct);
    let gst = (brokerage + exchange_charges).scaled_by(rates.gst_pct);
    let stamp_duty = match side {
        Side::Buy => order_value.scaled_by(rates.stamp_duty_buy_pct),
        Side::Sell => Paise::ZERO,
    };

    let total_charges = brokerage + stt + exchange_charges + gst + sebi_charges + stamp_duty;
    let net_cost = match side {
        Side::Buy => order_value + total_charges,
        Side::Sell => order_value - total_charges,
    };

    CostBreakdown {
        order_value,
        brokerage,
        stt,
        exchange_charges,
        gst,
        sebi_charges,
        stamp_duty,
        total_charges,
        net_cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buy_net_cost_adds_charges_to_order_value() {
        let rates = CostRateTable::options();
        let breakdown = calculate_costs(Paise::from_rupees(100_000), Side::Buy, &rates);
        assert!(breakdown.net_cost > breakdown.order_value);
        assert_eq!(breakdown.stamp_duty, Paise::from_rupees(100_000).scaled_by(rates.stamp_duty_buy_pct));
        assert_eq!(breakdown.stt, Paise::ZERO);
    }

    #[test]
    fn sell_net_cost_subtracts_charges_from_order_value() {
        let rates = CostRateTable::options();
        let breakdown = calculate_costs(Paise::from_rupees(100_000), Side::Sell, &rates);
        assert!(breakdown.net_cost < breakdown.order_value);
        assert_eq!(breakdown.stamp_duty, Paise::ZERO);
        assert!(breakdown.stt > Paise::ZERO);
    }

    #[test]
    fn total_charges_is_the_sum_of_every_named_line_item() {
        let rates = CostRateTable::futures();
        let breakdown = calculate_costs(Paise::from_rupees(500_000), Side::Buy, &rates);
        let sum = breakdown.brokerage
            + breakdown.stt
            + breakdown.exchange_charges
            + breakdown.gst
            + breakdown.sebi_charges
            + breakdown.stamp_duty;
        assert_eq!(breakdown.total_charges, sum);
    }

    #[test]
    fn brokerage_is_capped_at_the_flat_fee_for_large_orders() {
        let rates = CostRateTable::futures();
        let breakdown = calculate_costs(Paise::from_rupees(10_000_000), Side::Buy, &rates);
        assert_eq!(breakdown.brokerage, rates.brokerage_flat);
    }

    #[test]
    fn brokerage_is_capped_at_the_percentage_for_small_orders() {
        let rates = CostRateTable::futures();
        let breakdown = calculate_costs(Paise::from_rupees(1_000), Side::Buy, &rates);
        assert_eq!(breakdown.brokerage, Paise::from_rupees(1_000).scaled_by(rates.brokerage_pct));
    }
}
