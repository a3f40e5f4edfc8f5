//! sodme-broker-paper
//!
//! Deterministic in-memory paper broker adapter: satisfies `BrokerAdapter`
//! without ever talking to NSE. No randomness, no wall-clock reads — every
//! method is a pure function of its arguments and the broker's current
//! `BTreeMap`-keyed state, so the same call sequence always produces the
//! same state, which is what the gateway's idempotency tests and the CLI's
//! paper-trading path both need.
//!
//! Design decisions (kept intentionally simple):
//! - `broker_order_id` is exactly the request's `idempotency_key`.
//! - `place` is idempotent: replaying the same key returns the existing
//!   order unchanged rather than creating a second one (the gateway already
//!   caches this, but the adapter enforces it independently so direct
//!   unit tests of `PaperBroker` see the same guarantee).
//! - Orders are accepted immediately; no partial fills are simulated. A
//!   caller that needs fills calls `fill` explicitly with a deterministic
//!   quantity.
//! - `get_margin` is a simple deterministic stand-in (a fixed per-lot rate),
//!   not a SPAN calculator — `sodme-margin` owns real margin computation.

use std::collections::BTreeMap;

use sodme_gateway::{
    BrokerAdapter, BrokerHolding, BrokerPosition, Funds, GatewayError, MarginBasketLeg,
    MarginBasketResult, ModifyOrderRequest, OrderAck, PlaceOrderRequest,
};
use sodme_schemas::{OrderStatus, Paise, Side};

/// A fixed per-lot margin rate used by the deterministic `get_margin` stand-in.
const PAPER_MARGIN_PER_LOT: Paise = Paise::from_rupees(60_000);

#[derive(Clone, Debug)]
pub struct PaperBroker {
    orders: BTreeMap<String, OrderAck>,
    positions: BTreeMap<i64, BrokerPosition>,
    holdings: BTreeMap<i64, BrokerHolding>,
    funds: Funds,
}

impl PaperBroker {
    pub fn new(funds: Funds) -> Self {
        Self { orders: BTreeMap::new(), positions: BTreeMap::new(), holdings: BTreeMap::new(), funds }
    }

    /// Seeds a position for test setup / scenario wiring. Not part of the
    /// `BrokerAdapter` contract.
    pub fn set_position(&mut self, instrument_token: i64, quantity_lots: i64, average_price: Paise) {
        self.positions.insert(
            instrument_token,
            BrokerPosition { instrument_token, quantity_lots, average_price },
        );
    }

    pub fn set_holding(&mut self, instrument_token: i64, quantity: i64, average_price: Paise) {
        self.holdings
            .insert(instrument_token, BrokerHolding { instrument_token, quantity, average_price });
    }

    /// Applies a deterministic fill, moving an order to `Filled` and
    /// updating (or creating) the matching position. Quantity is taken from
    /// the order itself so no random fill size is needed.
    pub fn fill(&mut self, broker_order_id: &str) -> Result<(), GatewayError> {
        let order = self.orders.get_mut(broker_order_id).ok_or_else(|| GatewayError::BrokerPermanent {
            endpoint: "fill".to_string(),
            message: format!("no such order {broker_order_id}"),
        })?;
        order.status = OrderStatus::Filled;
        let signed_qty = match order.side {
            Side::Buy => order.quantity_lots,
            Side::Sell => -order.quantity_lots,
        };
        let entry = self.positions.entry(order.instrument_token).or_insert(BrokerPosition {
            instrument_token: order.instrument_token,
            quantity_lots: 0,
            average_price: Paise::ZERO,
        });
        entry.quantity_lots += signed_qty;
        Ok(())
    }
}

impl BrokerAdapter for PaperBroker {
    fn place(&mut self, req: PlaceOrderRequest) -> Result<OrderAck, GatewayError> {
        if let Some(existing) = self.orders.get(&req.idempotency_key) {
            return Ok(existing.clone());
        }
        let ack = OrderAck {
            broker_order_id: req.idempotency_key.clone(),
            client_order_id: req.idempotency_key.clone(),
            instrument_token: req.instrument_token,
            side: req.side,
            quantity_lots: req.quantity_lots,
            status: OrderStatus::Open,
        };
        self.orders.insert(req.idempotency_key, ack.clone());
        Ok(ack)
    }

    fn modify(&mut self, req: ModifyOrderRequest) -> Result<OrderAck, GatewayError> {
        let order = self.orders.get_mut(&req.broker_order_id).ok_or_else(|| GatewayError::BrokerPermanent {
            endpoint: "modify".to_string(),
            message: format!("no such order {}", req.broker_order_id),
        })?;
        if let Some(qty) = req.quantity_lots {
            order.quantity_lots = qty;
        }
        Ok(order.clone())
    }

    fn cancel(&mut self, broker_order_id: &str) -> Result<OrderAck, GatewayError> {
        let order = self.orders.get_mut(broker_order_id).ok_or_else(|| GatewayError::BrokerPermanent {
            endpoint: "cancel".to_string(),
            message: format!("no such order {broker_order_id}"),
        })?;
        order.status = OrderStatus::Cancelled;
        Ok(order.clone())
    }

    fn list_orders(&self) -> Result<Vec<OrderAck>, GatewayError> {
        Ok(self.orders.values().cloned().collect())
    }

    fn list_positions(&self) -> Result<Vec<BrokerPosition>, GatewayError> {
        Ok(self.positions.values().cloned().collect())
    }

    fn list_holdings(&self) -> Result<Vec<BrokerHolding>, GatewayError> {
        Ok(self.holdings.values().cloned().collect())
    }

    fn get_funds(&self) -> Result<Funds, GatewayError> {
        Ok(self.funds)
    }

    fn get_margin(&self, basket: &[MarginBasketLeg]) -> Result<MarginBasketResult, GatewayError> {
        let lots: i64 = basket.iter().map(|leg| leg.quantity_lots.abs()).sum();
        let total = PAPER_MARGIN_PER_LOT * lots;
        Ok(MarginBasketResult {
            span_margin: total.scaled_by(0.8),
            exposure_margin: total.scaled_by(0.2),
            total_margin: total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sodme_gateway::PlaceOrderRequest;
    use sodme_schemas::OrderType;

    fn place_req(key: &str, qty: i64) -> PlaceOrderRequest {
        PlaceOrderRequest {
            idempotency_key: key.to_string(),
            instrument_token: 256265,
            side: Side::Buy,
            order_type: OrderType::Market,
            quantity_lots: qty,
            price: None,
            trigger_price: None,
        }
    }

    #[test]
    fn place_is_idempotent_on_the_same_key() {
        let mut broker = PaperBroker::new(Funds { available_margin: Paise::from_rupees(10_000_000), used_margin: Paise::ZERO });
        let first = broker.place(place_req("k1", 2)).unwrap();
        let second = broker.place(place_req("k1", 5)).unwrap();
        assert_eq!(first, second);
        assert_eq!(broker.list_orders().unwrap().len(), 1);
    }

    #[test]
    fn fill_moves_order_to_filled_and_updates_position() {
        let mut broker = PaperBroker::new(Funds { available_margin: Paise::ZERO, used_margin: Paise::ZERO });
        broker.place(place_req("k1", 3)).unwrap();
        broker.fill("k1").unwrap();

        let orders = broker.list_orders().unwrap();
        assert_eq!(orders[0].status, OrderStatus::Filled);

        let positions = broker.list_positions().unwrap();
        assert_eq!(positions[0].quantity_lots, 3);
    }

    #[test]
    fn cancel_unknown_order_is_a_permanent_error() {
        let mut broker = PaperBroker::new(Funds { available_margin: Paise::ZERO, used_margin: Paise::ZERO });
        let err = broker.cancel("nope").unwrap_err();
        assert!(matches!(err, GatewayError::BrokerPermanent { .. }));
    }

    #[test]
    fn get_margin_scales_with_basket_lots() {
        let broker = PaperBroker::new(Funds { available_margin: Paise::ZERO, used_margin: Paise::ZERO });
        let basket = vec![
            MarginBasketLeg { instrument_token: 1, side: Side::Buy, order_type: OrderType::Market, quantity_lots: 2, price: None },
            MarginBasketLeg { instrument_token: 2, side: Side::Sell, order_type: OrderType::Market, quantity_lots: 3, price: None },
        ];
        let result = broker.get_margin(&basket).unwrap();
        assert_eq!(result.total_margin, Paise::from_rupees(60_000 * 5));
        assert_eq!(result.span_margin + result.exposure_margin, result.total_margin);
    }
}
