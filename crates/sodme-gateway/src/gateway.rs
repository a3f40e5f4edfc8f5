use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::adapter::BrokerAdapter;
use crate::circuit_breaker::CircuitBreaker;
use crate::error::GatewayError;
use crate::rate_limit::RateLimiter;
use crate::types::{
    BrokerHolding, BrokerPosition, Funds, MarginBasketLeg, MarginBasketResult, ModifyOrderRequest,
    OrderAck, PlaceOrderRequest,
};

/// The single choke-point for every broker operation. Nothing outside this
/// crate ever touches a `BrokerAdapter` directly: `BrokerGateway` evaluates
/// the session, rate limit and circuit breaker gates, in that order, before
/// delegating, and records the adapter's outcome back into the breaker.
pub struct BrokerGateway<B: BrokerAdapter> {
    adapter: B,
    limiter: RateLimiter,
    breaker: CircuitBreaker,
    session_valid: bool,
    /// Idempotency cache for `place`: replaying the same key returns the
    /// cached ack instead of calling the adapter again.
    placed: HashMap<String, OrderAck>,
}

impl<B: BrokerAdapter> BrokerGateway<B> {
    pub fn new(adapter: B, limiter: RateLimiter, breaker: CircuitBreaker) -> Self {
        Self {
            adapter,
            limiter,
            breaker,
            session_valid: true,
            placed: HashMap::new(),
        }
    }

    pub fn is_circuit_open(&self) -> bool {
        self.breaker.phase() == crate::circuit_breaker::CircuitPhase::Open
    }

    /// Invalidates the session. New orders are rejected with
    /// `SessionInvalid` until `refresh_session` is called; the caller is
    /// responsible for emitting the URGENT alert this event requires.
    pub fn invalidate_session(&mut self) {
        self.session_valid = false;
    }

    pub fn refresh_session(&mut self) {
        self.session_valid = true;
    }

    pub fn is_session_valid(&self) -> bool {
        self.session_valid
    }

    /// Places an order. Exactly one broker order results from any number of
    /// calls sharing the same `idempotency_key` (property 3): the first
    /// call reaches the adapter, every later call with the same key returns
    /// the cached ack without calling out again.
    pub fn place(
        &mut self,
        req: PlaceOrderRequest,
        now: DateTime<Utc>,
    ) -> Result<OrderAck, GatewayError> {
        if let Some(cached) = self.placed.get(&req.idempotency_key) {
            return Ok(cached.clone());
        }
        if !self.session_valid {
            return Err(GatewayError::SessionInvalid);
        }
        if !self.breaker.allow_request(now) {
            return Err(GatewayError::CircuitOpen);
        }
        if !self.limiter.try_acquire_order(now) {
            return Err(GatewayError::RateLimited { endpoint: "place".to_string() });
        }

        let key = req.idempotency_key.clone();
        match self.adapter.place(req) {
            Ok(ack) => {
                self.breaker.record_success(now);
                self.placed.insert(key, ack.clone());
                Ok(ack)
            }
            Err(err) => {
                self.breaker.record_failure(now);
                Err(err)
            }
        }
    }

    pub fn modify(
        &mut self,
        req: ModifyOrderRequest,
        now: DateTime<Utc>,
    ) -> Result<OrderAck, GatewayError> {
        if !self.session_valid {
            return Err(GatewayError::SessionInvalid);
        }
        if !self.breaker.allow_request(now) {
            return Err(GatewayError::CircuitOpen);
        }
        if !self.limiter.try_acquire_order(now) {
            return Err(GatewayError::RateLimited { endpoint: "modify".to_string() });
        }

        match self.adapter.modify(req) {
            Ok(ack) => {
                self.breaker.record_success(now);
                Ok(ack)
            }
            Err(err) => {
                self.breaker.record_failure(now);
                Err(err)
            }
        }
    }

    pub fn cancel(
        &mut self,
        broker_order_id: &str,
        now: DateTime<Utc>,
    ) -> Result<OrderAck, GatewayError> {
        if !self.breaker.allow_request(now) {
            return Err(GatewayError::CircuitOpen);
        }
        if !self.limiter.try_acquire_order(now) {
            return Err(GatewayError::RateLimited { endpoint: "cancel".to_string() });
        }

        match self.adapter.cancel(broker_order_id) {
            Ok(ack) => {
                self.breaker.record_success(now);
                Ok(ack)
            }
            Err(err) => {
                self.breaker.record_failure(now);
                Err(err)
            }
        }
    }

    pub fn list_orders(&self) -> Result<Vec<OrderAck>, GatewayError> {
        self.adapter.list_orders()
    }

    pub fn list_positions(&self) -> Result<Vec<BrokerPosition>, GatewayError> {
        self.adapter.list_positions()
    }

    pub fn list_holdings(&self) -> Result<Vec<BrokerHolding>, GatewayError> {
        self.adapter.list_holdings()
    }

    pub fn get_funds(&self) -> Result<Funds, GatewayError> {
        self.adapter.get_funds()
    }

    pub fn get_margin(
        &mut self,
        basket: &[MarginBasketLeg],
        now: DateTime<Utc>,
    ) -> Result<MarginBasketResult, GatewayError> {
        if !self.breaker.allow_request(now) {
            return Err(GatewayError::CircuitOpen);
        }
        if !self.limiter.try_acquire_margin_calc(now) {
            return Err(GatewayError::RateLimited { endpoint: "get_margin".to_string() });
        }

        match self.adapter.get_margin(basket) {
            Ok(result) => {
                self.breaker.record_success(now);
                Ok(result)
            }
            Err(err) => {
                self.breaker.record_failure(now);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit_breaker::CircuitBreaker;
    use chrono::{Duration, TimeZone};
    use sodme_schemas::{OrderStatus, OrderType, Side};

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[derive(Default)]
    struct AlwaysOkBroker {
        calls: u32,
    }

    impl BrokerAdapter for AlwaysOkBroker {
        fn place(&mut self, req: PlaceOrderRequest) -> Result<OrderAck, GatewayError> {
            self.calls += 1;
            Ok(OrderAck {
                broker_order_id: format!("b-{}", req.idempotency_key),
                client_order_id: req.idempotency_key,
                instrument_token: req.instrument_token,
                side: req.side,
                quantity_lots: req.quantity_lots,
                status: OrderStatus::Open,
            })
        }
        fn modify(&mut self, req: ModifyOrderRequest) -> Result<OrderAck, GatewayError> {
            Ok(OrderAck {
                broker_order_id: req.broker_order_id.clone(),
                client_order_id: req.broker_order_id,
                instrument_token: 0,
                side: Side::Buy,
                quantity_lots: req.quantity_lots.unwrap_or(0),
                status: OrderStatus::Open,
            })
        }
        fn cancel(&mut self, broker_order_id: &str) -> Result<OrderAck, GatewayError> {
            Ok(OrderAck {
                broker_order_id: broker_order_id.to_string(),
                client_order_id: broker_order_id.to_string(),
                instrument_token: 0,
                side: Side::Buy,
                quantity_lots: 0,
                status: OrderStatus::Cancelled,
            })
        }
        fn list_orders(&self) -> Result<Vec<OrderAck>, GatewayError> {
            Ok(vec![])
        }
        fn list_positions(&self) -> Result<Vec<BrokerPosition>, GatewayError> {
            Ok(vec![])
        }
        fn list_holdings(&self) -> Result<Vec<BrokerHolding>, GatewayError> {
            Ok(vec![])
        }
        fn get_funds(&self) -> Result<Funds, GatewayError> {
            Ok(Funds {
                available_margin: sodme_schemas::Paise::ZERO,
                used_margin: sodme_schemas::Paise::ZERO,
            })
        }
        fn get_margin(&self, _basket: &[MarginBasketLeg]) -> Result<MarginBasketResult, GatewayError> {
            Ok(MarginBasketResult {
                span_margin: sodme_schemas::Paise::ZERO,
                exposure_margin: sodme_schemas::Paise::ZERO,
                total_margin: sodme_schemas::Paise::ZERO,
            })
        }
    }

    fn make_req(key: &str) -> PlaceOrderRequest {
        PlaceOrderRequest {
            idempotency_key: key.to_string(),
            instrument_token: 1,
            side: Side::Buy,
            order_type: OrderType::Market,
            quantity_lots: 1,
            price: None,
            trigger_price: None,
        }
    }

    fn gateway() -> BrokerGateway<AlwaysOkBroker> {
        BrokerGateway::new(
            AlwaysOkBroker::default(),
            RateLimiter::default_limits(t(0)),
            CircuitBreaker::new(3, Duration::seconds(30), Duration::seconds(60)),
        )
    }

    #[test]
    fn duplicate_idempotency_key_places_exactly_one_broker_order() {
        let mut gw = gateway();
        gw.place(make_req("k1"), t(0)).unwrap();
        gw.place(make_req("k1"), t(1)).unwrap();
        assert_eq!(gw.adapter.calls, 1);
    }

    #[test]
    fn invalid_session_rejects_new_orders() {
        let mut gw = gateway();
        gw.invalidate_session();
        let err = gw.place(make_req("k1"), t(0)).unwrap_err();
        assert_eq!(err, GatewayError::SessionInvalid);
    }

    #[test]
    fn rate_limit_blocks_the_eleventh_order_in_the_same_second() {
        let mut gw = gateway();
        for i in 0..10 {
            gw.place(make_req(&format!("k{i}")), t(0)).unwrap();
        }
        let err = gw.place(make_req("k-extra"), t(0)).unwrap_err();
        assert_eq!(err, GatewayError::RateLimited { endpoint: "place".to_string() });
    }

    #[test]
    fn open_circuit_refuses_without_calling_the_adapter() {
        let mut gw = gateway();
        gw.breaker.record_failure(t(0));
        gw.breaker.record_failure(t(1));
        gw.breaker.record_failure(t(2));
        let err = gw.place(make_req("k1"), t(3)).unwrap_err();
        assert_eq!(err, GatewayError::CircuitOpen);
        assert_eq!(gw.adapter.calls, 0);
    }
}
