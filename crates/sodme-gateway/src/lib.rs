//! sodme-gateway
//!
//! The single choke-point for every broker operation: place/modify/cancel/
//! list_orders/list_positions/list_holdings/get_funds/get_margin, gated by
//! session validity, a per-endpoint-class token bucket rate limiter and a
//! circuit breaker. `BrokerAdapter` is the narrow trait a concrete broker
//! (paper or live) implements; `sodme-broker-paper` is the deterministic
//! reference adapter used in tests and the CLI's paper-trading path.

pub mod adapter;
pub mod circuit_breaker;
pub mod error;
pub mod gateway;
pub mod rate_limit;
pub mod types;

pub use adapter::BrokerAdapter;
pub use circuit_breaker::{CircuitBreaker, CircuitPhase};
pub use error::GatewayError;
pub use gateway::BrokerGateway;
pub use rate_limit::{RateLimiter, DEFAULT_MARGIN_CALC_PER_SEC, DEFAULT_ORDERS_PER_SEC};
pub use types::{
    BrokerHolding, BrokerPosition, Funds, MarginBasketLeg, MarginBasketResult, ModifyOrderRequest,
    OrderAck, PlaceOrderRequest,
};
