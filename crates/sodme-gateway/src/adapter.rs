use crate::error::GatewayError;
use crate::types::{
    BrokerHolding, BrokerPosition, Funds, MarginBasketLeg, MarginBasketResult, ModifyOrderRequest,
    OrderAck, PlaceOrderRequest,
};

/// The broker-specific half of the gateway contract: place/modify/cancel/
/// list_orders/list_positions/list_holdings/get_funds/get_margin. Every
/// concrete broker (paper, live) implements this trait; nothing outside
/// `sodme-gateway` ever calls it directly — `BrokerGateway` is the only
/// path.
pub trait BrokerAdapter {
    fn place(&mut self, req: PlaceOrderRequest) -> Result<OrderAck, GatewayError>;
    fn modify(&mut self, req: ModifyOrderRequest) -> Result<OrderAck, GatewayError>;
    fn cancel(&mut self, broker_order_id: &str) -> Result<OrderAck, GatewayError>;
    fn list_orders(&self) -> Result<Vec<OrderAck>, GatewayError>;
    fn list_positions(&self) -> Result<Vec<BrokerPosition>, GatewayError>;
    fn list_holdings(&self) -> Result<Vec<BrokerHolding>, GatewayError>;
    fn get_funds(&self) -> Result<Funds, GatewayError>;
    fn get_margin(&self, basket: &[MarginBasketLeg]) -> Result<MarginBasketResult, GatewayError>;
}
