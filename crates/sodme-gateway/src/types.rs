use sodme_schemas::{OrderStatus, OrderType, Paise, Side};

/// Broker-agnostic order placement request.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceOrderRequest {
    pub idempotency_key: String,
    pub instrument_token: i64,
    pub side: Side,
    pub order_type: OrderType,
    pub quantity_lots: i64,
    pub price: Option<Paise>,
    pub trigger_price: Option<Paise>,
}

/// Broker-agnostic order modification request. Every field left `None`
/// keeps the broker's current value for that field.
#[derive(Debug, Clone, PartialEq)]
pub struct ModifyOrderRequest {
    pub broker_order_id: String,
    pub quantity_lots: Option<i64>,
    pub price: Option<Paise>,
    pub trigger_price: Option<Paise>,
}

/// A broker's view of one order, returned by `place`/`modify` acks and by
/// `list_orders`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderAck {
    pub broker_order_id: String,
    pub client_order_id: String,
    pub instrument_token: i64,
    pub side: Side,
    pub quantity_lots: i64,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrokerPosition {
    pub instrument_token: i64,
    pub quantity_lots: i64,
    pub average_price: Paise,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrokerHolding {
    pub instrument_token: i64,
    pub quantity: i64,
    pub average_price: Paise,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Funds {
    pub available_margin: Paise,
    pub used_margin: Paise,
}

/// One leg of a margin-basket preview request, as required by
/// `get_margin(order_basket)`.
#[derive(Debug, Clone, PartialEq)]
pub struct MarginBasketLeg {
    pub instrument_token: i64,
    pub side: Side,
    pub order_type: OrderType,
    pub quantity_lots: i64,
    pub price: Option<Paise>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarginBasketResult {
    pub span_margin: Paise,
    pub exposure_margin: Paise,
    pub total_margin: Paise,
}
