use chrono::Utc;
use sodme_housekeeping::{HousekeepingEngine, OrderCanceller};
use sodme_schemas::cleanup::CleanupAction;
use sodme_schemas::money::Paise;
use sodme_schemas::order::{Order, OrderStatus, OrderType, Side};
use sodme_schemas::position::{Direction, Position};
use sodme_schemas::strategy::StrategySettings;
use uuid::Uuid;

struct AlwaysOkCanceller {
    cancelled: Vec<Uuid>,
}

impl OrderCanceller for AlwaysOkCanceller {
    fn cancel(&mut self, order_id: Uuid) -> Result<(), String> {
        self.cancelled.push(order_id);
        Ok(())
    }
}

#[test]
fn scenario_e_orphan_on_position_exit_cancels_and_logs_info() {
    let strategy_id = Uuid::new_v4();
    let order = Order {
        id: Uuid::new_v4(),
        strategy_id,
        instrument_token: 10,
        side: Side::Sell,
        order_type: OrderType::Stop,
        quantity_lots: 10,
        price: None,
        trigger_price: Some(Paise::from_rupees(95)),
        status: OrderStatus::Open,
        parent_position: None,
        is_orphan: false,
        orphan_reason: None,
        placed_at: Utc::now(),
        updated_at: Utc::now(),
        idempotency_key: "k".to_string(),
    };
    let position = Position {
        strategy_id,
        instrument_token: 10,
        direction: Direction::Long,
        quantity_lots: 0,
        average_price: Paise::from_rupees(100),
        current_price: Paise::from_rupees(100),
        previous_settlement_price: Paise::from_rupees(100),
        lot_size: 50,
    };

    let settings = StrategySettings::sane_defaults();
    let mut engine = HousekeepingEngine::new();
    let mut canceller = AlwaysOkCanceller { cancelled: vec![] };
    let today = Utc::now().date_naive();

    let outcome = engine
        .process_order(&order, &[position.clone()], &settings, &mut canceller, today, Utc::now())
        .expect("stop order with closed position must be flagged orphan");

    assert_eq!(outcome.log.action, CleanupAction::Cancelled);
    assert!(outcome.log.was_auto);
    assert_eq!(canceller.cancelled, vec![order.id]);

    // Invariant #4: the same {order_id, reason, day} key issues at most one
    // CANCEL even if the sweep runs again on the same day.
    let second = engine.process_order(&order, &[position], &settings, &mut canceller, today, Utc::now());
    assert!(second.is_none());
    assert_eq!(canceller.cancelled.len(), 1);
}
