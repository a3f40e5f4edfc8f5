use sodme_schemas::order::{Order, OrphanReason, Side};
use sodme_schemas::position::{Direction, Position};

fn covering_direction(order_side: Side) -> Direction {
    // A stop/target order closes a position by trading the opposite side:
    // a long position is covered by a SELL stop; a short position by a BUY.
    match order_side {
        Side::Sell => Direction::Long,
        Side::Buy => Direction::Short,
    }
}

/// Classify an active stop/target order against the strategy's current
/// positions. Returns `None` when the order is fully covered. Non-stop
/// orders are never orphans by definition.
pub fn classify_orphan(order: &Order, positions: &[Position]) -> Option<OrphanReason> {
    if !order.is_stop_or_target() {
        return None;
    }

    let expected_direction = covering_direction(order.side);
    let covering = positions.iter().find(|p| {
        p.strategy_id == order.strategy_id
            && p.instrument_token == order.instrument_token
            && p.direction == expected_direction
    });

    match covering {
        None => {
            let any_position_ever = positions
                .iter()
                .any(|p| p.strategy_id == order.strategy_id && p.instrument_token == order.instrument_token);
            if any_position_ever {
                Some(OrphanReason::PositionClosed)
            } else {
                Some(OrphanReason::NoCoveringPosition)
            }
        }
        Some(p) if p.is_flat() => Some(OrphanReason::PositionClosed),
        Some(p) if p.quantity_lots < order.quantity_lots => Some(OrphanReason::PositionReduced),
        Some(_) => None,
    }
}
