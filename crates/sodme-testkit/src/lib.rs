//! Fixture builders shared across this workspace's own test suites.
//!
//! Every builder takes the handful of fields a given scenario actually
//! varies and fills the rest with values realistic enough that a test
//! reader does not have to squint at them — a short-dated ATM-ish option
//! leg, a sane five-level book, a strategy with the reference settings.
//! Nothing here talks to a network or a database; fixtures that need a
//! broker use `sodme-broker-paper` directly.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use sodme_broker_paper::PaperBroker;
use sodme_gateway::Funds;
use sodme_margin::{InstrumentMarginInput, MarginFactorContext};
use sodme_schemas::{
    DepthLevel, DepthSnapshot, Direction, Order, OrderStatus, OrderType, Paise, Position, Side,
    StrategySettings,
};

/// A two-level book centered on `mid_rupees` with `spread_rupees` between
/// best bid and best ask, `qty` lots resting at every level.
pub fn depth_snapshot(instrument_token: i64, mid_rupees: i64, spread_rupees: i64, qty: i64) -> DepthSnapshot {
    let half = spread_rupees / 2;
    let level = |price_rupees: i64| DepthLevel { price: Paise::from_rupees(price_rupees), quantity: qty };
    DepthSnapshot {
        instrument_token,
        bids: vec![level(mid_rupees - half), level(mid_rupees - half - 1)],
        asks: vec![level(mid_rupees + half), level(mid_rupees + half + 1)],
    }
}

/// An empty book — both sides have no resting levels, the
/// `DepthUnavailableError` / no-liquidity edge case.
pub fn empty_depth_snapshot(instrument_token: i64) -> DepthSnapshot {
    DepthSnapshot { instrument_token, bids: vec![], asks: vec![] }
}

/// A single net-short option leg with a given contract value and days to
/// expiry, no premium owed, and a mid-session timestamp.
pub fn instrument_margin_input(instrument_token: i64, contract_value_rupees: i64, days_to_expiry: i64) -> InstrumentMarginInput {
    InstrumentMarginInput {
        instrument_token,
        contract_value: Paise::from_rupees(contract_value_rupees),
        short_option_premium: Paise::ZERO,
        additional: Paise::ZERO,
        days_to_expiry,
        time_of_day: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
    }
}

/// A calm-market factor context: low VIX, no price move, no regulatory
/// overlay, dated today in IST terms (the caller's `effective_date`).
pub fn calm_margin_factor_context(effective_date: NaiveDate) -> MarginFactorContext {
    MarginFactorContext { vix: 12.0, price_move_pct: 0.0, regulatory_overrides: vec![], effective_date }
}

/// A stressed-market factor context: VIX spiked, a meaningful single-day
/// move already priced in.
pub fn stressed_margin_factor_context(effective_date: NaiveDate) -> MarginFactorContext {
    MarginFactorContext { vix: 32.0, price_move_pct: 3.0, regulatory_overrides: vec![], effective_date }
}

/// An open limit order with no parent position recorded yet — the caller
/// fills in `parent_position`/`status` to build an orphan scenario.
#[allow(clippy::too_many_arguments)]
pub fn sample_order(
    strategy_id: Uuid,
    instrument_token: i64,
    side: Side,
    quantity_lots: i64,
    status: OrderStatus,
    parent_position: Option<Uuid>,
    now: DateTime<Utc>,
) -> Order {
    let id = Uuid::new_v4();
    Order {
        id,
        strategy_id,
        instrument_token,
        side,
        order_type: OrderType::Limit,
        quantity_lots,
        price: Some(Paise::from_rupees(100)),
        trigger_price: None,
        status,
        parent_position,
        is_orphan: false,
        orphan_reason: None,
        placed_at: now,
        updated_at: now,
        idempotency_key: format!("testkit-{id}"),
    }
}

/// A live position with the given direction, lot count, and entry/current
/// prices, one lot of 50 shares (typical Nifty-options lot size).
pub fn sample_position(strategy_id: Uuid, instrument_token: i64, direction: Direction, quantity_lots: i64, average_price_rupees: i64, current_price_rupees: i64) -> Position {
    Position {
        strategy_id,
        instrument_token,
        direction,
        quantity_lots,
        average_price: Paise::from_rupees(average_price_rupees),
        current_price: Paise::from_rupees(current_price_rupees),
        previous_settlement_price: Paise::from_rupees(average_price_rupees),
        lot_size: 50,
    }
}

/// `StrategySettings::sane_defaults()`, re-exported so callers only need
/// one testkit import line.
pub fn sane_settings() -> StrategySettings {
    StrategySettings::sane_defaults()
}

/// A paper broker seeded with `available_margin_rupees` and no used margin
/// — the standard starting point for gateway/housekeeping scenario tests.
pub fn seeded_paper_broker(available_margin_rupees: i64) -> PaperBroker {
    PaperBroker::new(Funds {
        available_margin: Paise::from_rupees(available_margin_rupees),
        used_margin: Paise::ZERO,
    })
}
