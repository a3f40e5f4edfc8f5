//! Shared runtime state for sodme-daemon.
//!
//! Handlers receive `State<Arc<AppState>>` from Axum. Every engine crate is
//! wrapped in a `std::sync::Mutex` — each call into an engine is a short,
//! synchronous critical section, never held across an `.await`.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use sodme_alerts::{AlertBus, InMemoryAlertStore};
use sodme_broker_paper::PaperBroker;
use sodme_gateway::{
    BrokerGateway, CircuitBreaker, Funds, GatewayError, MarginBasketLeg, MarginBasketResult,
    RateLimiter,
};
use sodme_housekeeping::{HousekeepingEngine, OrderCanceller};
use sodme_margin::MarginEngine;
use sodme_marketdata::NseMarginFileCache;
use sodme_risk::{RiskEngine, StrategyFlattener};
use sodme_schemas::Paise;
use sodme_strategy::InMemoryStrategyStore;

/// Static build metadata included in health responses.
#[derive(Clone, Debug)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

/// Cloneable (Arc) handle shared across all Axum handlers.
pub struct AppState {
    pub build: BuildInfo,
    pub db: PgPool,
    pub alerts: AlertBus<InMemoryAlertStore>,
    pub strategies: Mutex<InMemoryStrategyStore>,
    pub margin: Mutex<MarginEngine<NseMarginFileCache>>,
    pub housekeeping: Mutex<HousekeepingEngine>,
    pub risk: Mutex<RiskEngine>,
    pub gateway: Mutex<BrokerGateway<PaperBroker>>,
}

impl AppState {
    pub fn new(db: PgPool) -> Self {
        let now = Utc::now();
        let gateway = BrokerGateway::new(
            PaperBroker::new(Funds { available_margin: Paise::from_rupees(10_000_000), used_margin: Paise::ZERO }),
            RateLimiter::new(8.0, 2.0, now),
            CircuitBreaker::new(5, chrono::Duration::seconds(30), chrono::Duration::seconds(60)),
        );

        Self {
            build: BuildInfo { service: "sodme-daemon", version: env!("CARGO_PKG_VERSION") },
            db,
            alerts: AlertBus::new(InMemoryAlertStore::new()),
            strategies: Mutex::new(InMemoryStrategyStore::default()),
            margin: Mutex::new(MarginEngine::new(NseMarginFileCache::new())),
            housekeeping: Mutex::new(HousekeepingEngine::new()),
            risk: Mutex::new(RiskEngine::new()),
            gateway: Mutex::new(gateway),
        }
    }

    pub fn lock_strategies(&self) -> MutexGuard<'_, InMemoryStrategyStore> {
        self.strategies.lock().expect("strategies lock poisoned")
    }

    pub fn lock_margin(&self) -> MutexGuard<'_, MarginEngine<NseMarginFileCache>> {
        self.margin.lock().expect("margin lock poisoned")
    }

    pub fn lock_housekeeping(&self) -> MutexGuard<'_, HousekeepingEngine> {
        self.housekeeping.lock().expect("housekeeping lock poisoned")
    }

    pub fn lock_risk(&self) -> MutexGuard<'_, RiskEngine> {
        self.risk.lock().expect("risk lock poisoned")
    }

    pub fn lock_gateway(&self) -> MutexGuard<'_, BrokerGateway<PaperBroker>> {
        self.gateway.lock().expect("gateway lock poisoned")
    }
}

/// Cancels a housekeeping-flagged order through the broker gateway.
/// `sodme-broker-paper`'s `OrderAck` has no strategy/order-id field of its
/// own, so this adapter uses the domain order id directly as the broker
/// order id — matching the paper broker's own convention of keying orders
/// by idempotency key (see `sodme-broker-paper::PaperBroker::place`).
pub struct GatewayCanceller<'a> {
    pub gateway: &'a mut BrokerGateway<PaperBroker>,
    pub now: DateTime<Utc>,
}

impl OrderCanceller for GatewayCanceller<'_> {
    fn cancel(&mut self, order_id: Uuid) -> Result<(), String> {
        self.gateway.cancel(&order_id.to_string(), self.now).map(|_| ()).map_err(|e| e.to_string())
    }
}

/// Flattens a strategy by cancelling every order still open at the broker.
/// The paper gateway does not carry strategy ownership on its `OrderAck`,
/// so this conservatively cancels every open order system-wide rather than
/// scoping to one strategy — acceptable for the in-memory paper broker
/// this daemon ships with, not for a production multi-strategy deployment.
pub struct GatewayFlattener<'a> {
    pub gateway: &'a mut BrokerGateway<PaperBroker>,
    pub now: DateTime<Utc>,
}

impl StrategyFlattener for GatewayFlattener<'_> {
    fn flatten(&mut self, _strategy_id: Uuid) -> Result<(), String> {
        let orders = self.gateway.list_orders().map_err(|e| e.to_string())?;
        for order in orders {
            if order.status == sodme_schemas::OrderStatus::Open
                || order.status == sodme_schemas::OrderStatus::PartiallyFilled
            {
                self.gateway.cancel(&order.broker_order_id, self.now).map_err(|e| e.to_string())?;
            }
        }
        Ok(())
    }
}

pub fn paper_margin_quote(
    gateway: &mut BrokerGateway<PaperBroker>,
    basket: &[MarginBasketLeg],
    now: DateTime<Utc>,
) -> Result<MarginBasketResult, GatewayError> {
    gateway.get_margin(basket, now)
}

/// Background sweep: drains strategies the margin engine marked dirty and
/// logs them for now (a full deployment would trigger `refresh_strategy`
/// per id). Spawned once at startup, mirrors the reference daemon's
/// heartbeat task shape.
pub fn spawn_dirty_strategy_log(state: std::sync::Arc<AppState>, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let dirty = state.lock_margin().take_dirty();
            if !dirty.is_empty() {
                tracing::info!(count = dirty.len(), "strategies marked dirty by a factor change");
            }
        }
    });
}
