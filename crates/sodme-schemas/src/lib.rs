//! sodme-schemas
//!
//! Shared domain types and DTOs for the Smart Order & Dynamic Margin Engine:
//! instruments, strategies/settings, positions, orders, depth snapshots,
//! execution analysis, cost breakdowns, margin snapshots, alerts and
//! cleanup records. No IO, no business logic — just the data model spec.md
//! §3 defines, owned here so every crate shares one definition.

pub mod alert;
pub mod cleanup;
pub mod depth;
pub mod events;
pub mod execution;
pub mod instrument;
pub mod margin;
pub mod money;
pub mod order;
pub mod position;
pub mod strategy;

pub use alert::{Alert, AlertPayload, AlertResponse, AlertResponseAction};
pub use cleanup::{CleanupAction, CleanupKey, CleanupLog, CleanupReason};
pub use depth::{DepthLevel, DepthSnapshot};
pub use events::EventEnvelope;
pub use execution::{
    CostBreakdown, ExecutionAnalysis, LiquidityTier, RecommendedAction, RecommendedType,
    SpreadTier, INSUFFICIENT_LIQUIDITY_IMPACT_BPS,
};
pub use instrument::{Instrument, OptionType, Segment};
pub use margin::{AppliedFactor, FactorKind, MarginChangeEvent, MarginSnapshot, MarginSource, Severity, SettlementRecord};
pub use money::Paise;
pub use order::{Order, OrderStatus, OrderType, OrphanReason, Side};
pub use position::{Direction, Position};
pub use strategy::{Strategy, StrategySettings, StrategyStatus};
