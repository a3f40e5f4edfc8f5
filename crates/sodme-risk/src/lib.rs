//! sodme-risk
//!
//! Per-strategy risk state machine: the level is the max of loss,
//! margin-utilization, and Greeks levels, moving monotonically worse within
//! a level until a recompute shows recovery held for a full hysteresis
//! cycle. L6 (utilization ≥100%, margin shortfall, or extreme Greeks) opens
//! a grace window; an unresolved window triggers auto square-off via the
//! `StrategyFlattener` collaborator.

pub mod engine;
pub mod error;
pub mod greeks;
pub mod loss;
pub mod state;
pub mod types;
pub mod utilization;

pub use engine::{RiskEngine, RiskEvaluation, StrategyFlattener};
pub use error::RiskError;
pub use greeks::{aggregate_greeks, classify, classify_all, hedge_recommendation, PositionGreeks};
pub use types::{GreekClass, GreekThreshold, GreekThresholds, NetGreeks, RiskAction, RiskConfig, RiskDecision, RiskLevel, RiskState};
