//! sodme-depth
//!
//! Pre-trade execution analysis from live market depth: spread
//! categorization, a liquidity-consuming impact walk, a liquidity score, and
//! a precedence-table decision rule combining all three into one
//! recommended action. Never fabricates a decision when depth is missing.

pub mod analyzer;
pub mod costs;
pub mod decision;
pub mod error;
pub mod impact;
pub mod liquidity;
pub mod thresholds;

pub use analyzer::{analyze, AnalyzeRequest};
pub use costs::{calculate_costs, CostRateTable};
pub use error::DepthError;
