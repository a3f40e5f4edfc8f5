//! sodme-margin
//!
//! Dynamic margin computation: the per-instrument SPAN/exposure/premium
//! formula chain, the four bounded multiplier tables (VIX, expiry,
//! price-move, regulatory), and the broker/internal dual-path reconciliation
//! invariant (broker numbers are truth; internal recomputes cannot undercut
//! them without a demonstrated factor drop).

pub mod calculator;
pub mod dual_path;
pub mod engine;
pub mod error;
pub mod factors;
pub mod types;

pub use calculator::{calculate_batch, calculate_for_order};
pub use dual_path::DualPathTracker;
pub use engine::{MarginEngine, StrategyMarginInputs};
pub use error::MarginError;
pub use types::{InstrumentMarginBreakdown, InstrumentMarginInput, MarginFactorContext, NseMarginCache};
