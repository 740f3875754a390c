//! Finance engine — break-even analysis and summary metrics.
//!
//! All monetary arithmetic uses `rust_decimal::Decimal`. The undefined
//! break-even case (price ≤ variable cost) is a first-class outcome, not an
//! error: the guarded division is short-circuited before it can happen.

pub mod breakeven;
pub mod metrics;

pub use breakeven::{BreakEvenAnalysis, BreakEvenInputs, BreakEvenOutcome, ChartSeries};
pub use metrics::SummaryMetrics;
