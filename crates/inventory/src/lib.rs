//! Inventory reorder domain.
//!
//! This crate contains the reorder arithmetic and the in-memory catalog,
//! implemented purely as deterministic domain logic (no IO, no storage).

pub mod catalog;
pub mod metrics;
pub mod product;
pub mod rounding;
pub mod safety_factor;
pub mod seasonality;

pub use catalog::Catalog;
pub use metrics::{CalculationResult, MetricsBreakdown, StockStatus, compute_breakdown, compute_metrics};
pub use product::{MonthlySales, Product};
pub use rounding::{round_to, round2};
pub use safety_factor::{DEFAULT_SAFETY_FACTOR, DEFAULT_SERVICE_LEVEL, safety_factor};
pub use seasonality::{
    SeasonalityPattern, current_factor, dispersion_factor, month_label, monthly_seasonality,
    next_month_forecast,
};
