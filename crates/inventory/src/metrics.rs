//! Reorder metrics engine.
//!
//! Pure, deterministic arithmetic over a single validated [`Product`]. The
//! rounding steps are part of the contract: average daily sales is rounded to
//! two decimals, and safety stock and lead-time demand always round *up*.

use serde::{Deserialize, Serialize};

use reorder_core::ValueObject;

use crate::product::Product;
use crate::rounding::round2;
use crate::safety_factor::{DEFAULT_SERVICE_LEVEL, safety_factor};

/// The reorder recommendation for one product.
///
/// Recomputed on demand; never stored by the engine.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub average_daily_sales: f64,
    /// Lead-time demand plus adjusted safety stock (the reorder point).
    pub forecasted_demand: f64,
    /// Units to order now; `0` means no reorder is needed.
    pub reorder_quantity: f64,
    pub post_reorder_inventory: f64,
    pub adjusted_safety_stock: f64,
}

impl ValueObject for CalculationResult {}

impl CalculationResult {
    pub fn stock_status(&self) -> StockStatus {
        if self.reorder_quantity > 0.0 {
            StockStatus::ReorderNeeded
        } else {
            StockStatus::Healthy
        }
    }

    /// Stock on hand before the recommended order.
    pub fn current_stock(&self) -> f64 {
        self.post_reorder_inventory - self.reorder_quantity
    }
}

/// Whether a product currently needs a reorder.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    ReorderNeeded,
    Healthy,
}

impl StockStatus {
    pub fn headline(&self) -> &'static str {
        match self {
            StockStatus::ReorderNeeded => "Reorder Needed",
            StockStatus::Healthy => "Stock Level OK",
        }
    }
}

/// Every intermediate value of one computation, for display and debugging.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsBreakdown {
    pub safety_factor: f64,
    pub calculated_safety_stock: f64,
    pub lead_time_demand: f64,
    pub result: CalculationResult,
}

/// Compute the reorder recommendation for `product`.
///
/// The product must already satisfy [`Product::validate`]; behavior on invalid
/// input (e.g. `total_days == 0`) is not defined.
pub fn compute_metrics(product: &Product) -> CalculationResult {
    compute_breakdown(product).result
}

/// Same as [`compute_metrics`], keeping the intermediate values.
pub fn compute_breakdown(product: &Product) -> MetricsBreakdown {
    let average_daily_sales = round2(product.total_sales / product.total_days);

    let safety_factor = safety_factor(DEFAULT_SERVICE_LEVEL);
    let calculated_safety_stock =
        (safety_factor * average_daily_sales * product.lead_time.sqrt()).ceil();
    let adjusted_safety_stock = product.safety_stock.max(calculated_safety_stock);

    let lead_time_demand = (average_daily_sales * product.lead_time).ceil();
    let forecasted_demand = lead_time_demand + adjusted_safety_stock;

    let reorder_quantity = (forecasted_demand - product.current_stock).max(0.0);
    let post_reorder_inventory = product.current_stock + reorder_quantity;

    tracing::debug!(
        sku = %product.sku,
        average_daily_sales,
        calculated_safety_stock,
        adjusted_safety_stock,
        lead_time_demand,
        forecasted_demand,
        reorder_quantity,
        "computed reorder metrics"
    );

    MetricsBreakdown {
        safety_factor,
        calculated_safety_stock,
        lead_time_demand,
        result: CalculationResult {
            average_daily_sales,
            forecasted_demand,
            reorder_quantity,
            post_reorder_inventory,
            adjusted_safety_stock,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scenario_a() -> Product {
        Product::new("Sample T-Shirt", "TS-001", "Apparel")
            .with_stock(100.0, 50.0)
            .with_sales(500.0, 30.0)
            .with_lead_time(7.0)
    }

    #[test]
    fn scenario_a_recommends_reorder() {
        let breakdown = compute_breakdown(&scenario_a());

        assert_eq!(breakdown.safety_factor, 1.645);
        assert_eq!(breakdown.calculated_safety_stock, 73.0);
        assert_eq!(breakdown.lead_time_demand, 117.0);

        let r = breakdown.result;
        assert_eq!(r.average_daily_sales, 16.67);
        assert_eq!(r.adjusted_safety_stock, 73.0);
        assert_eq!(r.forecasted_demand, 190.0);
        assert_eq!(r.reorder_quantity, 90.0);
        assert_eq!(r.post_reorder_inventory, 190.0);
        assert_eq!(r.stock_status(), StockStatus::ReorderNeeded);
        assert_eq!(r.current_stock(), 100.0);
    }

    #[test]
    fn scenario_b_zero_lead_time_collapses_to_safety_stock() {
        let breakdown = compute_breakdown(&scenario_a().with_lead_time(0.0));

        assert_eq!(breakdown.calculated_safety_stock, 0.0);
        assert_eq!(breakdown.lead_time_demand, 0.0);

        let r = breakdown.result;
        assert_eq!(r.adjusted_safety_stock, 50.0);
        assert_eq!(r.forecasted_demand, 50.0);
        assert_eq!(r.reorder_quantity, 0.0);
        assert_eq!(r.post_reorder_inventory, 100.0);
        assert_eq!(r.stock_status(), StockStatus::Healthy);
    }

    #[test]
    fn scenario_c_stock_equal_to_forecast_needs_no_reorder() {
        let product = scenario_a().with_stock(190.0, 50.0);
        let r = compute_metrics(&product);

        assert_eq!(r.forecasted_demand, 190.0);
        assert_eq!(r.reorder_quantity, 0.0);
        assert_eq!(r.post_reorder_inventory, 190.0);
    }

    #[test]
    fn declared_safety_stock_wins_when_higher() {
        let r = compute_metrics(&scenario_a().with_stock(100.0, 500.0));
        assert_eq!(r.adjusted_safety_stock, 500.0);
        assert_eq!(r.forecasted_demand, 617.0);
        assert_eq!(r.reorder_quantity, 517.0);
    }

    #[test]
    fn ceilings_round_up_any_fraction() {
        // 10 / 10 = 1.00 per day, lead time 1.01 → demand 1.01 → 2.
        let product = Product::new("Bolt", "B-1", "Hardware")
            .with_sales(10.0, 10.0)
            .with_lead_time(1.01);
        let breakdown = compute_breakdown(&product);
        assert_eq!(breakdown.lead_time_demand, 2.0);
    }

    #[test]
    fn average_daily_sales_rounds_to_cents() {
        let product = Product::new("Cap", "C-1", "Apparel")
            .with_sales(100.0, 3.0)
            .with_lead_time(0.0);
        assert_eq!(compute_metrics(&product).average_daily_sales, 33.33);

        let product = product.with_sales(2.0, 3.0);
        assert_eq!(compute_metrics(&product).average_daily_sales, 0.67);
    }

    #[test]
    fn average_daily_sales_rounds_the_stored_quotient() {
        // 29 / 40 is stored just under 0.725, so the average is 0.72 and
        // every downstream ceiling is taken from 0.72.
        let product = Product::new("Hinge", "H-29", "Hardware")
            .with_stock(0.0, 0.0)
            .with_sales(29.0, 40.0)
            .with_lead_time(100.0);
        let breakdown = compute_breakdown(&product);

        assert_eq!(breakdown.result.average_daily_sales, 0.72);
        assert_eq!(breakdown.lead_time_demand, 72.0);
        assert_eq!(breakdown.calculated_safety_stock, 12.0);
        assert_eq!(breakdown.result.forecasted_demand, 84.0);
        assert_eq!(breakdown.result.reorder_quantity, 84.0);
    }

    #[test]
    fn no_sales_means_no_reorder_beyond_declared_buffer() {
        let product = Product::new("Mug", "M-1", "Kitchen")
            .with_stock(0.0, 5.0)
            .with_sales(0.0, 30.0)
            .with_lead_time(14.0);
        let r = compute_metrics(&product);
        assert_eq!(r.average_daily_sales, 0.0);
        assert_eq!(r.forecasted_demand, 5.0);
        assert_eq!(r.reorder_quantity, 5.0);
    }

    #[test]
    fn result_serializes_with_snake_case_fields() {
        let json = serde_json::to_value(compute_metrics(&scenario_a())).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "average_daily_sales": 16.67,
                "forecasted_demand": 190.0,
                "reorder_quantity": 90.0,
                "post_reorder_inventory": 190.0,
                "adjusted_safety_stock": 73.0,
            })
        );
        assert_eq!(
            serde_json::to_value(StockStatus::ReorderNeeded).unwrap(),
            serde_json::json!("reorder_needed")
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 1000,
            ..ProptestConfig::default()
        })]

        /// Property: the engine is pure (identical input, bit-identical output).
        #[test]
        fn compute_is_deterministic(
            stock in 0.0f64..10_000.0,
            sales in 0.0f64..100_000.0,
            days in 1.0f64..365.0,
            lead in 0.0f64..90.0,
            safety in 0.0f64..1_000.0,
        ) {
            let product = scenario_a()
                .with_stock(stock, safety)
                .with_sales(sales, days)
                .with_lead_time(lead);

            let first = compute_metrics(&product);
            let second = compute_metrics(&product);
            prop_assert_eq!(first.average_daily_sales.to_bits(), second.average_daily_sales.to_bits());
            prop_assert_eq!(first.forecasted_demand.to_bits(), second.forecasted_demand.to_bits());
            prop_assert_eq!(first.reorder_quantity.to_bits(), second.reorder_quantity.to_bits());
            prop_assert_eq!(first, second);
        }

        /// Property: recommendations are non-negative and top stock up to the forecast.
        #[test]
        fn reorder_is_never_negative(
            stock in 0.0f64..10_000.0,
            sales in 0.0f64..100_000.0,
            days in 1.0f64..365.0,
            lead in 0.0f64..90.0,
            safety in 0.0f64..1_000.0,
        ) {
            let product = scenario_a()
                .with_stock(stock, safety)
                .with_sales(sales, days)
                .with_lead_time(lead);
            let r = compute_metrics(&product);

            prop_assert!(r.reorder_quantity >= 0.0);
            prop_assert!(r.adjusted_safety_stock >= safety);
            prop_assert!(r.post_reorder_inventory >= stock);
            prop_assert_eq!(r.post_reorder_inventory, stock + r.reorder_quantity);
        }
    }
}
