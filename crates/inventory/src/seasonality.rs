//! Seasonality analytics.
//!
//! Two unrelated heuristics live here:
//! - [`dispersion_factor`]: `1 + coefficient of variation` over a flat series.
//! - [`monthly_seasonality`]: per-month demand relative to the average month.
//!
//! Neither feeds the reorder calculation; they back charts and forecasts only.

use serde::{Deserialize, Serialize};

use reorder_core::ValueObject;

use crate::product::MonthlySales;
use crate::rounding::round_to;

/// Days in the flat month used by [`next_month_forecast`].
pub const DAYS_PER_MONTH: f64 = 30.0;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Relative demand of one calendar month (1.0 = an average month).
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalityPattern {
    pub month: u32,
    pub factor: f64,
}

impl ValueObject for SeasonalityPattern {}

impl SeasonalityPattern {
    /// Factor as a percentage rounded to one decimal (chart axis units).
    pub fn percent(&self) -> f64 {
        round_to(self.factor * 100.0, 1)
    }

    pub fn label(&self) -> Option<&'static str> {
        month_label(self.month)
    }
}

/// Short English name for a 1-based month.
pub fn month_label(month: u32) -> Option<&'static str> {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_LABELS.get(i as usize))
        .copied()
}

/// `1 + stddev / mean` over `series` (population variance).
///
/// Series shorter than two points carry no signal and yield `1.0`.
/// The caller must ensure the mean is non-zero.
pub fn dispersion_factor(series: &[f64]) -> f64 {
    if series.len() < 2 {
        return 1.0;
    }

    let n = series.len() as f64;
    let mean = series.iter().sum::<f64>() / n;
    let variance = series
        .iter()
        .map(|x| {
            let d = x - mean;
            d * d
        })
        .sum::<f64>()
        / n;

    1.0 + variance.sqrt() / mean
}

/// Per-month seasonality factors, always 12 entries ordered January..December.
///
/// Months without data (or with zero average sales) get a neutral factor of 1.
/// The overall average only counts months with a non-zero average.
pub fn monthly_seasonality(monthly_data: &[MonthlySales]) -> Vec<SeasonalityPattern> {
    let mut sums = [0.0f64; 12];
    let mut counts = [0u32; 12];

    for entry in monthly_data {
        // Out-of-range months are rejected by `Product::validate`; skip them here.
        let Some(idx) = entry.month.checked_sub(1).map(|m| m as usize) else {
            continue;
        };
        if idx >= 12 {
            continue;
        }
        sums[idx] += entry.sales;
        counts[idx] += 1;
    }

    let averages: Vec<f64> = sums
        .iter()
        .zip(counts.iter())
        .map(|(sum, count)| if *count > 0 { sum / f64::from(*count) } else { 0.0 })
        .collect();

    let active: Vec<f64> = averages.iter().copied().filter(|avg| *avg > 0.0).collect();
    let overall = active.iter().sum::<f64>() / active.len() as f64;

    averages
        .iter()
        .enumerate()
        .map(|(i, avg)| SeasonalityPattern {
            month: i as u32 + 1,
            factor: if *avg > 0.0 { avg / overall } else { 1.0 },
        })
        .collect()
}

/// Factor for `month`, or `1.0` when no pattern covers it.
pub fn current_factor(patterns: &[SeasonalityPattern], month: u32) -> f64 {
    patterns
        .iter()
        .find(|p| p.month == month)
        .map(|p| p.factor)
        .unwrap_or(1.0)
}

/// Units expected next month: `avg_daily_sales * factor(next month) * 30`.
///
/// December wraps to January.
pub fn next_month_forecast(
    avg_daily_sales: f64,
    patterns: &[SeasonalityPattern],
    current_month: u32,
) -> f64 {
    let next_month = if current_month == 12 { 1 } else { current_month + 1 };
    avg_daily_sales * current_factor(patterns, next_month) * DAYS_PER_MONTH
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn dispersion_of_short_series_is_neutral() {
        assert_eq!(dispersion_factor(&[]), 1.0);
        assert_eq!(dispersion_factor(&[42.0]), 1.0);
    }

    #[test]
    fn dispersion_uses_population_variance() {
        // mean 5, population variance 4, stddev 2.
        let series = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!(approx(dispersion_factor(&series), 1.4));
    }

    #[test]
    fn flat_series_has_no_dispersion() {
        assert_eq!(dispersion_factor(&[3.0, 3.0, 3.0]), 1.0);
    }

    #[test]
    fn months_without_data_are_neutral() {
        let patterns = monthly_seasonality(&[
            MonthlySales::new(1, 100.0),
            MonthlySales::new(1, 300.0),
            MonthlySales::new(7, 100.0),
        ]);

        // January average 200, July 100, overall (200 + 100) / 2 = 150.
        assert_eq!(patterns.len(), 12);
        assert!(approx(patterns[0].factor, 200.0 / 150.0));
        assert!(approx(patterns[6].factor, 100.0 / 150.0));
        assert_eq!(patterns[3].factor, 1.0);
    }

    #[test]
    fn zero_sales_months_do_not_drag_the_average() {
        let patterns = monthly_seasonality(&[
            MonthlySales::new(2, 0.0),
            MonthlySales::new(3, 50.0),
            MonthlySales::new(4, 150.0),
        ]);

        assert_eq!(patterns[1].factor, 1.0);
        assert!(approx(patterns[2].factor, 0.5));
        assert!(approx(patterns[3].factor, 1.5));
    }

    #[test]
    fn empty_history_is_all_neutral() {
        let patterns = monthly_seasonality(&[]);
        assert_eq!(patterns.len(), 12);
        assert!(patterns.iter().all(|p| p.factor == 1.0));
    }

    #[test]
    fn current_factor_defaults_to_one() {
        let patterns = [SeasonalityPattern { month: 3, factor: 1.2 }];
        assert_eq!(current_factor(&patterns, 3), 1.2);
        assert_eq!(current_factor(&patterns, 4), 1.0);
    }

    #[test]
    fn next_month_forecast_wraps_december() {
        let patterns = [
            SeasonalityPattern { month: 1, factor: 2.0 },
            SeasonalityPattern { month: 6, factor: 0.5 },
        ];
        assert!(approx(next_month_forecast(10.0, &patterns, 12), 600.0));
        assert!(approx(next_month_forecast(10.0, &patterns, 5), 150.0));
        assert!(approx(next_month_forecast(10.0, &patterns, 8), 300.0));
    }

    #[test]
    fn labels_and_percentages() {
        let p = SeasonalityPattern { month: 12, factor: 1.23456 };
        assert_eq!(p.label(), Some("Dec"));
        assert!(approx(p.percent(), 123.5));
        assert_eq!(month_label(0), None);
        assert_eq!(month_label(13), None);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 300,
            ..ProptestConfig::default()
        })]

        /// Property: always 12 ordered entries with positive factors.
        #[test]
        fn seasonality_shape(
            entries in prop::collection::vec((1u32..=12, 0.0f64..10_000.0), 0..60)
        ) {
            let data: Vec<MonthlySales> = entries
                .into_iter()
                .map(|(month, sales)| MonthlySales::new(month, sales))
                .collect();
            let patterns = monthly_seasonality(&data);

            prop_assert_eq!(patterns.len(), 12);
            for (i, p) in patterns.iter().enumerate() {
                prop_assert_eq!(p.month, i as u32 + 1);
                prop_assert!(p.factor > 0.0);
            }
        }
    }
}
