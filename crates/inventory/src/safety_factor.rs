//! Service level → z-score lookup used to size safety stock.

/// Service level the metrics engine always uses.
pub const DEFAULT_SERVICE_LEVEL: f64 = 0.95;

/// z-score returned for any service level missing from [`Z_SCORES`].
pub const DEFAULT_SAFETY_FACTOR: f64 = 1.645;

/// Precomputed standard-normal z-scores for the supported service levels.
///
/// This is a coarse lookup, not an inverse CDF: keys match exactly or not at all.
pub const Z_SCORES: [(f64, f64); 4] = [(0.90, 1.28), (0.95, 1.645), (0.98, 2.054), (0.99, 2.326)];

/// Map a target service level (e.g. `0.95`) to its z-score.
///
/// Unknown levels silently fall back to [`DEFAULT_SAFETY_FACTOR`].
pub fn safety_factor(service_level: f64) -> f64 {
    Z_SCORES
        .iter()
        .find(|(level, _)| *level == service_level)
        .map(|(_, z)| *z)
        .unwrap_or(DEFAULT_SAFETY_FACTOR)
}
