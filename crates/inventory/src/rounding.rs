//! Decimal rounding of binary floats.
//!
//! `round_to(x, d)` returns the double nearest to `n / 10^d`, where `n` is the
//! integer closest to the *exact* binary value of `x * 10^d`; exact ties go
//! away from zero. `(x * 10^d).round()` is not equivalent: the multiplication
//! rounds first, so `0.725` (stored as `0.72499999…`) would become `0.73`.

/// Above this magnitude a scaled value has no fractional bits left.
const EXACT_INTEGER_LIMIT: f64 = 4_503_599_627_370_496.0; // 2^52

/// Round `value` to `decimals` places, ties away from zero.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() || value == 0.0 {
        return value;
    }
    if value < 0.0 {
        return -round_to(-value, decimals);
    }

    let scale = 10f64.powi(decimals as i32);
    let estimate = (value * scale).round();
    if estimate >= EXACT_INTEGER_LIMIT {
        return value;
    }

    // Settle on `units` with `2*units - 1 <= 2*scale*value < 2*units + 1`.
    // `mul_add` evaluates the product exactly, so only the sign is rounded.
    let twice = 2.0 * scale;
    let mut units = estimate;
    while units > 0.0 && value.mul_add(twice, -(2.0 * units - 1.0)) < 0.0 {
        units -= 1.0;
    }
    while value.mul_add(twice, -(2.0 * units + 1.0)) >= 0.0 {
        units += 1.0;
    }

    units / scale
}

/// Two decimal places, as used for currency-like display values.
pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}
