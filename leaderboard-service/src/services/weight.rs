//! Tie-break weight encoding.
//!
//! A weight is derived from the per-leaderboard operation counter by
//! placing the counter's decimal digits immediately after
//! `decimal_places` zero digits past the decimal point:
//!
//! ```text
//! compute_weight(1, 2)             -> 0.001
//! compute_weight(9, 1)             -> 0.09
//! compute_weight(1000000000001, 1) -> 0.01000000000001
//! ```
//!
//! The weight is always strictly below `10^-decimal_places`, so it can
//! never carry into a digit of the displayed score. The derivation is
//! exact decimal arithmetic over integers; the value is narrowed to an
//! `f64` exactly once, when it is handed to the store.

use std::fmt;

/// Decimal places reserved for the displayed score.
pub const DEFAULT_DECIMAL_PLACES: u32 = 2;

/// Upper bound on reserved decimal places accepted by the encoder.
pub const MAX_DECIMAL_PLACES: u32 = 10;

/// Decimal digits an f64 mantissa reliably holds. Raw-score digits plus
/// weight digits must stay inside this budget or ties reappear.
pub const F64_DECIMAL_DIGITS: u32 = 15;

/// An exact decimal fraction `unscaled / 10^scale` in the open
/// interval `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weight {
    unscaled: u64,
    scale: u32,
}

impl Weight {
    pub const ZERO: Weight = Weight {
        unscaled: 0,
        scale: 0,
    };

    pub fn is_zero(&self) -> bool {
        self.unscaled == 0
    }

    /// Total decimal digits the weight occupies past the decimal point.
    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn unscaled(&self) -> u64 {
        self.unscaled
    }

    /// Narrows to an `f64` for storage. This is the single point where
    /// the exact decimal becomes a binary double.
    pub fn value(&self) -> f64 {
        if self.unscaled == 0 {
            return 0.0;
        }
        self.unscaled as f64 / 10f64.powi(self.scale as i32)
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unscaled == 0 {
            return write!(f, "0");
        }
        write!(f, "0.{:0>width$}", self.unscaled, width = self.scale as usize)
    }
}

/// Computes the forward tie-break weight: a larger counter yields a
/// larger weight, ranking the newer submission first among equal
/// scores.
///
/// `counter_value <= 0` or `decimal_places` above
/// [`MAX_DECIMAL_PLACES`] is a defined degenerate case returning exact
/// zero, not an error.
pub fn compute_weight(counter_value: i64, decimal_places: u32) -> Weight {
    if counter_value <= 0 || decimal_places > MAX_DECIMAL_PLACES {
        return Weight::ZERO;
    }
    let unscaled = counter_value as u64;
    Weight {
        unscaled,
        scale: digit_count(unscaled) + decimal_places,
    }
}

/// Computes the decimal complement of [`compute_weight`]:
/// `10^-decimal_places - compute_weight(...)`, so a larger counter
/// yields a smaller weight. Zero whenever the forward weight is zero.
pub fn compute_reverse_weight(counter_value: i64, decimal_places: u32) -> Weight {
    let forward = compute_weight(counter_value, decimal_places);
    if forward.is_zero() {
        return Weight::ZERO;
    }
    let digits = digit_count(forward.unscaled);
    Weight {
        unscaled: 10u64.pow(digits) - forward.unscaled,
        scale: forward.scale,
    }
}

fn digit_count(value: u64) -> u32 {
    value.ilog10() + 1
}

/// Strips the digits beyond `decimal_places` from a composite score,
/// recovering the display value. Rounds toward zero.
///
/// The scaled product alone cannot be trusted at the edges: binary
/// representation error lands it just below an integer for an exact
/// display decimal (`0.29 * 100`), and just above one when a
/// near-boundary weight sits within a few ulp of `10^-d`
/// (`100.00999999999 * 100`). The first guess is corrected against
/// the correctly rounded decimal boundaries `k / 10^d`, so a weight
/// never surfaces as a display digit and an exact display decimal is
/// never dropped.
pub fn truncate_score(score: f64, decimal_places: u32) -> f64 {
    let scale = 10f64.powi(decimal_places as i32);
    let magnitude = score.abs();
    let mut k = (magnitude * scale).floor();
    if k / scale > magnitude {
        k -= 1.0;
    } else if (k + 1.0) / scale <= magnitude {
        k += 1.0;
    }
    let truncated = k / scale;
    if score.is_sign_negative() {
        -truncated
    } else {
        truncated
    }
}

/// Display rendering of a composite score, e.g. `100.00` for `D = 2`.
pub fn format_score(score: f64, decimal_places: u32) -> String {
    format!(
        "{:.*}",
        decimal_places as usize,
        truncate_score(score, decimal_places)
    )
}

/// Checks the documented numeric-budget contract: integer digits of the
/// raw score plus the weight's decimal digits must fit the f64
/// mantissa, or the embedded weight becomes unstable.
pub fn precision_budget_ok(raw_score: f64, weight: Weight) -> bool {
    let magnitude = raw_score.abs();
    let int_digits = if magnitude < 10.0 {
        1
    } else {
        magnitude.log10().floor() as u32 + 1
    };
    int_digits + weight.scale() <= F64_DECIMAL_DIGITS
}
