//! Change arithmetic for quotes
//!
//! Pure functions only. Every result is finite: a zero, negative-zero or
//! non-finite reference value means "no change available", never NaN or
//! infinity.

use serde::{Deserialize, Serialize};

/// Change of a quote relative to a reference value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuoteChange {
    /// `current - previous`
    pub absolute: f64,
    /// `absolute / previous * 100`
    pub percent: f64,
    /// Zero counts as non-negative
    pub non_negative: bool,
}

impl QuoteChange {
    /// `+` for non-negative changes, empty otherwise (the minus comes from the number)
    pub fn sign(&self) -> &'static str {
        if self.non_negative {
            "+"
        } else {
            ""
        }
    }
}

/// Computes the change from `previous` to `current`
///
/// Returns `None` when `previous` is zero or either value is not finite.
pub fn derive_change(current: f64, previous: f64) -> Option<QuoteChange> {
    if !current.is_finite() || !previous.is_finite() || previous == 0.0 {
        return None;
    }

    let absolute = current - previous;
    let percent = absolute / previous * 100.0;
    if !percent.is_finite() {
        return None;
    }

    Some(QuoteChange {
        absolute,
        percent,
        non_negative: absolute >= 0.0,
    })
}

/// Computes the change against the first usable reference
///
/// `primary` wins when present and non-zero, otherwise `secondary` is used.
/// `None` when neither reference is usable.
pub fn derive_change_with_fallback(
    current: f64,
    primary: Option<f64>,
    secondary: Option<f64>,
) -> Option<QuoteChange> {
    primary
        .and_then(|previous| derive_change(current, previous))
        .or_else(|| secondary.and_then(|previous| derive_change(current, previous)))
}

/// Reconstructs the reference value from a current value and a percent change
///
/// Used for sources that report only a 24h percent change. `None` when the
/// percent is -100 or not finite.
pub fn previous_from_percent(current: f64, percent: f64) -> Option<f64> {
    let factor = 1.0 + percent / 100.0;
    let previous = current / factor;
    (factor != 0.0 && previous.is_finite()).then_some(previous)
}
