//! Per-unit price derivation from settlement amount and quantity.

use crate::config::ThresholdPolicy;

/// Derive the unit price for one settlement line.
///
/// The settlement amount is signed (refund lines are negative) while
/// the ERP wants a non-negative per-unit price, so the magnitude is
/// taken first. Division only happens when the quantity clears the
/// policy threshold; single-unit and zero-quantity lines keep the
/// amount as-is. Fractional results round half-to-even.
pub fn unit_price(amount: f64, quantity: f64, policy: ThresholdPolicy) -> i64 {
    let magnitude = amount.abs();
    let divide = match policy {
        ThresholdPolicy::AbsoluteThreshold => quantity.abs() > 1.0,
        ThresholdPolicy::SignedThreshold => quantity > 1.0,
    };
    let price = if divide {
        magnitude / quantity.abs()
    } else {
        magnitude
    };
    price.round_ties_even() as i64
}
