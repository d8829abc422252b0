//! Proportional pricing.
//!
//! All division is done in `u128` integer arithmetic, so half-way results round
//! up exactly instead of depending on float representation.

use smokehouse_core::Grams;

const GRAMS_PER_KG: u128 = 1000;

/// Price of one kilogram, given a price quoted for `base` grams.
///
/// A product with unknown weight (`base == 0`) is priced at zero per kilogram.
pub fn price_per_kg(price: u64, base: Grams) -> u64 {
    if base.is_zero() {
        return 0;
    }
    round_half_up(u128::from(price) * GRAMS_PER_KG, u128::from(base.get()))
}

/// Price of `selected` grams of a product quoted at `price` for `base` grams.
///
/// Cost scales linearly with the selected weight. Returns zero when the base
/// weight is unknown.
pub fn subtotal(price: u64, base: Grams, selected: Grams) -> u64 {
    if base.is_zero() {
        return 0;
    }
    round_half_up(
        u128::from(price) * u128::from(selected.get()),
        u128::from(base.get()),
    )
}

/// Display form of a gram amount, e.g. `"350 г"`.
pub fn format_grams(grams: Grams) -> String {
    grams.to_string()
}

fn round_half_up(numerator: u128, denominator: u128) -> u64 {
    let rounded = (2 * numerator + denominator) / (2 * denominator);
    u64::try_from(rounded).unwrap_or(u64::MAX)
}
