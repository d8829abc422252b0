//! Measurement units.

use serde::{Deserialize, Serialize};

/// A weight quantity in whole grams.
///
/// Cart lines are measured in grams, never in discrete pieces; keeping the unit in
/// the type stops a piece count from being passed where a weight is expected.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Grams(u32);

impl Grams {
    pub const ZERO: Grams = Grams(0);

    pub const fn new(grams: u32) -> Self {
        Self(grams)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn saturating_add(self, other: Grams) -> Grams {
        Grams(self.0.saturating_add(other.0))
    }

    /// Clamp a signed amount into the representable range (negatives become zero).
    pub fn clamp_from_i64(value: i64) -> Grams {
        Grams(value.clamp(0, u32::MAX as i64) as u32)
    }
}

impl From<u32> for Grams {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<Grams> for u32 {
    fn from(value: Grams) -> Self {
        value.0
    }
}

/// Renders as `"<n> г"`, the label format the storefront shows next to prices.
impl core::fmt::Display for Grams {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} г", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_gram_suffix() {
        assert_eq!(Grams::new(350).to_string(), "350 г");
        assert_eq!(Grams::ZERO.to_string(), "0 г");
    }

    #[test]
    fn clamp_from_i64_bounds() {
        assert_eq!(Grams::clamp_from_i64(-5), Grams::ZERO);
        assert_eq!(Grams::clamp_from_i64(250), Grams::new(250));
        assert_eq!(Grams::clamp_from_i64(i64::MAX), Grams::new(u32::MAX));
    }

    #[test]
    fn saturating_add_caps_at_max() {
        assert_eq!(
            Grams::new(u32::MAX - 1).saturating_add(Grams::new(10)),
            Grams::new(u32::MAX)
        );
        assert_eq!(Grams::new(100).saturating_add(Grams::new(50)), Grams::new(150));
    }
}
