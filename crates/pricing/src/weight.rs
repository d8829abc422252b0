//! Weight label parsing.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use smokehouse_core::Grams;

static NUMERAL: Lazy<Regex> = Lazy::new(|| {
    // ASCII digits only; labels come from a Russian-language catalog.
    Regex::new(r"[0-9.]+").expect("weight numeral pattern is valid")
});

const KILOGRAM_MARKER: &str = "кг";
const GRAM_MARKER: &str = "г";
const MILLILITRE_MARKER: &str = "мл";

/// Unit marker found in a weight label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    Kilograms,
    Grams,
    /// Millilitres are priced like grams (1 мл == 1 г).
    Millilitres,
    /// No recognized marker; the numeral is taken as grams.
    Unspecified,
}

/// A parsed weight label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weight {
    pub grams: Grams,
    pub unit: WeightUnit,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WeightParseError {
    #[error("weight label contains no number")]
    NoNumber,

    #[error("weight label number is malformed: {0:?}")]
    InvalidNumber(String),
}

/// Parse a weight label, reporting why it failed.
///
/// The first comma is read as a decimal point, the first run of digits and dots
/// is the magnitude, and the unit is picked by marker (`кг` before `г`, since the
/// kilogram marker contains the gram one). Rounds half-up to whole grams.
pub fn parse_weight(label: &str) -> Result<Weight, WeightParseError> {
    let normalized = label.to_lowercase().replacen(',', ".", 1);

    let numeral = NUMERAL
        .find(&normalized)
        .ok_or(WeightParseError::NoNumber)?
        .as_str();
    let value: f64 = numeral
        .parse()
        .map_err(|_| WeightParseError::InvalidNumber(numeral.to_string()))?;

    let (unit, value) = if normalized.contains(KILOGRAM_MARKER) {
        (WeightUnit::Kilograms, value * 1000.0)
    } else if normalized.contains(GRAM_MARKER) {
        (WeightUnit::Grams, value)
    } else if normalized.contains(MILLILITRE_MARKER) {
        (WeightUnit::Millilitres, value)
    } else {
        (WeightUnit::Unspecified, value)
    };

    Ok(Weight {
        grams: round_to_grams(value),
        unit,
    })
}

/// Canonical gram amount of a weight label; `0` when the label is unusable.
pub fn parse_weight_grams(label: &str) -> Grams {
    parse_weight(label)
        .map(|w| w.grams)
        .unwrap_or(Grams::ZERO)
}

// `as` saturates, so absurdly large numerals clamp to u32::MAX.
fn round_to_grams(value: f64) -> Grams {
    Grams::new(value.round() as u32)
}
