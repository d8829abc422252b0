//! Cart/session configuration.
//!
//! Defaults suit the restaurant's menu; each value can be overridden from the
//! environment:
//!
//! | variable | default |
//! |---|---|
//! | `SMOKEHOUSE_DEFAULT_INCREMENT_GRAMS` | `100` |
//! | `SMOKEHOUSE_MIN_PHONE_DIGITS` | `10` |

use thiserror::Error;

use smokehouse_core::Grams;

pub const DEFAULT_INCREMENT_VAR: &str = "SMOKEHOUSE_DEFAULT_INCREMENT_GRAMS";
pub const MIN_PHONE_DIGITS_VAR: &str = "SMOKEHOUSE_MIN_PHONE_DIGITS";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} has invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartConfig {
    /// Grams added by one tap on "add to cart".
    pub default_increment: Grams,
    /// Minimum phone length after stripping spaces, dashes and parentheses.
    pub min_phone_digits: usize,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            default_increment: Grams::new(100),
            min_phone_digits: 10,
        }
    }
}

impl CartConfig {
    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read overrides through `lookup`; unset variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(DEFAULT_INCREMENT_VAR) {
            let grams: u32 = value.trim().parse().map_err(|_| ConfigError::Invalid {
                var: DEFAULT_INCREMENT_VAR,
                value: value.clone(),
                reason: "expected a whole number of grams",
            })?;
            if grams == 0 {
                return Err(ConfigError::Invalid {
                    var: DEFAULT_INCREMENT_VAR,
                    value,
                    reason: "increment must be positive",
                });
            }
            config.default_increment = Grams::new(grams);
        }

        if let Some(value) = lookup(MIN_PHONE_DIGITS_VAR) {
            config.min_phone_digits = value.trim().parse().map_err(|_| ConfigError::Invalid {
                var: MIN_PHONE_DIGITS_VAR,
                value: value.clone(),
                reason: "expected a non-negative integer",
            })?;
        }

        tracing::debug!(
            default_increment = %config.default_increment,
            min_phone_digits = config.min_phone_digits,
            "cart config resolved"
        );
        Ok(config)
    }
}
