//! Numeric settings, optionally read from the environment.

use std::str::FromStr;

use arbor_num::{MathContext, NumberKind, RoundingMode};

use crate::errors::{invalid_config, EvalError};

/// Environment variable naming the number kind (`floating`, `decimal`, ...).
pub const NUMBER_KIND_VAR: &str = "ARBOR_NUMBER_KIND";
/// Environment variable holding the decimal precision in significant digits.
pub const PRECISION_VAR: &str = "ARBOR_PRECISION";

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ContextConfig {
    pub number_kind: NumberKind,
    pub math_context: MathContext,
}

impl ContextConfig {
    /// Defaults overridden by `ARBOR_NUMBER_KIND` and `ARBOR_PRECISION`.
    pub fn from_env() -> Result<Self, EvalError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ContextConfig::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, EvalError> {
        let mut config = ContextConfig::default();
        if let Some(kind) = lookup(NUMBER_KIND_VAR) {
            config.number_kind = NumberKind::from_str(&kind)?;
        }
        if let Some(precision) = lookup(PRECISION_VAR) {
            let digits = precision
                .trim()
                .parse::<u64>()
                .map_err(|_| invalid_config(PRECISION_VAR, &precision))?;
            config.math_context = MathContext::new(digits, RoundingMode::HalfEven)?;
        }
        tracing::debug!(
            number_kind = %config.number_kind,
            precision = config.math_context.precision(),
            "loaded context config"
        );
        Ok(config)
    }
}
