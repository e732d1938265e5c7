// src/common/variant.rs

use super::timing;
use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;
use core::time::Duration;

/// Hardware model a connection talks to.
///
/// Both models share the core command set; the 6487 adds the filter,
/// reset and voltage-source parameters.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "std", derive(serde::Deserialize))]
pub enum Variant {
    #[cfg_attr(feature = "std", serde(rename = "6485", alias = "K6485"))]
    K6485,
    #[cfg_attr(feature = "std", serde(rename = "6487", alias = "K6487"))]
    K6487,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::K6485, Variant::K6487];

    #[inline]
    pub const fn model_number(&self) -> &'static str {
        match self {
            Variant::K6485 => "6485",
            Variant::K6487 => "6487",
        }
    }

    /// Exchange timeout applied when the settings do not override it.
    #[inline]
    pub const fn default_timeout(&self) -> Duration {
        match self {
            Variant::K6485 => timing::K6485_EXCHANGE_TIMEOUT,
            Variant::K6487 => timing::K6487_EXCHANGE_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Model has to be either '6485' or '6487', got '{0}'")]
pub struct UnknownVariant(pub String);

impl FromStr for Variant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let model = s.trim();
        let model = model
            .strip_prefix('K')
            .or_else(|| model.strip_prefix('k'))
            .unwrap_or(model);
        match model {
            "6485" => Ok(Variant::K6485),
            "6487" => Ok(Variant::K6487),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keithley {}", self.model_number())
    }
}
