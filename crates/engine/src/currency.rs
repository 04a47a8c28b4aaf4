use serde::{Deserialize, Serialize};

use crate::EngineError;

/// ISO-like currency code used for all money values.
///
/// RodMar is effectively mono-currency (default `COP`), but the engine models
/// currency explicitly to keep the data model future-proof.
///
/// ## Minor units
///
/// The engine stores monetary values as an `i64` number of **minor units**
/// (see `Money`). `minor_units()` returns how many decimal digits are used
/// when converting between:
/// - major units (human input/output, e.g. `2000000.50 COP`)
/// - minor units (stored integers, e.g. `200000050`)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Cop,
}

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Cop => "COP",
        }
    }

    /// Number of fraction digits used when formatting/parsing amounts.
    ///
    /// Example: COP uses 2 fraction digits (centavos).
    #[must_use]
    pub const fn minor_units(self) -> u8 {
        match self {
            Currency::Cop => 2,
        }
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "COP" => Ok(Currency::Cop),
            other => Err(EngineError::InvalidAmount(format!(
                "unsupported currency: {other}"
            ))),
        }
    }
}
