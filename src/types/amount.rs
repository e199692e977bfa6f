use crate::types::errors::ValueError;
use serde::{de, Deserialize, Deserializer};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A payment amount. Always finite and strictly positive.
///
/// The ledger stores currency as `REAL`, so the amount is carried as an `f64`
/// and only validated at the edge.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Amount(f64);

impl Amount {
    pub fn new(value: f64) -> Result<Self, ValueError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(ValueError::InvalidAmount(value));
        }

        Ok(Amount(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Display for Amount {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{:.2}", self.0)
    }
}

impl FromStr for Amount {
    type Err = ValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        let parsed: f64 = value.parse().map_err(|error: std::num::ParseFloatError| {
            ValueError::NotANumber { value: value.to_string(), reason: error.to_string() }
        })?;

        Amount::new(parsed)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Amount::new(value).map_err(de::Error::custom)
    }
}
