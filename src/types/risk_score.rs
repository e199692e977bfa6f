use crate::types::errors::ValueError;
use serde::{de, Deserialize, Deserializer};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Fraud probability produced by the external scoring model.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct RiskScore(f64);

impl RiskScore {
    pub fn new(value: f64) -> Result<Self, ValueError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(ValueError::RiskScoreOutOfRange(value));
        }

        Ok(RiskScore(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Display for RiskScore {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{:.2}", self.0)
    }
}

impl FromStr for RiskScore {
    type Err = ValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        let parsed: f64 = value.parse().map_err(|error: std::num::ParseFloatError| {
            ValueError::NotANumber { value: value.to_string(), reason: error.to_string() }
        })?;

        RiskScore::new(parsed)
    }
}

impl<'de> Deserialize<'de> for RiskScore {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        RiskScore::new(value).map_err(de::Error::custom)
    }
}
