use crate::types::errors::ValueError;
use serde::{de, Deserialize, Deserializer};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Business key of an account, a non-empty run of ASCII digits.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct AccountNumber(String);

impl AccountNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AccountNumber {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl FromStr for AccountNumber {
    type Err = ValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        if value.is_empty() {
            return Err(ValueError::EmptyAccountNumber);
        }

        if !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValueError::NonDigitAccountNumber(value.to_string()));
        }

        Ok(AccountNumber(value.to_string()))
    }
}

impl<'de> Deserialize<'de> for AccountNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        AccountNumber::from_str(&value).map_err(de::Error::custom)
    }
}
