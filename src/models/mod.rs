mod account;
mod errors;
mod payment;
mod transaction;

use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub use account::{Account, NewAccount};
pub use errors::{RequestError, UnknownStatus};
pub use payment::{DenialReason, PaymentOutcome, PaymentRequest};
pub use transaction::{NewTransaction, Transaction};

/// Decision recorded against a transaction. Stored as its exact, case-sensitive name.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum TransactionStatus {
    Approved,
    Denied,
    Flagged
}

impl TransactionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionStatus::Approved => "Approved",
            TransactionStatus::Denied => "Denied",
            TransactionStatus::Flagged => "Flagged"
        }
    }
}

impl Display for TransactionStatus {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Approved" => Ok(TransactionStatus::Approved),
            "Denied" => Ok(TransactionStatus::Denied),
            "Flagged" => Ok(TransactionStatus::Flagged),
            other => Err(UnknownStatus(other.to_string()))
        }
    }
}
