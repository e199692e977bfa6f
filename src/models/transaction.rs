use serde::{Serialize, Serializer};
use sqlx::FromRow;
use std::str::FromStr;

use crate::models::errors::UnknownStatus;
use crate::models::{PaymentRequest, TransactionStatus};
use crate::types::{AccountNumber, Amount, RiskScore, TransactionId};

/// A row of the `transactions` table.
///
/// Columns are kept as the database hands them back: the schema admits any
/// text in `status` and does not tie `risk_score` to a range, so parsing into
/// the typed layer is left to the caller (see [`Transaction::parsed_status`]).
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub account_number: String,
    pub amount: f64,
    pub payment_method: String,
    /// RFC 3339 text.
    pub timestamp: String,
    pub status: String,
    pub risk_score: f64,
    /// Ground-truth label for offline model training, not the model's verdict.
    #[serde(serialize_with = "serialize_flag")]
    pub is_fraud: bool
}

/// Writes the label the way the column stores it, as 0 or 1.
fn serialize_flag<S: Serializer>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*flag))
}

impl Transaction {
    pub fn parsed_status(&self) -> Result<TransactionStatus, UnknownStatus> {
        TransactionStatus::from_str(&self.status)
    }
}

/// A transaction about to be written.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub account_number: AccountNumber,
    pub amount: Amount,
    pub payment_method: String,
    pub timestamp: String,
    pub status: TransactionStatus,
    pub risk_score: RiskScore,
    /// `None` leaves the column to its default (not fraud).
    pub is_fraud: Option<bool>
}

impl NewTransaction {
    pub fn from_request(request: &PaymentRequest, status: TransactionStatus, timestamp: String) -> Self {
        Self {
            account_number: request.account_number.clone(),
            amount: request.amount,
            payment_method: request.payment_method.trim().to_string(),
            timestamp,
            status,
            risk_score: request.risk_score,
            is_fraud: None
        }
    }
}
