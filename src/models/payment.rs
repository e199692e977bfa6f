use serde::Deserialize;
use std::fmt;
use std::fmt::{Display, Formatter};

use crate::models::errors::RequestError;
use crate::models::TransactionStatus;
use crate::types::{AccountNumber, Amount, RiskScore, TransactionId};

/// A payment submitted to the gateway, already scored by the fraud model.
///
/// Also the row shape of batch CSV input.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentRequest {
    pub account_number: AccountNumber,
    pub amount: Amount,
    /// Free-form label such as `vmb_transfer` or `card_payment`.
    pub payment_method: String,
    pub risk_score: RiskScore
}

impl PaymentRequest {
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.payment_method.trim().is_empty() {
            return Err(RequestError::blank_payment_method(self));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DenialReason {
    HighRisk(RiskScore),
    UnknownAccount,
    InsufficientFunds
}

impl Display for DenialReason {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DenialReason::HighRisk(score) => write!(formatter, "High Fraud Risk Detected (Score: {score})"),
            DenialReason::UnknownAccount => formatter.write_str("Invalid VMB Account Number."),
            DenialReason::InsufficientFunds => formatter.write_str("Insufficient Funds.")
        }
    }
}

/// Result of running a payment through the gateway.
///
/// Denials are an expected business outcome, not an error. Only accepted
/// payments (approved or flagged) leave a row in the ledger.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentOutcome {
    Accepted {
        status: TransactionStatus,
        transaction_id: TransactionId,
        risk_score: RiskScore
    },
    Denied {
        reason: DenialReason,
        risk_score: RiskScore
    }
}

impl PaymentOutcome {
    pub fn status(&self) -> TransactionStatus {
        match self {
            PaymentOutcome::Accepted { status, .. } => *status,
            PaymentOutcome::Denied { .. } => TransactionStatus::Denied
        }
    }

    pub fn transaction_id(&self) -> Option<TransactionId> {
        match self {
            PaymentOutcome::Accepted { transaction_id, .. } => Some(*transaction_id),
            PaymentOutcome::Denied { .. } => None
        }
    }
}

impl Display for PaymentOutcome {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PaymentOutcome::Accepted { status, transaction_id, risk_score } => write!(
                formatter,
                "Transaction {status} [{transaction_id}]. Risk Score: {risk_score}."
            ),
            PaymentOutcome::Denied { reason, .. } => write!(formatter, "Transaction Denied. {reason}")
        }
    }
}
