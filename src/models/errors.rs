use crate::models::PaymentRequest;
use crate::types::AccountNumber;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Payment method is required for payment of [{amount}] on account [{account_number}]")]
    BlankPaymentMethod {
        account_number: AccountNumber,
        amount: String
    },
    #[error("Customer name is required for account [{account_number}]")]
    BlankCustomerName {
        account_number: AccountNumber
    },
    #[error("Opening balance [{balance}] must be a finite, non-negative number for account [{account_number}]")]
    InvalidOpeningBalance {
        account_number: AccountNumber,
        balance: f64
    }
}

impl RequestError {
    pub fn blank_payment_method(request: &PaymentRequest) -> Self {
        Self::BlankPaymentMethod {
            account_number: request.account_number.clone(),
            amount: request.amount.to_string()
        }
    }

    pub fn blank_customer_name(account_number: &AccountNumber) -> Self {
        Self::BlankCustomerName { account_number: account_number.clone() }
    }

    pub fn invalid_opening_balance(account_number: &AccountNumber, balance: f64) -> Self {
        Self::InvalidOpeningBalance {
            account_number: account_number.clone(),
            balance
        }
    }
}

/// A stored `status` label outside the recognised set. The schema does not
/// constrain the column, so this surfaces only when rows are read back.
#[derive(Debug, Error, PartialEq)]
#[error("Unknown transaction status [{0}]")]
pub struct UnknownStatus(pub String);
