use serde::Serialize;
use sqlx::FromRow;

use crate::models::errors::RequestError;
use crate::types::{AccountId, AccountNumber};

/// A row of the `accounts` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Account {
    /// Surrogate key assigned by the database.
    pub id: AccountId,
    /// The natural business key, unique across accounts.
    pub account_number: String,
    pub current_balance: f64,
    pub customer_name: String
}

/// An account waiting to be onboarded.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub account_number: AccountNumber,
    pub customer_name: String,
    pub current_balance: f64
}

impl NewAccount {
    pub fn new(account_number: AccountNumber, customer_name: &str, current_balance: f64) -> Result<Self, RequestError> {
        let customer_name = customer_name.trim();

        if customer_name.is_empty() {
            return Err(RequestError::blank_customer_name(&account_number));
        }

        if !current_balance.is_finite() || current_balance < 0.0 {
            return Err(RequestError::invalid_opening_balance(&account_number, current_balance));
        }

        Ok(Self {
            account_number,
            customer_name: customer_name.to_string(),
            current_balance
        })
    }
}
