use crate::types::{AccountNumber, TransactionId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Account [{account_number}] already exists")]
    DuplicateAccount {
        account_number: AccountNumber
    },
    #[error("Account [{account_number}] was not found")]
    AccountNotFound {
        account_number: AccountNumber
    },
    #[error("Insufficient funds on account [{account_number}]: balance [{balance:.2}], requested [{requested:.2}]")]
    InsufficientFunds {
        account_number: AccountNumber,
        balance: f64,
        requested: f64
    },
    #[error("Transaction [{transaction_id}] was not found")]
    TransactionNotFound {
        transaction_id: TransactionId
    }
}

impl StorageError {
    /// Maps a unique-constraint violation on insert into `DuplicateAccount`.
    pub fn from_account_insert(error: sqlx::Error, account_number: &AccountNumber) -> Self {
        match &error {
            sqlx::Error::Database(database_error) if database_error.is_unique_violation() => Self::DuplicateAccount {
                account_number: account_number.clone()
            },
            _ => Self::Database(error)
        }
    }
}
