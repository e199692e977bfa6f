mod errors;
mod schema;
mod sqlite_ledger;

use async_trait::async_trait;

use crate::models::{Account, NewAccount, NewTransaction, Transaction};
use crate::types::{AccountId, AccountNumber, TransactionId};

pub use errors::StorageError;
pub use sqlite_ledger::SqliteLedger;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Persistence for accounts and the transaction log.
#[async_trait]
pub trait LedgerStore: Send + Sync + 'static {
    /// Creates both tables if they do not exist yet.
    async fn create_schema(&self) -> Result<()>;

    /// Inserts the seed accounts, leaving any existing account with the same number untouched.
    async fn seed(&self) -> Result<()>;

    async fn initialize(&self) -> Result<()> {
        self.create_schema().await?;
        self.seed().await
    }

    async fn open_account(&self, account: &NewAccount) -> Result<AccountId>;
    async fn find_account(&self, account_number: &AccountNumber) -> Result<Option<Account>>;
    async fn accounts(&self) -> Result<Vec<Account>>;
    async fn count_accounts(&self) -> Result<u64>;

    /// Writes a transaction row as given, without touching balances.
    #[cfg(test)]
    async fn insert_transaction(&self, transaction: &NewTransaction) -> Result<TransactionId>;

    /// Atomically checks funds, optionally debits the account, and logs the transaction.
    ///
    /// # Errors
    /// - `AccountNotFound` if no account carries the transaction's account number.
    /// - `InsufficientFunds` if the balance is below the amount, whether or not a debit was requested.
    async fn record_payment(&self, transaction: &NewTransaction, debit: bool) -> Result<TransactionId>;

    async fn find_transaction(&self, transaction_id: TransactionId) -> Result<Option<Transaction>>;
    async fn transactions(&self) -> Result<Vec<Transaction>>;

    /// Transactions held for banker review, riskiest first.
    async fn flagged_transactions(&self) -> Result<Vec<Transaction>>;

    /// The `limit` riskiest transactions regardless of status.
    async fn highest_risk_transactions(&self, limit: u64) -> Result<Vec<Transaction>>;

    async fn set_fraud_label(&self, transaction_id: TransactionId, is_fraud: bool) -> Result<()>;
}
