use std::str::FromStr;

use async_trait::async_trait;
use sea_query::{Expr, OnConflict, Order, Query, SelectStatement, SimpleExpr, SqliteQueryBuilder};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::models::{Account, NewAccount, NewTransaction, Transaction, TransactionStatus};
use crate::storage::schema::{Accounts, Transactions, CREATE_ACCOUNTS_TABLE, CREATE_TRANSACTIONS_TABLE, SEED_ACCOUNTS};
use crate::storage::{LedgerStore, Result, StorageError};
use crate::types::{AccountId, AccountNumber, TransactionId};

/// SQLite implementation of [`LedgerStore`].
pub struct SqliteLedger {
    pool: SqlitePool
}

impl SqliteLedger {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a pool for the configured database, creating the file if needed.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .foreign_keys(config.enforce_foreign_keys);

        //NOTE: Connections are kept for the lifetime of the pool so an in-memory database is never dropped
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        info!("Connected to ledger database [{}]", config.url);

        Ok(Self::new(pool))
    }

    #[cfg(test)]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn select_accounts() -> SelectStatement {
    Query::select()
        .columns([
            Accounts::Id,
            Accounts::AccountNumber,
            Accounts::CurrentBalance,
            Accounts::CustomerName,
        ])
        .from(Accounts::Table)
        .to_owned()
}

fn select_transactions() -> SelectStatement {
    Query::select()
        .columns([
            Transactions::Id,
            Transactions::AccountNumber,
            Transactions::Amount,
            Transactions::PaymentMethod,
            Transactions::Timestamp,
            Transactions::Status,
            Transactions::RiskScore,
            Transactions::IsFraud,
        ])
        .from(Transactions::Table)
        .to_owned()
}

fn insert_transaction_statement(transaction: &NewTransaction) -> String {
    let mut columns = vec![
        Transactions::AccountNumber,
        Transactions::Amount,
        Transactions::PaymentMethod,
        Transactions::Timestamp,
        Transactions::Status,
        Transactions::RiskScore,
    ];
    let mut values: Vec<SimpleExpr> = vec![
        transaction.account_number.as_str().into(),
        transaction.amount.value().into(),
        transaction.payment_method.as_str().into(),
        transaction.timestamp.as_str().into(),
        transaction.status.as_str().into(),
        transaction.risk_score.value().into(),
    ];

    if let Some(is_fraud) = transaction.is_fraud {
        columns.push(Transactions::IsFraud);
        values.push(i64::from(is_fraud).into());
    }

    Query::insert()
        .into_table(Transactions::Table)
        .columns(columns)
        .values_panic(values)
        .to_string(SqliteQueryBuilder)
}

#[async_trait]
impl LedgerStore for SqliteLedger {
    async fn create_schema(&self) -> Result<()> {
        sqlx::query(CREATE_ACCOUNTS_TABLE).execute(&self.pool).await?;
        sqlx::query(CREATE_TRANSACTIONS_TABLE).execute(&self.pool).await?;

        debug!("Ledger schema is in place");

        Ok(())
    }

    async fn seed(&self) -> Result<()> {
        let query = {
            let mut insert = Query::insert();
            insert
                .into_table(Accounts::Table)
                .columns([Accounts::AccountNumber, Accounts::CurrentBalance, Accounts::CustomerName]);

            for account in &SEED_ACCOUNTS {
                insert.values_panic([
                    account.account_number.into(),
                    account.current_balance.into(),
                    account.customer_name.into(),
                ]);
            }

            insert
                .on_conflict(OnConflict::column(Accounts::AccountNumber).do_nothing().to_owned())
                .to_string(SqliteQueryBuilder)
        };

        let inserted = sqlx::query(&query).execute(&self.pool).await?.rows_affected();

        info!("Seeded ledger with {inserted} new account(s)");

        Ok(())
    }

    async fn open_account(&self, account: &NewAccount) -> Result<AccountId> {
        let query = Query::insert()
            .into_table(Accounts::Table)
            .columns([Accounts::AccountNumber, Accounts::CurrentBalance, Accounts::CustomerName])
            .values_panic([
                account.account_number.as_str().into(),
                account.current_balance.into(),
                account.customer_name.as_str().into(),
            ])
            .to_string(SqliteQueryBuilder);

        let result = sqlx::query(&query)
            .execute(&self.pool)
            .await
            .map_err(|error| StorageError::from_account_insert(error, &account.account_number))?;

        Ok(result.last_insert_rowid())
    }

    async fn find_account(&self, account_number: &AccountNumber) -> Result<Option<Account>> {
        let query = select_accounts()
            .and_where(Expr::col(Accounts::AccountNumber).eq(account_number.as_str()))
            .to_string(SqliteQueryBuilder);

        Ok(sqlx::query_as::<_, Account>(&query).fetch_optional(&self.pool).await?)
    }

    async fn accounts(&self) -> Result<Vec<Account>> {
        let query = select_accounts()
            .order_by(Accounts::Id, Order::Asc)
            .to_string(SqliteQueryBuilder);

        Ok(sqlx::query_as::<_, Account>(&query).fetch_all(&self.pool).await?)
    }

    async fn count_accounts(&self) -> Result<u64> {
        let query = Query::select()
            .expr(Expr::col(Accounts::Id).count())
            .from(Accounts::Table)
            .to_string(SqliteQueryBuilder);

        let row = sqlx::query(&query).fetch_one(&self.pool).await?;
        let count: i64 = row.try_get(0)?;

        Ok(count.max(0) as u64)
    }

    #[cfg(test)]
    async fn insert_transaction(&self, transaction: &NewTransaction) -> Result<TransactionId> {
        let query = insert_transaction_statement(transaction);
        let result = sqlx::query(&query).execute(&self.pool).await?;

        Ok(result.last_insert_rowid())
    }

    async fn record_payment(&self, transaction: &NewTransaction, debit: bool) -> Result<TransactionId> {
        let account_number = &transaction.account_number;
        let amount = transaction.amount.value();

        //NOTE: Returning early drops the transaction, which rolls it back
        let mut db_transaction = self.pool.begin().await?;

        //NOTE: The guarded update is the first statement so the write lock is taken before any read
        let debited = if debit { amount } else { 0.0 };
        let debit_query = Query::update()
            .table(Accounts::Table)
            .value(Accounts::CurrentBalance, Expr::col(Accounts::CurrentBalance).sub(debited))
            .and_where(Expr::col(Accounts::AccountNumber).eq(account_number.as_str()))
            .and_where(Expr::col(Accounts::CurrentBalance).gte(amount))
            .to_string(SqliteQueryBuilder);

        let updated = sqlx::query(&debit_query).execute(&mut *db_transaction).await?.rows_affected();

        if updated == 0 {
            let balance_query = Query::select()
                .column(Accounts::CurrentBalance)
                .from(Accounts::Table)
                .and_where(Expr::col(Accounts::AccountNumber).eq(account_number.as_str()))
                .to_string(SqliteQueryBuilder);

            let Some(row) = sqlx::query(&balance_query).fetch_optional(&mut *db_transaction).await? else {
                return Err(StorageError::AccountNotFound { account_number: account_number.clone() });
            };

            return Err(StorageError::InsufficientFunds {
                account_number: account_number.clone(),
                balance: row.try_get("current_balance")?,
                requested: amount
            });
        }

        let insert_query = insert_transaction_statement(transaction);
        let transaction_id = sqlx::query(&insert_query)
            .execute(&mut *db_transaction)
            .await?
            .last_insert_rowid();

        db_transaction.commit().await?;

        debug!("Recorded transaction [{transaction_id}] for account [{account_number}] (debited: {debit})");

        Ok(transaction_id)
    }

    async fn find_transaction(&self, transaction_id: TransactionId) -> Result<Option<Transaction>> {
        let query = select_transactions()
            .and_where(Expr::col(Transactions::Id).eq(transaction_id))
            .to_string(SqliteQueryBuilder);

        Ok(sqlx::query_as::<_, Transaction>(&query).fetch_optional(&self.pool).await?)
    }

    async fn transactions(&self) -> Result<Vec<Transaction>> {
        let query = select_transactions()
            .order_by(Transactions::Id, Order::Asc)
            .to_string(SqliteQueryBuilder);

        Ok(sqlx::query_as::<_, Transaction>(&query).fetch_all(&self.pool).await?)
    }

    async fn flagged_transactions(&self) -> Result<Vec<Transaction>> {
        let query = select_transactions()
            .and_where(Expr::col(Transactions::Status).eq(TransactionStatus::Flagged.as_str()))
            .order_by(Transactions::RiskScore, Order::Desc)
            .order_by(Transactions::Id, Order::Asc)
            .to_string(SqliteQueryBuilder);

        Ok(sqlx::query_as::<_, Transaction>(&query).fetch_all(&self.pool).await?)
    }

    async fn highest_risk_transactions(&self, limit: u64) -> Result<Vec<Transaction>> {
        let query = select_transactions()
            .order_by(Transactions::RiskScore, Order::Desc)
            .order_by(Transactions::Id, Order::Asc)
            .limit(limit)
            .to_string(SqliteQueryBuilder);

        Ok(sqlx::query_as::<_, Transaction>(&query).fetch_all(&self.pool).await?)
    }

    async fn set_fraud_label(&self, transaction_id: TransactionId, is_fraud: bool) -> Result<()> {
        let query = Query::update()
            .table(Transactions::Table)
            .value(Transactions::IsFraud, i64::from(is_fraud))
            .and_where(Expr::col(Transactions::Id).eq(transaction_id))
            .to_string(SqliteQueryBuilder);

        let updated = sqlx::query(&query).execute(&self.pool).await?.rows_affected();

        if updated == 0 {
            return Err(StorageError::TransactionNotFound { transaction_id });
        }

        Ok(())
    }
}
