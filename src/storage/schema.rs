//! Table definitions and seed data for the gateway ledger.

use sea_query::Iden;

/// Accounts table schema.
#[derive(Iden)]
pub enum Accounts {
    Table,
    #[iden = "id"]
    Id,
    #[iden = "account_number"]
    AccountNumber,
    #[iden = "current_balance"]
    CurrentBalance,
    #[iden = "customer_name"]
    CustomerName,
}

/// Transactions table schema.
#[derive(Iden)]
pub enum Transactions {
    Table,
    #[iden = "id"]
    Id,
    #[iden = "account_number"]
    AccountNumber,
    #[iden = "amount"]
    Amount,
    #[iden = "payment_method"]
    PaymentMethod,
    #[iden = "timestamp"]
    Timestamp,
    #[iden = "status"]
    Status,
    #[iden = "risk_score"]
    RiskScore,
    #[iden = "is_fraud"]
    IsFraud,
}

pub const CREATE_ACCOUNTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS accounts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    account_number TEXT UNIQUE NOT NULL,
    current_balance REAL NOT NULL,
    customer_name TEXT NOT NULL
);
"#;

// `status` carries no CHECK constraint: any text is accepted, only
// 'Approved', 'Denied' and 'Flagged' are understood by the gateway.
pub const CREATE_TRANSACTIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS transactions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    account_number TEXT NOT NULL,
    amount REAL NOT NULL,
    payment_method TEXT NOT NULL,
    timestamp TEXT NOT NULL,
    status TEXT NOT NULL,
    risk_score REAL NOT NULL,
    is_fraud INTEGER NOT NULL DEFAULT 0,
    FOREIGN KEY (account_number) REFERENCES accounts (account_number)
);
"#;

pub struct SeedAccount {
    pub account_number: &'static str,
    pub current_balance: f64,
    pub customer_name: &'static str
}

pub const SEED_ACCOUNTS: [SeedAccount; 2] = [
    SeedAccount {
        account_number: "1234567890123456",
        current_balance: 5000.00,
        customer_name: "Alice Johnson"
    },
    SeedAccount {
        account_number: "9876543210987654",
        current_balance: 150.50,
        customer_name: "Bob Smith"
    }
];
