//! Banker review: the flagged queue, the riskiest payments, and account balances.


use std::io::Write;

use crate::models::{Account, Transaction, UnknownStatus};
use crate::storage::{LedgerStore, Result};

pub const DEFAULT_HIGH_RISK_LIMIT: u64 = 10;

#[derive(Debug, Clone)]
pub struct ReviewReport {
    /// Payments held for review, riskiest first.
    pub flagged: Vec<Transaction>,
    /// Riskiest payments across all statuses.
    pub highest_risk: Vec<Transaction>,
    pub accounts: Vec<Account>
}

impl ReviewReport {
    pub async fn load<S: LedgerStore + ?Sized>(store: &S, limit: u64) -> Result<Self> {
        Ok(Self {
            flagged: store.flagged_transactions().await?,
            highest_risk: store.highest_risk_transactions(limit).await?,
            accounts: store.accounts().await?
        })
    }

    pub fn write_to<W: Write>(&self, output: &mut W) -> std::io::Result<()> {
        writeln!(output, "== Flagged transactions ({}) ==", self.flagged.len())?;
        write_transactions(output, &self.flagged)?;

        writeln!(output)?;
        writeln!(output, "== Highest risk transactions ({}) ==", self.highest_risk.len())?;
        write_transactions(output, &self.highest_risk)?;

        writeln!(output)?;
        writeln!(output, "== Accounts ({}) ==", self.accounts.len())?;
        writeln!(output, "{:>4}  {:<20} {:>14}  customer", "id", "account_number", "balance")?;

        for account in &self.accounts {
            writeln!(
                output,
                "{:>4}  {:<20} {:>14.2}  {}",
                account.id,
                account.account_number,
                account.current_balance,
                account.customer_name
            )?;
        }

        Ok(())
    }
}

fn write_transactions<W: Write>(output: &mut W, transactions: &[Transaction]) -> std::io::Result<()> {
    if transactions.is_empty() {
        return writeln!(output, "(none)");
    }

    writeln!(
        output,
        "{:>6}  {:<20} {:>12}  {:<16} {:<9} {:>5}  {:<5}  timestamp",
        "id", "account_number", "amount", "method", "status", "risk", "fraud"
    )?;

    for transaction in transactions {
        let status = match transaction.parsed_status() {
            Ok(status) => status.to_string(),
            Err(UnknownStatus(label)) => format!("?{label}")
        };

        writeln!(
            output,
            "{:>6}  {:<20} {:>12.2}  {:<16} {:<9} {:>5.2}  {:<5}  {}",
            transaction.id,
            transaction.account_number,
            transaction.amount,
            transaction.payment_method,
            status,
            transaction.risk_score,
            transaction.is_fraud,
            transaction.timestamp
        )?;
    }

    Ok(())
}
