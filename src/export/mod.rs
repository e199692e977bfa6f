//! CSV export of the transaction log, either as stored or as model training rows.

#[cfg(test)]
mod tests;

use std::io::Write;

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use crate::models::Transaction;
use crate::storage::LedgerStore;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ExportFormat {
    /// Every column of the `transactions` table.
    Ledger,
    /// Numeric feature rows for retraining the fraud model.
    Training
}

#[derive(Debug, Serialize)]
struct TrainingRow {
    account_prefix: u32,
    amount: f64,
    method_id: u8,
    risk_score: f64,
    is_fraud: u8
}

impl From<&Transaction> for TrainingRow {
    fn from(transaction: &Transaction) -> Self {
        Self {
            account_prefix: account_prefix(&transaction.account_number),
            amount: transaction.amount,
            method_id: method_id(&transaction.payment_method),
            risk_score: transaction.risk_score,
            is_fraud: u8::from(transaction.is_fraud)
        }
    }
}

/// Leading four digits of a stored account number, 0 when they are not all digits.
fn account_prefix(account_number: &str) -> u32 {
    let prefix: String = account_number.chars().take(4).collect();
    prefix.parse().unwrap_or(0)
}

fn method_id(payment_method: &str) -> u8 {
    match payment_method {
        "vmb_transfer" => 1,
        "card_payment" => 2,
        "crypto" => 3,
        "digital_wallet" => 4,
        _ => 0
    }
}

/// Writes all logged transactions as CSV and returns the number of rows written.
pub async fn export_transactions<S, W>(store: &S, format: ExportFormat, output: W) -> Result<usize>
where
    S: LedgerStore + ?Sized,
    W: Write,
{
    let transactions = store.transactions().await?;
    let mut writer = csv::Writer::from_writer(output);

    for transaction in &transactions {
        match format {
            ExportFormat::Ledger => writer.serialize(transaction)?,
            ExportFormat::Training => writer.serialize(TrainingRow::from(transaction))?
        }
    }

    writer.flush()?;

    info!("Exported {} transaction(s) as {format:?}", transactions.len());

    Ok(transactions.len())
}
