use super::{account_prefix, export_transactions, method_id, ExportFormat};

use std::str::FromStr;

use anyhow::Result;

use crate::config::DatabaseConfig;
use crate::models::{NewTransaction, TransactionStatus};
use crate::storage::{LedgerStore, SqliteLedger};
use crate::types::{AccountNumber, Amount, RiskScore};

async fn create_ledger_with_transactions() -> Result<SqliteLedger> {
    let ledger = SqliteLedger::connect(&DatabaseConfig::in_memory()).await?;
    ledger.initialize().await?;

    let payments = [
        ("1234567890123456", "25.5", "card_payment", TransactionStatus::Approved, 0.1, None),
        ("9876543210987654", "10.0", "gift_card", TransactionStatus::Flagged, 0.6, Some(true)),
    ];

    for (account_number, amount, payment_method, status, risk_score, is_fraud) in payments {
        ledger.insert_transaction(&NewTransaction {
            account_number: AccountNumber::from_str(account_number)?,
            amount: Amount::from_str(amount)?,
            payment_method: payment_method.to_string(),
            timestamp: "2026-01-01T00:00:00+00:00".to_string(),
            status,
            risk_score: RiskScore::new(risk_score)?,
            is_fraud
        }).await?;
    }

    Ok(ledger)
}

#[test]
fn test_feature_helpers() {
    assert_eq!(account_prefix("1234567890123456"), 1234);
    assert_eq!(account_prefix("12"), 12);
    assert_eq!(account_prefix("ab12"), 0);
    assert_eq!(method_id("vmb_transfer"), 1);
    assert_eq!(method_id("digital_wallet"), 4);
    assert_eq!(method_id("Crypto"), 0);
}

#[tokio::test]
async fn test_ledger_export_writes_every_column() -> Result<()> {
    let ledger = create_ledger_with_transactions().await?;
    let mut output = Vec::new();

    let written = export_transactions(&ledger, ExportFormat::Ledger, &mut output).await?;
    let text = String::from_utf8(output)?;
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(written, 2);
    assert_eq!(lines[0], "id,account_number,amount,payment_method,timestamp,status,risk_score,is_fraud");
    assert_eq!(lines[1], "1,1234567890123456,25.5,card_payment,2026-01-01T00:00:00+00:00,Approved,0.1,0");
    assert_eq!(lines[2], "2,9876543210987654,10.0,gift_card,2026-01-01T00:00:00+00:00,Flagged,0.6,1");
    assert_eq!(lines.len(), 3);

    Ok(())
}

#[tokio::test]
async fn test_training_export_writes_feature_rows() -> Result<()> {
    let ledger = create_ledger_with_transactions().await?;
    let mut output = Vec::new();

    export_transactions(&ledger, ExportFormat::Training, &mut output).await?;
    let text = String::from_utf8(output)?;
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "account_prefix,amount,method_id,risk_score,is_fraud");
    assert_eq!(lines[1], "1234,25.5,2,0.1,0");
    assert_eq!(lines[2], "9876,10.0,0,0.6,1");

    Ok(())
}
