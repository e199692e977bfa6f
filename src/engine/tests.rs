use super::{BatchEngine, BatchReport};

use anyhow::{anyhow, Result};
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use tempfile::NamedTempFile;

use crate::config::DatabaseConfig;
use crate::gateway::{PaymentGateway, RiskPolicy};
use crate::models::NewAccount;
use crate::storage::{LedgerStore, SqliteLedger};
use crate::types::AccountNumber;

const ALICE: &str = "1234567890123456";
const BOB: &str = "9876543210987654";

fn create_temporary_csv(payments: &[(&str, &str, &str, &str)]) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;

    writeln!(file, "account_number,amount,payment_method,risk_score")?;

    for (account_number, amount, payment_method, risk_score) in payments {
        writeln!(file, "{},{},{},{}", account_number, amount, payment_method, risk_score)?;
    }

    file.flush()?;

    Ok(file)
}

async fn create_engine() -> Result<(BatchEngine<SqliteLedger>, Arc<PaymentGateway<SqliteLedger>>)> {
    let ledger = SqliteLedger::connect(&DatabaseConfig::in_memory()).await?;
    ledger.initialize().await?;

    let gateway = Arc::new(PaymentGateway::new(Arc::new(ledger), RiskPolicy::default()));

    Ok((BatchEngine::new(gateway.clone(), 4), gateway))
}

async fn balance_of(gateway: &PaymentGateway<SqliteLedger>, account_number: &str) -> Result<f64> {
    let account = gateway.store().find_account(&AccountNumber::from_str(account_number)?).await?
        .ok_or_else(|| anyhow!("Account {account_number} missing"))?;

    Ok(account.current_balance)
}

#[tokio::test]
async fn test_engine_processes_valid_csv_stream_successfully() -> Result<()> {
    let file = create_temporary_csv(&[
        (ALICE, "100.0", "vmb_transfer", "0.1"),
        (BOB, "50.5", "card_payment", "0.2"),
        (ALICE, "200.0", "crypto", "0.5"),
        (BOB, "10.0", "digital_wallet", "0.9"),
    ])?;

    let (engine, gateway) = create_engine().await?;
    let report = engine.run(file.path()).await?;

    assert_eq!(report, BatchReport { approved: 2, flagged: 1, denied: 1, rejected: 0 });
    assert_eq!(balance_of(&gateway, ALICE).await?, 4900.0);
    assert_eq!(balance_of(&gateway, BOB).await?, 100.0);
    assert_eq!(gateway.store().transactions().await?.len(), 3);

    Ok(())
}

#[tokio::test]
async fn test_engine_gracefully_skips_malformed_csv_input() -> Result<()> {
    let file = create_temporary_csv(&[
        (ALICE, "10.0", "vmb_transfer", "0.1"),
        ("not-a-number", "10.0", "vmb_transfer", "0.1"),
        (ALICE, "-5.0", "vmb_transfer", "0.1"),
        (ALICE, "5.0", "vmb_transfer", "1.7"),
        (ALICE, "5.0", "vmb_transfer", "0.1"),
    ])?;

    let (engine, gateway) = create_engine().await?;
    let report = engine.run(file.path()).await?;

    assert_eq!(report.approved, 2);
    assert_eq!(report.rejected, 3);
    assert_eq!(balance_of(&gateway, ALICE).await?, 4985.0);

    Ok(())
}

#[tokio::test]
async fn test_engine_keeps_per_account_order() -> Result<()> {
    let file = create_temporary_csv(&[
        (BOB, "150.0", "vmb_transfer", "0.1"),
        (ALICE, "1.0", "vmb_transfer", "0.1"),
        (BOB, "1.0", "vmb_transfer", "0.1"),
        (BOB, "0.5", "vmb_transfer", "0.1"),
    ])?;

    let (engine, gateway) = create_engine().await?;
    let report = engine.run(file.path()).await?;

    assert_eq!(report.approved, 3);
    assert_eq!(report.denied, 1);
    assert_eq!(balance_of(&gateway, BOB).await?, 0.0);

    Ok(())
}

#[tokio::test]
async fn test_engine_fails_for_missing_file() -> Result<()> {
    let (engine, _) = create_engine().await?;

    assert!(engine.run(Path::new("does/not/exist.csv")).await.is_err());

    Ok(())
}

#[tokio::test]
async fn test_engine_settles_every_payment_on_a_shared_file_database() -> Result<()> {
    let directory = tempfile::tempdir()?;
    let config = DatabaseConfig {
        url: format!("sqlite://{}", directory.path().join("ledger.db").display()),
        max_connections: 8,
        ..DatabaseConfig::default()
    };

    let ledger = SqliteLedger::connect(&config).await?;
    ledger.initialize().await?;

    let gateway = Arc::new(PaymentGateway::new(Arc::new(ledger), RiskPolicy::default()));
    let account_numbers: Vec<String> = (0..16).map(|index| format!("{:016}", 5000 + index)).collect();

    for account_number in &account_numbers {
        let account = NewAccount::new(AccountNumber::from_str(account_number)?, "Load Test", 100.0)?;
        gateway.open_account(&account).await?;
    }

    let mut payments = Vec::new();

    for _ in 0..20 {
        for account_number in &account_numbers {
            payments.push((account_number.as_str(), "1.0", "vmb_transfer", "0.1"));
        }
    }

    let file = create_temporary_csv(&payments)?;
    let report = BatchEngine::new(gateway.clone(), 64).run(file.path()).await?;

    assert_eq!(report, BatchReport { approved: 320, flagged: 0, denied: 0, rejected: 0 });

    for account_number in &account_numbers {
        assert_eq!(balance_of(&gateway, account_number).await?, 80.0);
    }

    Ok(())
}
