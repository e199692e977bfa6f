mod actors;
mod config;
mod engine;
mod export;
mod gateway;
mod models;
mod review;
mod storage;
mod types;

use std::io::{stderr, stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::config::{GatewayConfig, DEFAULT_CONFIG_PATH};
use crate::engine::BatchEngine;
use crate::export::{export_transactions, ExportFormat};
use crate::gateway::PaymentGateway;
use crate::models::{NewAccount, PaymentRequest};
use crate::review::{ReviewReport, DEFAULT_HIGH_RISK_LIMIT};
use crate::storage::{LedgerStore, SqliteLedger};
use crate::types::{AccountNumber, Amount, RiskScore, TransactionId};

/// Payment gateway ledger with risk-based approval and banker review.
#[derive(Debug, Parser)]
#[command(name = "vmb-gateway", version)]
struct Cli {
    /// TOML configuration file, ignored when missing.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Database URL, overrides the configured one.
    #[arg(long, global = true, env = "VMB_DATABASE_URL")]
    database: Option<String>,

    /// Available log levels: error, warn, info, debug, trace.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the schema and insert the seed accounts.
    Init,
    /// Onboard a new account.
    Open {
        account_number: AccountNumber,
        customer_name: String,
        balance: f64
    },
    /// Process a single scored payment.
    Pay {
        account_number: AccountNumber,
        amount: Amount,
        payment_method: String,
        risk_score: RiskScore
    },
    /// Process a CSV file of scored payments (account_number,amount,payment_method,risk_score).
    Batch {
        path: PathBuf
    },
    /// Print the banker review report.
    Review {
        /// Number of highest-risk transactions to list.
        #[arg(long, default_value_t = DEFAULT_HIGH_RISK_LIMIT)]
        limit: u64
    },
    /// Mark a logged transaction as fraudulent (or clear the mark).
    Label {
        transaction_id: TransactionId,
        #[arg(long)]
        clear: bool
    },
    /// Write all logged transactions to stdout as CSV.
    Export {
        /// Emit model training features instead of raw rows.
        #[arg(long)]
        training: bool
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = GatewayConfig::load_from_path(&cli.config)?;

    if let Some(url) = cli.database {
        config.database.url = url;
    }

    let log_level = cli.log_level.as_deref().unwrap_or(config.logging.level.as_str());
    setup_logging(parse_log_level(log_level));

    let ledger = Arc::new(SqliteLedger::connect(&config.database).await?);

    if !matches!(cli.command, Command::Init) {
        ledger.create_schema().await?;
    }

    let gateway = Arc::new(PaymentGateway::new(ledger.clone(), config.risk));
    let mut output = BufWriter::new(stdout().lock());

    match cli.command {
        Command::Init => {
            ledger.initialize().await?;
            writeln!(output, "Database initialized with {} account(s).", ledger.count_accounts().await?)?;
        },
        Command::Open { account_number, customer_name, balance } => {
            let account = NewAccount::new(account_number, &customer_name, balance)?;
            let account_id = gateway.open_account(&account).await?;
            writeln!(output, "Opened account [{}] with id [{account_id}].", account.account_number)?;
        },
        Command::Pay { account_number, amount, payment_method, risk_score } => {
            let request = PaymentRequest { account_number, amount, payment_method, risk_score };
            let outcome = gateway.process(&request).await?;

            if let Some(transaction_id) = outcome.transaction_id() {
                info!("Payment logged as transaction [{transaction_id}]");
            }

            writeln!(output, "{outcome}")?;
        },
        Command::Batch { path } => {
            let engine = BatchEngine::new(gateway.clone(), config.batch.backpressure);

            let timer = Instant::now();
            let report = engine.run(&path).await?;
            let duration = timer.elapsed();

            info!("Processed payments in: {duration:?}");
            writeln!(output, "{report}")?;
        },
        Command::Review { limit } => {
            let report = ReviewReport::load(gateway.store(), limit).await?;
            report.write_to(&mut output)?;
        },
        Command::Label { transaction_id, clear } => {
            let transaction = gateway.label(transaction_id, !clear).await?;
            writeln!(output, "Transaction [{}] is_fraud={}.", transaction.id, transaction.is_fraud)?;
        },
        Command::Export { training } => {
            let format = if training { ExportFormat::Training } else { ExportFormat::Ledger };
            export_transactions(gateway.store(), format, &mut output).await?;
        }
    }

    output.flush()?;

    Ok(())
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'error'", level);
            LevelFilter::ERROR
        }
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: Reports and exports go to stdout, so logging has to use stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}
