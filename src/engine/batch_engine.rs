use crate::actors::AccountActor;
use crate::engine::{BatchReport, BatchSummary};
use crate::gateway::PaymentGateway;
use crate::models::PaymentRequest;
use crate::storage::LedgerStore;
use crate::types::AccountNumber;
use anyhow::Context;
use csv::{ReaderBuilder, Trim};
use futures::future::join_all;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{spawn_blocking, JoinHandle};
use tracing::{error, info, warn};

/// Feeds a CSV file of scored payment requests through the gateway.
pub struct BatchEngine<S: LedgerStore> {
    gateway: Arc<PaymentGateway<S>>,
    backpressure: usize
}

impl<S: LedgerStore> BatchEngine<S> {
    pub fn new(gateway: Arc<PaymentGateway<S>>, backpressure: usize) -> Self {
        Self {
            gateway,
            backpressure: backpressure.max(1)
        }
    }

    /// Orchestrates the end-to-end processing of a batch file.
    ///
    /// Malformed rows are logged and counted as rejected; only an unreadable
    /// file fails the batch as a whole.
    pub async fn run(&self, path: &Path) -> anyhow::Result<BatchReport> {
        let summary = Arc::new(BatchSummary::default());
        let (sender, receiver) = mpsc::channel::<PaymentRequest>(self.backpressure);
        let csv_handle = Self::spawn_csv_reader(path.to_path_buf(), sender, summary.clone());
        let processing_result = self.process_payments(receiver, summary.clone()).await;

        csv_handle.await.context("CSV reader task panicked")??;
        processing_result?;

        let report = summary.report();
        info!("Batch [{}] finished: {report}", path.display());

        Ok(report)
    }

    fn spawn_csv_reader(path: PathBuf, sender: mpsc::Sender<PaymentRequest>, summary: Arc<BatchSummary>) -> JoinHandle<anyhow::Result<()>> {
        spawn_blocking(move || {
            let file = File::open(&path)
                .with_context(|| format!("Error opening CSV at path: {}", path.display()))?;

            let mut reader = ReaderBuilder::new()
                .trim(Trim::All)
                .flexible(true)
                .from_reader(BufReader::new(file));

            for result in reader.deserialize::<PaymentRequest>() {
                match result {
                    Ok(request) => {
                        if sender.blocking_send(request).is_err() {
                            break;
                        }
                    }
                    Err(error) => {
                        warn!("CSV deserialization error: {error}");
                        summary.reject();
                    }
                }
            }

            Ok(())
        })
    }

    async fn process_payments(&self, mut receiver: mpsc::Receiver<PaymentRequest>, summary: Arc<BatchSummary>) -> anyhow::Result<()> {
        let mut actors = HashMap::<AccountNumber, AccountActor>::new();

        //NOTE: One actor per account keeps that account's payments in file order while different accounts proceed independently
        while let Some(request) = receiver.recv().await {
            let actor = actors.entry(request.account_number.clone()).or_insert_with(|| {
                AccountActor::new(request.account_number.clone(), self.gateway.clone(), summary.clone())
            });

            if !actor.accept(&request) {
                error!("Account actor for [{}] could not accept payment of [{}]", request.account_number, request.amount);
                summary.reject();
            }
        }

        let despawns = actors.into_values().map(|actor| actor.despawn());

        for result in join_all(despawns).await {
            if let Err(error) = result {
                error!("An account actor did not despawn gracefully: {error:?}");
            }
        }

        Ok(())
    }
}
