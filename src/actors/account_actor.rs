use std::sync::Arc;

use tokio::spawn;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, warn};

use crate::engine::BatchSummary;
use crate::gateway::PaymentGateway;
use crate::models::PaymentRequest;
use crate::storage::LedgerStore;
use crate::types::AccountNumber;

/// Serialises the payments of one account so each sees the balance left by the previous one.
pub struct AccountActor {
    sender: mpsc::UnboundedSender<PaymentRequest>,
    handle: JoinHandle<()>
}

impl AccountActor {
    /// Spawns a new actor for the account and returns its handle.
    pub fn new<S: LedgerStore>(account_number: AccountNumber, gateway: Arc<PaymentGateway<S>>, summary: Arc<BatchSummary>) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<PaymentRequest>();

        let handle = spawn(async move {
            while let Some(request) = receiver.recv().await {
                match gateway.process(&request).await {
                    Ok(outcome) => {
                        debug!("Payment of [{}] for account [{account_number}] processed: {outcome}", request.amount);
                        summary.record(&outcome);
                    },
                    Err(error) => {
                        //NOTE: A failed payment must not stall the rest of the account's queue
                        warn!("{error}");
                        summary.reject();
                    }
                }
            }
        });

        Self { sender, handle }
    }

    /// Queues a payment. Returns `false` if the actor has already stopped.
    pub fn accept(&self, request: &PaymentRequest) -> bool {
        self.sender.send(request.clone()).is_ok()
    }

    /// Closes the queue and waits for every queued payment to be processed.
    pub async fn despawn(self) -> Result<(), JoinError> {
        drop(self.sender);
        self.handle.await
    }
}
