use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::gateway::{GatewayError, RiskPolicy};
use crate::models::{DenialReason, NewAccount, NewTransaction, PaymentOutcome, PaymentRequest, Transaction, TransactionStatus};
use crate::storage::{LedgerStore, StorageError};
use crate::types::{AccountId, TransactionId};

/// Turns scored payment requests into ledger decisions.
pub struct PaymentGateway<S: LedgerStore> {
    store: Arc<S>,
    policy: RiskPolicy
}

impl<S: LedgerStore> PaymentGateway<S> {
    pub fn new(store: Arc<S>, policy: RiskPolicy) -> Self {
        Self { store, policy }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Decides a payment and, when it is approved or flagged, logs it to the ledger.
    ///
    /// Approved payments debit the account. Flagged payments are logged but held,
    /// so the balance stays untouched until a banker acts on them. Denied payments
    /// leave no trace in the ledger.
    ///
    /// # Errors
    /// Returns `GatewayError` for malformed requests or database failures. Business
    /// denials (high risk, unknown account, insufficient funds) are returned as
    /// `PaymentOutcome::Denied`.
    pub async fn process(&self, request: &PaymentRequest) -> Result<PaymentOutcome, GatewayError> {
        request.validate()?;

        let risk_score = request.risk_score;
        let status = self.policy.classify(risk_score);

        debug!("Payment of [{}] on account [{}] classified as [{status}] with risk [{risk_score}]", request.amount, request.account_number);

        if status == TransactionStatus::Denied {
            let reason = match self.store.find_account(&request.account_number).await? {
                Some(_) => DenialReason::HighRisk(risk_score),
                None => DenialReason::UnknownAccount
            };

            info!("Payment on account [{}] denied: {reason}", request.account_number);

            return Ok(PaymentOutcome::Denied { reason, risk_score });
        }

        let transaction = NewTransaction::from_request(request, status, Utc::now().to_rfc3339());
        let debit = status == TransactionStatus::Approved;

        let transaction_id = match self.store.record_payment(&transaction, debit).await {
            Ok(transaction_id) => transaction_id,
            Err(StorageError::AccountNotFound { account_number }) => {
                info!("Payment denied, account [{account_number}] does not exist");
                return Ok(PaymentOutcome::Denied { reason: DenialReason::UnknownAccount, risk_score });
            }
            Err(StorageError::InsufficientFunds { account_number, balance, requested }) => {
                info!("Payment denied, account [{account_number}] holds [{balance:.2}] but [{requested:.2}] was requested");
                return Ok(PaymentOutcome::Denied { reason: DenialReason::InsufficientFunds, risk_score });
            }
            Err(error) => return Err(error.into())
        };

        if status == TransactionStatus::Flagged {
            warn!("Transaction [{transaction_id}] flagged with risk [{risk_score}], requires banker review");
        }

        Ok(PaymentOutcome::Accepted { status, transaction_id, risk_score })
    }

    pub async fn open_account(&self, account: &NewAccount) -> Result<AccountId, GatewayError> {
        let account_id = self.store.open_account(account).await?;

        info!("Opened account [{}] for [{}]", account.account_number, account.customer_name);

        Ok(account_id)
    }

    /// Back-fills the ground-truth fraud label of a logged transaction.
    pub async fn label(&self, transaction_id: TransactionId, is_fraud: bool) -> Result<Transaction, GatewayError> {
        self.store.set_fraud_label(transaction_id, is_fraud).await?;

        let transaction = self.store.find_transaction(transaction_id).await?
            .ok_or(StorageError::TransactionNotFound { transaction_id })?;

        info!("Transaction [{transaction_id}] labelled is_fraud={is_fraud}");

        Ok(transaction)
    }
}
