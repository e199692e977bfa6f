use std::fmt;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::models::{PaymentOutcome, TransactionStatus};

/// Running tally shared by the reader and all account actors of a batch.
#[derive(Debug, Default)]
pub struct BatchSummary {
    approved: AtomicU64,
    flagged: AtomicU64,
    denied: AtomicU64,
    rejected: AtomicU64
}

impl BatchSummary {
    pub fn record(&self, outcome: &PaymentOutcome) {
        let counter = match outcome.status() {
            TransactionStatus::Approved => &self.approved,
            TransactionStatus::Flagged => &self.flagged,
            TransactionStatus::Denied => &self.denied
        };

        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a row that never reached a decision (malformed input or a failed request).
    pub fn reject(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn report(&self) -> BatchReport {
        BatchReport {
            approved: self.approved.load(Ordering::Relaxed),
            flagged: self.flagged.load(Ordering::Relaxed),
            denied: self.denied.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct BatchReport {
    pub approved: u64,
    pub flagged: u64,
    pub denied: u64,
    pub rejected: u64
}

impl BatchReport {
    pub fn total(&self) -> u64 {
        self.approved + self.flagged + self.denied + self.rejected
    }
}

impl Display for BatchReport {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "processed={},approved={},flagged={},denied={},rejected={}",
            self.total(),
            self.approved,
            self.flagged,
            self.denied,
            self.rejected
        )
    }
}
