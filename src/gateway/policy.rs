use serde::Deserialize;

use crate::models::TransactionStatus;
use crate::types::RiskScore;

/// Risk score cut-offs applied to every incoming payment.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RiskPolicy {
    /// Scores at or above this are denied outright.
    pub deny_threshold: f64,
    /// Scores at or above this (and below the deny threshold) are held for banker review.
    pub flag_threshold: f64
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            deny_threshold: 0.8,
            flag_threshold: 0.4
        }
    }
}

impl RiskPolicy {
    pub fn classify(&self, risk_score: RiskScore) -> TransactionStatus {
        let score = risk_score.value();

        if score >= self.deny_threshold {
            TransactionStatus::Denied
        } else if score >= self.flag_threshold {
            TransactionStatus::Flagged
        } else {
            TransactionStatus::Approved
        }
    }
}
