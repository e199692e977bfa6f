mod account_number;
mod amount;
mod errors;
mod risk_score;

pub use account_number::AccountNumber;
pub use amount::Amount;
pub use errors::ValueError;
pub use risk_score::RiskScore;

pub type AccountId = i64;
pub type TransactionId = i64;
