use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ValueError {
    #[error("Account number must not be empty")]
    EmptyAccountNumber,
    #[error("Account number [{0}] must contain only digits")]
    NonDigitAccountNumber(String),
    #[error("Amount [{0}] must be a finite number greater than zero")]
    InvalidAmount(f64),
    #[error("Risk score [{0}] must be within 0.0 and 1.0")]
    RiskScoreOutOfRange(f64),
    #[error("Value [{value}] is not a number: {reason}")]
    NotANumber {
        value: String,
        reason: String
    }
}
