use thiserror::Error;

use crate::models::RequestError;
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Rejected request: {0}")]
    Request(#[from] RequestError),
    #[error(transparent)]
    Storage(#[from] StorageError)
}
