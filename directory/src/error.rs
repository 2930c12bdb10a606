use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("unknown employee id: {0}")]
    NotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}
