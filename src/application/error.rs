use thiserror::Error;

use crate::domain::ValidationError;
use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AppError {
    /// Validation failures are recoverable: nothing was written and the
    /// caller can ask again. Storage failures are not.
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}
