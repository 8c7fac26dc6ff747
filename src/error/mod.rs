use crate::storage::StorageError;
use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("portal state is already mounted")]
    AlreadyMounted,
    #[error(transparent)]
    Storage(#[from] StorageError),
}
