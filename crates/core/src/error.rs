use crate::store::StoreError;
use crate::types::ReleaseId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} with id {id} not found")]
    NotFound {
        entity: &'static str,
        id: ReleaseId,
    },

    #[error("Release name already exists: {0}")]
    DuplicateName(String),

    #[error("Unknown status: {0}")]
    UnknownStatus(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateName(name) => CoreError::DuplicateName(name),
            StoreError::Backend(source) => CoreError::Store(source.to_string()),
        }
    }
}
