use thiserror::Error;

use crate::domain::{AmountOverflow, RecordId, ValidationError};
use crate::storage::StoreError;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: RecordId },

    #[error("Store unavailable: {0:#}")]
    StoreUnavailable(anyhow::Error),

    /// Stored rows are individually valid but a derived amount does not fit.
    #[error("Amount out of range: {0}")]
    Overflow(#[from] AmountOverflow),
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => LedgerError::NotFound { entity, id },
            StoreError::Unavailable(source) => LedgerError::StoreUnavailable(source),
        }
    }
}

impl LedgerError {
    /// The validation failure, if that is what this is.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            LedgerError::Validation(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LedgerError::NotFound { .. })
    }
}
