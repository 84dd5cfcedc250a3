use notary_store::StoreError;
use notary_types::ValidationError;

/// Errors produced by ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// Result alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
