use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("not connected; connect an identity first")]
    NotConnected,

    #[error("no file selected")]
    NoFileSelected,

    #[error("record not found: {0}")]
    RecordNotFound(String),

    #[error("invalid input: {0}")]
    Validation(#[from] notary_types::ValidationError),

    #[error("digest error: {0}")]
    Digest(#[from] notary_crypto::DigestError),

    #[error("ledger error: {0}")]
    Ledger(#[from] notary_ledger::LedgerError),

    #[error("store error: {0}")]
    Store(#[from] notary_store::StoreError),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type SdkResult<T> = Result<T, SdkError>;
