use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Client or address missing.")]
    ClientOrAddressMissing,
    #[error("Invalid address format")]
    InvalidAddressFormat,
    #[error("A submission is already in progress")]
    SubmissionInFlight,
    #[error("Unknown field: {0}")]
    UnknownField(String),
    #[error("Line item {0} not found")]
    ItemNotFound(usize),
    #[error("Chain write failed: {0}")]
    ChainWrite(String),
}
