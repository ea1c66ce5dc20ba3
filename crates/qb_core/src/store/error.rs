use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] rmp_serde::encode::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] rmp_serde::decode::Error),

    #[error("Decompression error")]
    Decompression,

    #[error("Corrupted data")]
    Corrupted,

    #[error("Checksum mismatch")]
    ChecksumMismatch,

    #[error("Format version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("Stale revision: store holds {current}, commit carried {committed}")]
    StaleRevision { current: u64, committed: u64 },

    #[error("No sheet stored for match {match_id}")]
    SheetNotFound { match_id: u64 },

    #[error("Inconsistent sheet rejected: {0}")]
    InvariantViolation(String),
}

impl StoreError {
    pub fn is_recoverable(&self) -> bool {
        match self {
            StoreError::Io(_) => true,
            StoreError::SheetNotFound { .. } => true,
            StoreError::StaleRevision { .. } => true,
            StoreError::Corrupted => false,
            StoreError::ChecksumMismatch => false,
            StoreError::VersionMismatch { .. } => false,
            _ => false,
        }
    }
}
