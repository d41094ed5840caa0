//! # Storage Errors

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("rule system '{0}' is not registered with this store")]
    RuleSystemNotFound(String),
    #[error("rule {0} not found")]
    RuleNotFound(u64),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("{0}")]
    Other(String),
}

pub type StorageResult<T> = Result<T, StorageError>;
