// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Storage-layer error type. `kiln-driver` only ever sees this converted
//! into `kiln_core::StoreFailure` at the trait boundary (§3.1).

use kiln_core::StoreFailure;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot corrupted: {0}")]
    Corrupt(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for StoreFailure {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Corrupt(msg) => StoreFailure::Corrupt(msg),
            other => StoreFailure::Io(other.to_string()),
        }
    }
}
