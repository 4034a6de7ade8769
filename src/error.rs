// src/error.rs
//! Errors that reach callers of the digest library.
//!
//! Only configuration problems are fatal. Missing local resources, failing feed
//! URLs and backend misses are absorbed where they happen (logged and counted)
//! and never show up here.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DigestError {
    /// The configuration file exists but could not be read or parsed.
    #[error("invalid configuration in {}: {reason}", path.display())]
    Configuration { path: PathBuf, reason: String },
}

impl DigestError {
    pub(crate) fn configuration(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        DigestError::Configuration {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T, E = DigestError> = std::result::Result<T, E>;
