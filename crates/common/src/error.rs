//! Error types for nmapreport
//!
//! Every failure is fatal for the binary, so variants carry enough text
//! to be logged once and exit.

use thiserror::Error;
use std::io;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Fingerprint error: {0}")]
    Fingerprint(String),

    #[error("Format error: {0}")]
    Format(String),
}

/// Result type alias for nmapreport operations
pub type ReportResult<T> = Result<T, ReportError>;
