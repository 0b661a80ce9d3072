//! Error kinds raised by the individual pipeline stages.
//!
//! Every per-file error is caught by the driver in [`crate::rename`] and folded into a
//! [`crate::rename::FileStatus`]; only [`RunError`] escapes a run.

use std::path::PathBuf;
use thiserror::Error;

/// The PDF could not be opened or its text could not be read.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse PDF: {0}")]
    Parse(String),

    #[error("PDF document has no pages")]
    EmptyDocument,

    #[error("text extraction failed: {0}")]
    Text(String),
}

/// The inference endpoint could not produce an answer.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("inference request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("inference endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed inference response: {0}")]
    Malformed(String),
}

/// The filesystem rename could not be applied.
#[derive(Debug, Error)]
pub enum RenameError {
    #[error("target {0} already exists")]
    TargetExists(PathBuf),

    #[error("failed to rename {from} to {to}: {source}")]
    Io {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Conditions that abort a whole run rather than a single file.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("{0} is not a valid directory")]
    NotADirectory(PathBuf),

    #[error("failed to list {path}: {source}")]
    Listing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
