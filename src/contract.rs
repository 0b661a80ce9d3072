//! # contract: capability interfaces for the renaming pipeline
//!
//! The driver in [`crate::rename`] talks to the outside world through two traits:
//!
//! - [`TextExtractor`] opens a PDF and yields the text of its first pages, or reports that the
//!   document is encrypted.
//! - [`MetadataInferrer`] turns that text into an optional author and title, usually by asking
//!   a language model.
//!
//! Concrete implementations live in [`crate::extract`] and [`crate::infer`]. Both traits are
//! annotated for `mockall`, so tests can drive the pipeline without real PDFs or a model server.

use async_trait::async_trait;
use mockall::automock;
use std::path::Path;

use crate::error::{ExtractionError, InferenceError};

/// What a [`TextExtractor`] found inside a PDF.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Extraction {
    pub is_encrypted: bool,
    /// Text of the leading pages. Always empty when `is_encrypted` is set.
    pub text: String,
}

impl Extraction {
    pub fn encrypted() -> Self {
        Self {
            is_encrypted: true,
            text: String::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            is_encrypted: false,
            text: text.into(),
        }
    }
}

/// Author and title as answered by the model. Either may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InferenceResult {
    pub author: Option<String>,
    pub title: Option<String>,
}

impl InferenceResult {
    pub fn is_empty(&self) -> bool {
        self.author.is_none() && self.title.is_none()
    }
}

/// Reads the text needed to identify a document.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Open `path` and return its leading text, or flag it as encrypted without decrypting.
    async fn extract(&self, path: &Path) -> Result<Extraction, ExtractionError>;
}

/// Identifies author and title from document text.
///
/// One call per file, no retries. A field the model cannot determine is `None`, not an error;
/// an unreachable or failing endpoint is an [`InferenceError`].
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait MetadataInferrer: Send + Sync {
    async fn infer(&self, text: &str) -> Result<InferenceResult, InferenceError>;
}
