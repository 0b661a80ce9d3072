//! PDF text extraction backed by `lopdf`.
//!
//! Only the first few pages are read: title and author almost always sit on the cover page,
//! and the model prompt is truncated anyway.

use async_trait::async_trait;
use lopdf::Document;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::contract::{Extraction, TextExtractor};
use crate::error::ExtractionError;

pub struct PdfTextExtractor {
    max_pages: usize,
}

impl PdfTextExtractor {
    pub fn new(max_pages: usize) -> Self {
        Self {
            max_pages: max_pages.max(1),
        }
    }

    /// Blocking extraction; the trait impl runs this on a blocking worker.
    pub fn extract_blocking(&self, path: &Path) -> Result<Extraction, ExtractionError> {
        debug!(path = %path.display(), "Opening PDF");
        let bytes = std::fs::read(path).map_err(|source| ExtractionError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let doc = match Document::load_mem(&bytes) {
            Ok(doc) => doc,
            Err(e) if mentions_encryption(&e.to_string()) => {
                info!(path = %path.display(), "PDF refused to load without a password");
                return Ok(Extraction::encrypted());
            }
            Err(e) => return Err(ExtractionError::Parse(e.to_string())),
        };

        if doc.is_encrypted() {
            info!(path = %path.display(), "PDF is encrypted, skipping text extraction");
            return Ok(Extraction::encrypted());
        }

        let pages: Vec<u32> = doc.get_pages().keys().copied().take(self.max_pages).collect();
        if pages.is_empty() {
            return Err(ExtractionError::EmptyDocument);
        }

        let mut text = String::new();
        for page in &pages {
            match doc.extract_text(&[*page]) {
                Ok(page_text) if !page_text.trim().is_empty() => {
                    text.push_str(page_text.trim());
                    text.push('\n');
                }
                Ok(_) => debug!(page, "Page has no extractable text"),
                // A single unreadable page should not sink the cover page next to it.
                Err(e) => warn!(page, error = %e, "Failed to extract text from page"),
            }
        }

        let text = text.trim().to_string();
        info!(
            path = %path.display(),
            pages = pages.len(),
            chars = text.chars().count(),
            "Extracted text from PDF"
        );
        Ok(Extraction::text(text))
    }
}

impl Default for PdfTextExtractor {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MAX_PAGES)
    }
}

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract(&self, path: &Path) -> Result<Extraction, ExtractionError> {
        let path: PathBuf = path.to_path_buf();
        let extractor = Self::new(self.max_pages);
        tokio::task::spawn_blocking(move || extractor.extract_blocking(&path))
            .await
            .map_err(|e| ExtractionError::Text(e.to_string()))?
    }
}

fn mentions_encryption(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("encrypt") || lower.contains("decrypt") || lower.contains("password")
}
