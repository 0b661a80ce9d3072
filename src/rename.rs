//! Renaming driver: lists the PDFs of a folder and walks each one through
//! extract → infer → build name → rename, one file at a time.
//!
//! # Per-file states
//! `Pending → Extracting → (Encrypted | ExtractError | Extracted) → Inferring →
//! (InferError | Inferred) → Building → (KeptOriginal | Named) → Renaming →
//! (RenameError | Renamed)`.
//!
//! Every error is caught at the per-file boundary and recorded in the file's [`FileRecord`];
//! only an unusable folder aborts a run. A file reaching [`FileStatus::Renamed`] causes exactly
//! one filesystem rename, every other outcome leaves the folder untouched.

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::contract::{MetadataInferrer, TextExtractor};
use crate::error::{RenameError, RunError};
use crate::naming::{self, BuiltName, UsedNames};
use crate::report::Reporter;

/// Terminal outcome of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Renamed,
    KeptOriginal,
    Encrypted,
    Error,
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FileStatus::Renamed => "Renamed",
            FileStatus::KeptOriginal => "Kept original",
            FileStatus::Encrypted => "Encrypted",
            FileStatus::Error => "Error",
        };
        f.write_str(label)
    }
}

/// Everything learned about one discovered PDF during a run.
///
/// `new_name` is set if and only if `status` is [`FileStatus::Renamed`]. Encrypted and failed
/// files carry no extracted fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub original_path: PathBuf,
    pub original_name: String,
    pub extracted_author: Option<String>,
    pub extracted_title: Option<String>,
    pub new_name: Option<String>,
    pub status: FileStatus,
    /// Why the file ended in [`FileStatus::Error`], for logs.
    pub error: Option<String>,
}

impl FileRecord {
    pub fn new(original_path: PathBuf) -> Self {
        let original_name = original_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            original_path,
            original_name,
            extracted_author: None,
            extracted_title: None,
            new_name: None,
            status: FileStatus::KeptOriginal,
            error: None,
        }
    }

    /// The name the file carries after the run.
    pub fn display_name(&self) -> &str {
        self.new_name.as_deref().unwrap_or(&self.original_name)
    }

    fn fail(&mut self, message: String) {
        self.extracted_author = None;
        self.extracted_title = None;
        self.new_name = None;
        self.status = FileStatus::Error;
        self.error = Some(message);
    }
}

/// Non-recursive listing of `folder`: the PDF files to process, sorted by name, and every
/// entry name already present (the starting set of taken names).
pub fn list_pdfs(folder: &Path) -> Result<(Vec<PathBuf>, UsedNames), RunError> {
    if !folder.is_dir() {
        return Err(RunError::NotADirectory(folder.to_path_buf()));
    }
    let listing_err = |source| RunError::Listing {
        path: folder.to_path_buf(),
        source,
    };

    let entries = std::fs::read_dir(folder)
        .map_err(listing_err)?
        .map(|entry| entry.map(|e| e.path()));
    let (pdfs, used) = collect_listing(entries);
    info!(folder = %folder.display(), count = pdfs.len(), "Discovered PDF files");
    Ok((pdfs, used))
}

/// Splits a directory listing into PDF files and taken names. Entries that cannot be read are
/// skipped.
fn collect_listing<I>(entries: I) -> (Vec<PathBuf>, UsedNames)
where
    I: IntoIterator<Item = std::io::Result<PathBuf>>,
{
    let mut pdfs = Vec::new();
    let mut used = UsedNames::new();
    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable directory entry");
                continue;
            }
        };
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        used.claim(&name);

        if path.is_file() && naming::has_pdf_extension(&name) {
            pdfs.push(path);
        } else {
            debug!(entry = %name, "Skipping non-PDF entry");
        }
    }
    pdfs.sort();
    (pdfs, used)
}

/// Processes every PDF in `folder`, feeding each completed record to `reporter`.
pub async fn rename_folder<E, I>(
    folder: &Path,
    extractor: &E,
    inferrer: &I,
    reporter: &mut Reporter,
) -> Result<(), RunError>
where
    E: TextExtractor + ?Sized,
    I: MetadataInferrer + ?Sized,
{
    let (pdfs, mut used) = list_pdfs(folder)?;
    reporter.start(pdfs.len());

    for path in pdfs {
        let record = FileRecord::new(path);
        reporter.processing(&record.original_name);
        let record = process_file(record, extractor, inferrer, &mut used).await;
        reporter.record(record);
    }
    Ok(())
}

/// Walks one file through the pipeline. Never fails: the outcome is in the returned record.
///
/// `used` holds the names taken in the folder. The file's own name is released while its new
/// name is chosen, so a file that already carries the right name keeps it.
pub async fn process_file<E, I>(
    mut record: FileRecord,
    extractor: &E,
    inferrer: &I,
    used: &mut UsedNames,
) -> FileRecord
where
    E: TextExtractor + ?Sized,
    I: MetadataInferrer + ?Sized,
{
    let file = record.original_name.clone();
    info!(file = %file, "Processing PDF");

    let extraction = match extractor.extract(&record.original_path).await {
        Ok(extraction) => extraction,
        Err(e) => {
            warn!(file = %file, error = %e, "Text extraction failed");
            record.fail(e.to_string());
            return record;
        }
    };
    if extraction.is_encrypted {
        info!(file = %file, "PDF is encrypted, leaving it alone");
        record.status = FileStatus::Encrypted;
        return record;
    }

    let inferred = match inferrer.infer(&extraction.text).await {
        Ok(inferred) => inferred,
        Err(e) => {
            warn!(file = %file, error = %e, "Metadata inference failed");
            record.fail(e.to_string());
            return record;
        }
    };
    record.extracted_author = inferred.author;
    record.extracted_title = inferred.title;

    used.release(&record.original_name);
    let built = naming::build(
        record.extracted_author.as_deref(),
        record.extracted_title.as_deref(),
        used,
    );
    let new_name = match built {
        BuiltName::Candidate(name) if name != record.original_name => name,
        BuiltName::Candidate(_) => {
            info!(file = %file, "File already carries its inferred name");
            used.claim(&record.original_name);
            record.status = FileStatus::KeptOriginal;
            return record;
        }
        BuiltName::KeepOriginal => {
            info!(file = %file, "No author or title found, keeping original name");
            used.claim(&record.original_name);
            record.status = FileStatus::KeptOriginal;
            return record;
        }
    };

    match apply_rename(&record.original_path, &new_name) {
        Ok(target) => {
            info!(file = %file, new_name = %new_name, "Renamed PDF");
            debug!(target = %target.display(), "Rename target");
            used.claim(&new_name);
            record.new_name = Some(new_name);
            record.status = FileStatus::Renamed;
        }
        Err(e) => {
            error!(file = %file, new_name = %new_name, error = %e, "Rename failed");
            used.claim(&record.original_name);
            record.fail(e.to_string());
        }
    }
    record
}

/// Renames `from` to `new_name` within the same directory, refusing to overwrite.
pub fn apply_rename(from: &Path, new_name: &str) -> Result<PathBuf, RenameError> {
    let dir = from.parent().unwrap_or_else(|| Path::new("."));
    let to = dir.join(new_name);
    if to.exists() {
        return Err(RenameError::TargetExists(to));
    }

    std::fs::rename(from, &to).map_err(|source| RenameError::Io {
        from: from.to_path_buf(),
        to: to.clone(),
        source,
    })?;
    Ok(to)
}
