//! Command-line surface: argument parsing and the async entry point shared by `main` and the
//! integration tests.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::config::RenamerConfig;
use crate::extract::PdfTextExtractor;
use crate::infer::OllamaInferrer;
use crate::rename::rename_folder;
use crate::report::{Reporter, Summary};

/// Rename the PDFs in a folder after the author and title a local language model reads from
/// their first pages.
#[derive(Parser, Debug)]
#[clap(name = "pdf-renamer", version)]
pub struct Cli {
    /// Folder containing the PDF files to rename (not searched recursively)
    pub folder: PathBuf,
}

/// Runs one renaming pass over `cli.folder` and prints the summary table to stdout.
///
/// Per-file failures are part of the summary and do not make this return an error; only an
/// unusable folder or inference client does.
pub async fn run(cli: Cli) -> Result<Summary> {
    tracing::info!("trace_initialised");

    if !cli.folder.is_dir() {
        tracing::error!(folder = %cli.folder.display(), "Folder argument is not a directory");
        bail!("{} is not a valid directory", cli.folder.display());
    }

    let config = RenamerConfig::from_env();
    config.trace_loaded();

    let extractor = PdfTextExtractor::new(config.max_pages);
    let inferrer = OllamaInferrer::new(&config).context("failed to construct inference client")?;

    let mut reporter = if std::io::stderr().is_terminal() {
        Reporter::new()
    } else {
        Reporter::hidden()
    };
    rename_folder(&cli.folder, &extractor, &inferrer, &mut reporter)
        .await
        .with_context(|| format!("failed to process {}", cli.folder.display()))?;

    let summary = reporter.finish();
    println!("{}", summary.render(std::io::stdout().is_terminal()));
    tracing::info!(files = summary.records.len(), "Renaming run complete");
    Ok(summary)
}
