use anyhow::Result;
use clap::Parser;
use pdf_renamer::cli::{run, Cli};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr and default to warnings so they don't fight the progress bar.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::info!(folder = %cli.folder.display(), "CLI arguments parsed, invoking run");
    match run(cli).await {
        Ok(summary) => {
            tracing::info!(files = summary.records.len(), "CLI completed successfully");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "CLI exited with error");
            Err(e)
        }
    }
}
