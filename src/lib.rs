//! pdf-renamer: rename PDFs after the author and title a language model reads from them.
//!
//! The pipeline per file is extract → infer → build name → rename, driven sequentially by
//! [`rename::rename_folder`]. The two outward-facing capabilities, reading PDF text and asking
//! the model, sit behind the traits in [`contract`].

pub mod cli;
pub mod config;
pub mod contract;
pub mod error;
pub mod extract;
pub mod infer;
pub mod naming;
pub mod rename;
pub mod report;

pub use cli::{run, Cli};
