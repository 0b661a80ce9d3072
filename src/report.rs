//! Progress indicator and end-of-run summary table.

use colored::{ColoredString, Colorize};
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Write as _;

use crate::rename::{FileRecord, FileStatus};

const TABLE_TITLE: &str = "PDF Renaming Results";
const HEADERS: [&str; 5] = ["Original Filename", "Author", "Title", "New Filename", "Status"];

/// Tracks per-file completions while a run is in progress.
pub struct Reporter {
    bar: ProgressBar,
    records: Vec<FileRecord>,
}

impl Reporter {
    /// A reporter drawing its progress bar on stderr.
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.green} {percent:>3}% [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
        bar.set_style(style);
        Self::with_bar(bar)
    }

    /// A reporter that only collects records.
    pub fn hidden() -> Self {
        Self::with_bar(ProgressBar::hidden())
    }

    fn with_bar(bar: ProgressBar) -> Self {
        Self {
            bar,
            records: Vec::new(),
        }
    }

    /// Fixes the bar length to the number of discovered files.
    pub fn start(&mut self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_message("Processing PDFs...");
    }

    pub fn processing(&self, name: &str) {
        self.bar.set_message(format!("Processing: {name}"));
    }

    pub fn record(&mut self, record: FileRecord) {
        self.bar.inc(1);
        self.records.push(record);
    }

    pub fn completed(&self) -> usize {
        self.records.len()
    }

    pub fn finish(self) -> Summary {
        self.bar.finish_and_clear();
        Summary {
            records: self.records,
        }
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

/// All records of a finished run, in processing order.
#[derive(Debug, Clone)]
pub struct Summary {
    pub records: Vec<FileRecord>,
}

impl Summary {
    pub fn count(&self, status: FileStatus) -> usize {
        self.records.iter().filter(|r| r.status == status).count()
    }

    /// One row per record: original name, author, title, displayed name, status.
    pub fn rows(&self) -> Vec<[String; 5]> {
        self.records
            .iter()
            .map(|r| {
                [
                    r.original_name.clone(),
                    r.extracted_author.clone().unwrap_or_default(),
                    r.extracted_title.clone().unwrap_or_default(),
                    r.display_name().to_string(),
                    r.status.to_string(),
                ]
            })
            .collect()
    }

    /// Renders the summary as a boxed table, colouring columns when `colorize` is set.
    pub fn render(&self, colorize: bool) -> String {
        let rows = self.rows();
        let mut widths = HEADERS.map(|h| h.chars().count());
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let rule = |left: &str, mid: &str, right: &str| {
            let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("{left}{}{right}", segments.join(mid))
        };

        let mut out = String::new();
        let inner: usize = widths.iter().map(|w| w + 3).sum::<usize>() - 1;
        let _ = writeln!(out, "{}", center(TABLE_TITLE, inner + 2).trim_end());
        let _ = writeln!(out, "{}", rule("┌", "┬", "┐"));
        let header: Vec<String> = HEADERS
            .iter()
            .zip(widths)
            .map(|(h, w)| paint(&pad(h, w), colorize, |s| s.bold()))
            .collect();
        let _ = writeln!(out, "│ {} │", header.join(" │ "));
        let _ = writeln!(out, "{}", rule("├", "┼", "┤"));

        for (row, record) in rows.iter().zip(&self.records) {
            let cells: Vec<String> = row
                .iter()
                .zip(widths)
                .enumerate()
                .map(|(col, (cell, w))| {
                    let padded = pad(cell, w);
                    match col {
                        0 => paint(&padded, colorize, |s| s.cyan()),
                        1 => paint(&padded, colorize, |s| s.magenta()),
                        2 => paint(&padded, colorize, |s| s.green()),
                        3 => paint(&padded, colorize, |s| s.yellow()),
                        _ => paint(&padded, colorize, |s| status_color(s, record.status)),
                    }
                })
                .collect();
            let _ = writeln!(out, "│ {} │", cells.join(" │ "));
        }
        let _ = writeln!(out, "{}", rule("└", "┴", "┘"));
        let _ = write!(
            out,
            "{} renamed, {} kept, {} encrypted, {} failed",
            self.count(FileStatus::Renamed),
            self.count(FileStatus::KeptOriginal),
            self.count(FileStatus::Encrypted),
            self.count(FileStatus::Error),
        );
        out
    }
}

fn status_color(s: &str, status: FileStatus) -> ColoredString {
    match status {
        FileStatus::Renamed => s.green().bold(),
        FileStatus::KeptOriginal => s.normal(),
        FileStatus::Encrypted => s.yellow(),
        FileStatus::Error => s.red().bold(),
    }
}

fn paint(text: &str, colorize: bool, style: impl Fn(&str) -> ColoredString) -> String {
    if colorize {
        style(text).to_string()
    } else {
        text.to_string()
    }
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.chars().count());
    format!("{text}{}", " ".repeat(fill))
}

fn center(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.chars().count());
    format!("{}{text}", " ".repeat(fill / 2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn record(name: &str, status: FileStatus) -> FileRecord {
        let mut r = FileRecord::new(PathBuf::from("/tmp").join(name));
        r.status = status;
        r
    }

    #[test]
    fn reporter_collects_records_in_order() {
        let mut reporter = Reporter::hidden();
        reporter.start(2);
        reporter.record(record("a.pdf", FileStatus::KeptOriginal));
        reporter.record(record("b.pdf", FileStatus::Encrypted));
        assert_eq!(reporter.completed(), 2);

        let summary = reporter.finish();
        let names: Vec<_> = summary.records.iter().map(|r| r.original_name.as_str()).collect();
        assert_eq!(names, ["a.pdf", "b.pdf"]);
    }

    #[test]
    fn plain_render_has_title_headers_and_rows() {
        let mut renamed = record("scan.pdf", FileStatus::Renamed);
        renamed.extracted_author = Some("Jane Smith".into());
        renamed.extracted_title = Some("Annual Report".into());
        renamed.new_name = Some("Jane Smith - Annual Report.pdf".into());
        let summary = Summary {
            records: vec![renamed, record("locked.pdf", FileStatus::Encrypted)],
        };

        let table = summary.render(false);
        assert!(table.contains("PDF Renaming Results"));
        assert!(table.contains("Original Filename"));
        assert!(table.contains("Jane Smith - Annual Report.pdf"));
        assert!(table.contains("locked.pdf"));
        assert!(table.ends_with("1 renamed, 0 kept, 1 encrypted, 0 failed"));
        assert!(!table.contains('\u{1b}'));

        let row_lines = table.lines().filter(|l| l.starts_with('│')).count();
        assert_eq!(row_lines, 3);
    }

    #[test]
    fn rows_fall_back_to_original_name() {
        let summary = Summary {
            records: vec![record("keep.pdf", FileStatus::KeptOriginal)],
        };
        let rows = summary.rows();
        assert_eq!(rows[0][0], "keep.pdf");
        assert_eq!(rows[0][1], "");
        assert_eq!(rows[0][3], "keep.pdf");
    }
}
