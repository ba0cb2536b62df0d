//! Progress reporting for the scanner
//!
//! Provides a live spinner using indicatif and a short end-of-run summary.
//! Everything here writes to stderr; stdout is reserved for the total.

use crate::walker::{ScanProgress, ScanSummary};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress reporter that displays scan status
#[derive(Clone)]
pub struct ProgressReporter {
    /// Progress bar
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();

        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .expect("Invalid progress template")
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Update the progress display
    pub fn update(&self, progress: &ScanProgress) {
        self.bar.set_message(progress_message(progress));
    }

    /// Set a status message
    pub fn set_status(&self, status: &str) {
        self.bar.set_message(status.to_string());
    }

    /// Finish the progress display with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    /// Finish and clear the progress display
    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn progress_message(progress: &ScanProgress) -> String {
    format!(
        "Dirs: {} | Bytes: {} | Rate: {:.0}/s | Pending: {} | Scanning: {}/{} | Errors: {}",
        format_number(progress.dirs_scanned),
        progress.total_bytes,
        progress.dirs_per_second(),
        format_number(progress.pending as u64),
        progress.in_flight,
        progress.concurrency_limit,
        progress.errors,
    )
}

/// Format a number with thousands separators
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut out = String::with_capacity(s.len() + s.len() / 3);

    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}

/// Print the scan header to stderr
pub fn print_header(roots: usize, threads: usize) {
    eprintln!();
    eprintln!(
        "{} {}",
        style("parallel-du").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    eprintln!("{}", style("─".repeat(50)).dim());
    eprintln!("  {} {}", style("Roots:").bold(), roots);
    eprintln!("  {} {}", style("Threads:").bold(), threads);
    eprintln!();
}

/// Print a summary of the scan to stderr
pub fn print_summary(summary: &ScanSummary) {
    let duration_secs = summary.duration.as_secs_f64();
    let rate = if duration_secs > 0.0 {
        summary.dirs_scanned as f64 / duration_secs
    } else {
        0.0
    };

    let title = if summary.completed {
        style("Scan Complete").green().bold()
    } else {
        style("Scan Interrupted").yellow().bold()
    };

    eprintln!();
    eprintln!("{}", title);
    eprintln!("{}", style("─".repeat(50)).dim());
    eprintln!(
        "  {} {}",
        style("Directories:").bold(),
        format_number(summary.dirs_scanned)
    );
    eprintln!("  {} {}", style("Total Bytes:").bold(), summary.total_bytes);
    eprintln!(
        "  {} {:.1}s ({:.0} dirs/sec)",
        style("Duration:").bold(),
        duration_secs,
        rate
    );
    if !summary.errors.is_empty() {
        eprintln!(
            "  {} {}",
            style("Errors:").yellow().bold(),
            format_number(summary.errors.len() as u64)
        );
    }
    eprintln!();
}
