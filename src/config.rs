//! Configuration types for parallel-du
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime configuration with validation
//! - Root path resolution to absolute form

use crate::error::ConfigError;
use clap::Parser;
use std::path::{Path, PathBuf};

/// Maximum reasonable thread count
pub const MAX_THREADS: usize = 512;

/// Default number of concurrent directory scans
pub const DEFAULT_THREADS: usize = 1;

/// Parallel disk usage calculator
#[derive(Parser, Debug, Clone)]
#[command(
    name = "parallel-du",
    version,
    about = "Sum the disk usage of directory trees using parallel directory reads",
    long_about = "Recursively sums the size of every file under the given directories, \
                  plus the size of each directory entry itself, and prints the total in bytes.\n\n\
                  Directory reads are spread over a bounded pool of worker threads.",
    after_help = "EXAMPLES:\n    \
        parallel-du\n    \
        parallel-du -t 8 /var/log /home\n    \
        parallel-du -t 32 -p /data"
)]
pub struct CliArgs {
    /// Directories to scan (defaults to the current directory)
    #[arg(value_name = "DIR")]
    pub dirs: Vec<PathBuf>,

    /// Number of directories to scan concurrently
    #[arg(
        short = 't',
        long = "threads",
        default_value_t = DEFAULT_THREADS,
        value_name = "NUM"
    )]
    pub threads: usize,

    /// Show a progress spinner and a run summary on stderr
    #[arg(short = 'p', long)]
    pub progress: bool,

    /// Verbose output (debug logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Absolute root directories, in command-line order
    pub roots: Vec<PathBuf>,

    /// Maximum number of scans in flight
    pub concurrency_limit: usize,

    /// Show progress indicator
    pub show_progress: bool,

    /// Verbose logging
    pub verbose: bool,
}

impl ScanConfig {
    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        validate_threads(args.threads)?;

        let dirs = if args.dirs.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            args.dirs
        };

        let roots = dirs
            .iter()
            .map(|dir| resolve_root(dir))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            roots,
            concurrency_limit: args.threads,
            show_progress: args.progress,
            verbose: args.verbose,
        })
    }
}

/// Check that a thread count is usable as a concurrency limit
pub fn validate_threads(count: usize) -> Result<(), ConfigError> {
    if count == 0 || count > MAX_THREADS {
        return Err(ConfigError::InvalidThreadCount {
            count,
            max: MAX_THREADS,
        });
    }
    Ok(())
}

/// Resolve a root directory to an absolute path
///
/// Does not touch the filesystem beyond reading the current directory, so a
/// root that does not exist still resolves and is reported later by the scan.
pub fn resolve_root(path: &Path) -> Result<PathBuf, ConfigError> {
    std::path::absolute(path).map_err(|source| ConfigError::UnresolvableRoot {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_threads() {
        let args = CliArgs::parse_from(["parallel-du", "/tmp"]);
        assert_eq!(args.threads, 1);

        let config = ScanConfig::from_args(args).unwrap();
        assert_eq!(config.concurrency_limit, 1);
        assert_eq!(config.roots, vec![PathBuf::from("/tmp")]);
    }

    #[test]
    fn test_thread_flag() {
        let args = CliArgs::parse_from(["parallel-du", "-t", "16", "/a", "/b"]);
        let config = ScanConfig::from_args(args).unwrap();
        assert_eq!(config.concurrency_limit, 16);
        assert_eq!(config.roots.len(), 2);
    }

    #[test]
    fn test_invalid_thread_count() {
        let args = CliArgs::parse_from(["parallel-du", "-t", "0"]);
        let err = ScanConfig::from_args(args).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidThreadCount { count: 0, .. }));

        assert!(validate_threads(MAX_THREADS + 1).is_err());
        assert!(validate_threads(MAX_THREADS).is_ok());
    }

    #[test]
    fn test_no_dirs_means_current_directory() {
        let implicit = ScanConfig::from_args(CliArgs::parse_from(["parallel-du"])).unwrap();
        let explicit = ScanConfig::from_args(CliArgs::parse_from(["parallel-du", "."])).unwrap();

        assert_eq!(implicit.roots.len(), 1);
        assert_eq!(implicit.roots, explicit.roots);
        assert!(implicit.roots[0].is_absolute());
    }

    #[test]
    fn test_relative_root_becomes_absolute() {
        let root = resolve_root(Path::new("some/dir")).unwrap();
        assert!(root.is_absolute());
        assert!(root.ends_with("some/dir"));
    }

    #[test]
    fn test_empty_root_is_unresolvable() {
        let err = resolve_root(Path::new("")).unwrap_err();
        assert!(matches!(err, ConfigError::UnresolvableRoot { .. }));
    }
}
