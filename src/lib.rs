//! parallel-du - Parallel Disk Usage Calculator
//!
//! Computes the total size of one or more directory trees by summing the
//! size of every file plus the size of each directory entry, reading
//! directories on a bounded pool of worker threads.
//!
//! # Features
//!
//! - **Bounded Parallelism**: At most `N` directory reads run at once, set
//!   with `-t N`.
//!
//! - **Single-Writer Scheduling**: One coordinator thread owns the pending
//!   queue and the running total. Workers only exchange messages with it, so
//!   the hot path takes no locks.
//!
//! - **Fault Isolation**: An unreadable or vanished directory contributes
//!   zero bytes and is reported; the rest of the tree is still counted.
//!
//! - **Graceful Shutdown**: Ctrl-C stops dispatch and lets in-flight reads
//!   finish.
//!
//! # Example
//!
//! ```bash
//! # Current directory, one thread
//! parallel-du
//!
//! # Two trees, eight concurrent directory reads
//! parallel-du -t 8 /var/log /home
//! ```
//!
//! ```no_run
//! use parallel_du::Coordinator;
//!
//! let summary = Coordinator::new(vec!["/var/log".into()], 8)?.run()?;
//! println!("{}", summary.total_bytes);
//! # Ok::<(), parallel_du::DuError>(())
//! ```

pub mod config;
pub mod error;
pub mod progress;
pub mod walker;

pub use config::{CliArgs, ScanConfig};
pub use error::{DuError, Result, ScanError};
pub use walker::{Coordinator, DirectoryScanner, FsScanner, ScanProgress, ScanSummary};
