//! Parallel directory scanner
//!
//! This module implements a bounded parallel disk usage walk: one
//! coordinator thread owns all scheduling state and a fixed pool of workers
//! performs the blocking directory reads.
//!
//! # Architecture
//!
//! ```text
//!                     ┌─────────────────────────┐
//!                     │       Coordinator       │
//!                     │  - pending queue (LIFO) │
//!                     │  - in-flight count      │
//!                     │  - running total        │
//!                     └──────┬───────────▲──────┘
//!                 ScanUnit   │           │  Completion
//!              (bounded, N)  │           │  (bounded, N)
//!       ┌────────────────────┼───────────┼───────────────────┐
//!       │                    │           │                   │
//! ┌─────▼─────┐        ┌─────▼─────┐     │             ┌─────▼─────┐
//! │  Worker 0 │        │  Worker 1 │ ────┘     ...     │ Worker N-1│
//! │  readdir  │        │  readdir  │                   │  readdir  │
//! │  stat     │        │  stat     │                   │  stat     │
//! └───────────┘        └───────────┘                   └───────────┘
//! ```

pub mod coordinator;
pub mod queue;
pub mod scanner;
pub mod worker;

pub use coordinator::{Coordinator, ScanProgress, ScanSummary};
pub use queue::{PendingQueue, QueueStats, ScanResult, ScanUnit};
pub use scanner::{DirectoryScanner, FsScanner};
