//! Scan coordinator - owns the scheduling loop
//!
//! The coordinator is responsible for:
//! - Holding the pending queue, the in-flight count and the running total
//! - Dispatching units to the worker pool without exceeding the limit
//! - Folding completed results back into the total and the queue
//! - Detecting completion (nothing pending, nothing in flight)
//! - Graceful shutdown on request
//!
//! Only the coordinator thread touches its state. Workers see scan units
//! going in and completions coming out, nothing else, so there are no locks
//! around the queue or the total.

use crate::config::validate_threads;
use crate::error::{Result, ScanError, WorkerError};
use crate::walker::queue::{PendingQueue, ScanUnit};
use crate::walker::scanner::{DirectoryScanner, FsScanner};
use crate::walker::worker::{Completion, WorkerPool};
use crossbeam_channel::bounded;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

/// Result of a completed scan
#[derive(Debug)]
pub struct ScanSummary {
    /// Sum of every directory entry size and every file size found
    pub total_bytes: u64,

    /// Directories scanned successfully
    pub dirs_scanned: u64,

    /// Directories that could not be scanned; each contributes zero bytes
    pub errors: Vec<ScanError>,

    /// Time taken for the scan
    pub duration: Duration,

    /// Whether the scan ran to the end (vs was interrupted)
    pub completed: bool,
}

impl ScanSummary {
    /// True if every directory was scanned and the run was not interrupted
    pub fn is_clean(&self) -> bool {
        self.completed && self.errors.is_empty()
    }
}

/// Progress information for display
#[derive(Debug, Clone, Default)]
pub struct ScanProgress {
    /// Directories scanned so far
    pub dirs_scanned: u64,

    /// Running total in bytes
    pub total_bytes: u64,

    /// Units waiting for dispatch
    pub pending: usize,

    /// Scans currently running
    pub in_flight: usize,

    /// Concurrency limit
    pub concurrency_limit: usize,

    /// Directories that failed
    pub errors: usize,

    /// Elapsed time
    pub elapsed: Duration,
}

impl ScanProgress {
    /// Calculate directories per second
    pub fn dirs_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.dirs_scanned as f64 / secs
        } else {
            0.0
        }
    }
}

type ProgressObserver = Box<dyn FnMut(&ScanProgress)>;

/// Coordinates the parallel scan
pub struct Coordinator<S: DirectoryScanner + 'static = FsScanner> {
    /// Scanner shared with every worker
    scanner: Arc<S>,

    /// Directories waiting for dispatch
    pending: PendingQueue,

    /// Scans handed to workers and not yet collected
    in_flight: usize,

    /// Upper bound on `in_flight`
    concurrency_limit: usize,

    /// Running total in bytes
    total: u64,

    /// Directories folded successfully
    dirs_scanned: u64,

    /// Failed directories
    errors: Vec<ScanError>,

    /// Shutdown signal
    shutdown: Arc<AtomicBool>,

    /// Called after every collection
    observer: Option<ProgressObserver>,
}

impl Coordinator<FsScanner> {
    /// Create a coordinator that scans the local filesystem
    pub fn new(roots: Vec<PathBuf>, concurrency_limit: usize) -> Result<Self> {
        Self::with_scanner(FsScanner::new(), roots, concurrency_limit)
    }
}

impl<S: DirectoryScanner + 'static> Coordinator<S> {
    /// Create a coordinator with a custom scanner
    pub fn with_scanner(scanner: S, roots: Vec<PathBuf>, concurrency_limit: usize) -> Result<Self> {
        Self::from_shared(Arc::new(scanner), roots, concurrency_limit)
    }

    /// Create a coordinator around a scanner the caller keeps a handle to
    pub fn from_shared(
        scanner: Arc<S>,
        roots: Vec<PathBuf>,
        concurrency_limit: usize,
    ) -> Result<Self> {
        validate_threads(concurrency_limit)?;

        Ok(Self {
            scanner,
            pending: PendingQueue::seeded(roots.into_iter().map(ScanUnit::new)),
            in_flight: 0,
            concurrency_limit,
            total: 0,
            dirs_scanned: 0,
            errors: Vec::new(),
            shutdown: Arc::new(AtomicBool::new(false)),
            observer: None,
        })
    }

    /// Register a callback that receives a progress snapshot after each
    /// completed scan
    pub fn on_progress(mut self, observer: impl FnMut(&ScanProgress) + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Get a clone of the shutdown flag (for signal handlers)
    ///
    /// Once set, no further units are dispatched; scans already in flight
    /// finish and are still counted.
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Run the scan to completion
    pub fn run(mut self) -> Result<ScanSummary> {
        let start = Instant::now();

        info!(
            roots = self.pending.len(),
            concurrency = self.concurrency_limit,
            "Starting scan"
        );

        if self.pending.is_empty() {
            let interrupted = self.shutdown.load(Ordering::Relaxed);
            return Ok(self.finish(start, !interrupted));
        }

        // Both channels hold at most `concurrency_limit` items because at most
        // that many units are ever in flight, so neither side blocks on send
        let (unit_tx, unit_rx) = bounded::<ScanUnit>(self.concurrency_limit);
        let (result_tx, result_rx) = bounded::<Completion>(self.concurrency_limit);

        let pool = WorkerPool::spawn(
            self.concurrency_limit,
            Arc::clone(&self.scanner),
            &unit_rx,
            &result_tx,
        )?;

        // Workers own the remaining ends; a disconnect now means they are gone
        drop(unit_rx);
        drop(result_tx);

        let mut interrupted = false;

        loop {
            // Dispatch phase
            while self.in_flight < self.concurrency_limit {
                // Cleared on every pass so units discovered by draining scans
                // are discarded too
                if self.shutdown.load(Ordering::Relaxed) {
                    let dropped = self.pending.clear();
                    if !interrupted {
                        interrupted = true;
                        info!(dropped, in_flight = self.in_flight, "Shutdown requested, draining");
                    }
                }

                let Some(unit) = self.pending.pop() else {
                    break;
                };

                trace!(path = %unit.path().display(), "Dispatching");
                unit_tx.send(unit).map_err(|_| WorkerError::AllWorkersDead)?;
                self.in_flight += 1;
            }

            // Only reachable with nothing pending, either because the tree is
            // exhausted or because shutdown cleared the queue
            if self.in_flight == 0 {
                break;
            }

            // Collection phase
            let done = result_rx
                .recv()
                .map_err(|_| WorkerError::ResultChannelClosed {
                    in_flight: self.in_flight,
                })?;
            self.in_flight -= 1;
            self.fold(done);
            self.report_progress(start);

            if self.pending.is_empty() && self.in_flight == 0 {
                break;
            }
        }

        // Closing the submission channel ends every worker loop
        drop(unit_tx);
        let worker_scans = pool.join()?;
        debug!(scans = worker_scans, "Workers joined");

        Ok(self.finish(start, !interrupted))
    }

    /// Fold one completion into the coordinator state
    fn fold(&mut self, done: Completion) {
        match done.outcome {
            Ok(result) => {
                self.total += result.size_delta;
                self.dirs_scanned += 1;
                self.pending.extend(result.discovered);
            }
            Err(e) => {
                warn!(path = %done.path.display(), error = %e, "Directory failed");
                self.errors.push(e);
            }
        }
    }

    fn report_progress(&mut self, start: Instant) {
        if let Some(observer) = self.observer.as_mut() {
            let progress = ScanProgress {
                dirs_scanned: self.dirs_scanned,
                total_bytes: self.total,
                pending: self.pending.len(),
                in_flight: self.in_flight,
                concurrency_limit: self.concurrency_limit,
                errors: self.errors.len(),
                elapsed: start.elapsed(),
            };
            observer(&progress);
        }
    }

    fn finish(self, start: Instant, completed: bool) -> ScanSummary {
        let duration = start.elapsed();
        let stats = self.pending.stats();

        debug!(
            enqueued = stats.enqueued,
            dispatched = stats.dispatched,
            peak_pending = stats.peak_len,
            "Queue statistics"
        );

        info!(
            dirs = self.dirs_scanned,
            bytes = self.total,
            errors = self.errors.len(),
            duration_ms = duration.as_millis() as u64,
            "Scan completed"
        );

        ScanSummary {
            total_bytes: self.total,
            dirs_scanned: self.dirs_scanned,
            errors: self.errors,
            duration,
            completed,
        }
    }
}
