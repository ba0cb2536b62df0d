//! Worker threads for parallel directory scanning
//!
//! Each worker:
//! - Pulls a scan unit from the submission channel
//! - Runs the shared scanner on it (blocking filesystem I/O)
//! - Sends the outcome back on the result channel
//!
//! Workers hold no scan state of their own. The coordinator decides what is
//! dispatched and folds every outcome, so the pool is just a set of threads
//! draining one channel into another.

use crate::error::{ScanError, WorkerError};
use crate::walker::queue::{ScanResult, ScanUnit};
use crate::walker::scanner::DirectoryScanner;
use crossbeam_channel::{Receiver, Sender};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, trace, warn};

/// Outcome of one scan, as delivered to the coordinator
#[derive(Debug)]
pub struct Completion {
    /// Directory that was scanned
    pub path: PathBuf,

    /// Scan result or the reason the directory contributes nothing
    pub outcome: Result<ScanResult, ScanError>,
}

/// A worker thread that scans directories
pub struct Worker {
    /// Worker ID
    id: usize,

    /// Thread handle
    handle: Option<JoinHandle<u64>>,
}

impl Worker {
    /// Spawn a new worker thread
    pub fn spawn<S>(
        id: usize,
        scanner: Arc<S>,
        units: Receiver<ScanUnit>,
        results: Sender<Completion>,
    ) -> Result<Self, WorkerError>
    where
        S: DirectoryScanner + 'static,
    {
        let handle = thread::Builder::new()
            .name(format!("du-worker-{}", id))
            .spawn(move || worker_loop(id, scanner.as_ref(), units, results))
            .map_err(|e| WorkerError::SpawnFailed {
                id,
                reason: e.to_string(),
            })?;

        Ok(Self {
            id,
            handle: Some(handle),
        })
    }

    /// Get worker ID
    pub fn id(&self) -> usize {
        self.id
    }

    /// Wait for the worker to finish, returning how many units it scanned
    pub fn join(mut self) -> Result<u64, WorkerError> {
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| WorkerError::Panicked { id: self.id }),
            None => Ok(0),
        }
    }
}

/// Fixed-size set of workers sharing one submission channel
pub struct WorkerPool {
    workers: Vec<Worker>,
}

impl WorkerPool {
    /// Spawn `size` workers
    ///
    /// If any spawn fails the workers already started exit once the caller
    /// drops its end of the submission channel.
    pub fn spawn<S>(
        size: usize,
        scanner: Arc<S>,
        units: &Receiver<ScanUnit>,
        results: &Sender<Completion>,
    ) -> Result<Self, WorkerError>
    where
        S: DirectoryScanner + 'static,
    {
        let mut workers = Vec::with_capacity(size);
        for id in 0..size {
            workers.push(Worker::spawn(
                id,
                Arc::clone(&scanner),
                units.clone(),
                results.clone(),
            )?);
        }

        debug!(count = workers.len(), "Workers spawned");
        Ok(Self { workers })
    }

    /// Number of workers in the pool
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    /// Check if the pool has no workers
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Join every worker; the submission channel must already be closed
    pub fn join(self) -> Result<u64, WorkerError> {
        let mut scanned = 0;
        let mut first_err = None;

        for worker in self.workers {
            let id = worker.id();
            match worker.join() {
                Ok(count) => scanned += count,
                Err(e) => {
                    warn!(worker = id, error = %e, "Worker failed to join cleanly");
                    first_err.get_or_insert(e);
                }
            }
        }

        match first_err {
            Some(e) => Err(e),
            None => Ok(scanned),
        }
    }
}

/// Main worker loop
fn worker_loop<S>(
    id: usize,
    scanner: &S,
    units: Receiver<ScanUnit>,
    results: Sender<Completion>,
) -> u64
where
    S: DirectoryScanner + ?Sized,
{
    trace!(worker = id, "Worker starting");
    let mut scanned = 0u64;

    // Ends when the coordinator drops the submission sender
    for unit in units.iter() {
        let path = unit.into_path();
        trace!(worker = id, path = %path.display(), "Scanning");

        let outcome = scan_catching_panics(scanner, &path);
        scanned += 1;

        if results.send(Completion { path, outcome }).is_err() {
            debug!(worker = id, "Result channel closed, worker exiting");
            break;
        }
    }

    trace!(worker = id, scanned, "Worker shutting down");
    scanned
}

/// Run a scan, turning a panic into a per-unit error
///
/// A panicking scan must still produce a completion, otherwise the
/// coordinator's in-flight count never drops back to zero.
fn scan_catching_panics<S>(scanner: &S, path: &Path) -> Result<ScanResult, ScanError>
where
    S: DirectoryScanner + ?Sized,
{
    match panic::catch_unwind(AssertUnwindSafe(|| scanner.scan(path))) {
        Ok(outcome) => outcome,
        Err(payload) => Err(ScanError::Panicked {
            path: path.to_path_buf(),
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
