//! Scan units and the coordinator's pending queue
//!
//! The pending queue is owned by the coordinator thread alone, so it is a
//! plain `Vec` used as a stack. Workers never touch it: discovered
//! subdirectories come back through the result channel and are pushed here by
//! the coordinator.

use std::path::{Path, PathBuf};

/// A directory waiting to be scanned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanUnit {
    path: PathBuf,
}

impl ScanUnit {
    /// Create a scan unit for a directory path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the directory to scan
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Consume the unit, returning its path
    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

/// Outcome of scanning one directory
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanResult {
    /// Bytes attributed to this directory: its own entry size plus every
    /// non-directory child
    pub size_delta: u64,

    /// Subdirectories found, each still to be scanned
    pub discovered: Vec<ScanUnit>,
}

impl ScanResult {
    /// Create a result with a base size and no children yet
    pub fn with_base_size(size: u64) -> Self {
        Self {
            size_delta: size,
            discovered: Vec::new(),
        }
    }
}

/// Statistics for the pending queue
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct QueueStats {
    /// Total units pushed (roots included)
    pub enqueued: u64,

    /// Total units popped for dispatch
    pub dispatched: u64,

    /// Largest queue length observed
    pub peak_len: usize,
}

/// Pending directories, LIFO
#[derive(Debug, Default)]
pub struct PendingQueue {
    units: Vec<ScanUnit>,
    stats: QueueStats,
}

impl PendingQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a queue seeded with root units
    pub fn seeded(roots: impl IntoIterator<Item = ScanUnit>) -> Self {
        let mut queue = Self::new();
        queue.extend(roots);
        queue
    }

    /// Push a single unit
    pub fn push(&mut self, unit: ScanUnit) {
        self.units.push(unit);
        self.stats.enqueued += 1;
        self.stats.peak_len = self.stats.peak_len.max(self.units.len());
    }

    /// Push every unit from an iterator
    pub fn extend(&mut self, units: impl IntoIterator<Item = ScanUnit>) {
        let before = self.units.len();
        self.units.extend(units);
        self.stats.enqueued += (self.units.len() - before) as u64;
        self.stats.peak_len = self.stats.peak_len.max(self.units.len());
    }

    /// Take the most recently pushed unit
    pub fn pop(&mut self) -> Option<ScanUnit> {
        let unit = self.units.pop()?;
        self.stats.dispatched += 1;
        Some(unit)
    }

    /// Drop everything still pending, returning how many units were discarded
    pub fn clear(&mut self) -> usize {
        let dropped = self.units.len();
        self.units.clear();
        dropped
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Get current queue length
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Get queue statistics
    pub fn stats(&self) -> QueueStats {
        self.stats
    }
}
