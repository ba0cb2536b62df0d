//! Property tests for the coordinator over randomly shaped in-memory trees

use parallel_du::error::ScanError;
use parallel_du::walker::{Coordinator, DirectoryScanner, ScanResult, ScanUnit};
use proptest::prelude::*;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Tree held in memory: path -> (own size, children)
struct MemoryTree {
    dirs: HashMap<PathBuf, (u64, Vec<PathBuf>)>,
    visits: Mutex<HashMap<PathBuf, usize>>,
    running: AtomicUsize,
    max_running: AtomicUsize,
}

impl MemoryTree {
    /// Node 0 is the root; node `i` hangs off `parents[i - 1] % i`
    fn build(sizes: &[u64], parents: &[usize], reverse_children: bool) -> Self {
        let path_of = |i: usize| PathBuf::from(format!("/n{}", i));
        let mut dirs: HashMap<PathBuf, (u64, Vec<PathBuf>)> = sizes
            .iter()
            .enumerate()
            .map(|(i, &size)| (path_of(i), (size, Vec::new())))
            .collect();

        for (i, choice) in parents.iter().enumerate().take(sizes.len().saturating_sub(1)) {
            let child = i + 1;
            let parent = choice % child;
            dirs.get_mut(&path_of(parent)).unwrap().1.push(path_of(child));
        }

        if reverse_children {
            for (_, children) in dirs.values_mut() {
                children.reverse();
            }
        }

        Self {
            dirs,
            visits: Mutex::new(HashMap::new()),
            running: AtomicUsize::new(0),
            max_running: AtomicUsize::new(0),
        }
    }
}

impl DirectoryScanner for MemoryTree {
    fn scan(&self, path: &Path) -> Result<ScanResult, ScanError> {
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_running.fetch_max(now, Ordering::SeqCst);
        *self
            .visits
            .lock()
            .unwrap()
            .entry(path.to_path_buf())
            .or_insert(0) += 1;

        let outcome = match self.dirs.get(path) {
            Some((size, children)) => Ok(ScanResult {
                size_delta: *size,
                discovered: children.iter().cloned().map(ScanUnit::new).collect(),
            }),
            None => Err(ScanError::Stat {
                path: path.to_path_buf(),
                source: io::Error::from(io::ErrorKind::NotFound),
            }),
        };

        self.running.fetch_sub(1, Ordering::SeqCst);
        outcome
    }
}

fn tree_shape() -> impl Strategy<Value = (Vec<u64>, Vec<usize>)> {
    (1usize..60).prop_flat_map(|n| {
        (
            prop::collection::vec(0u64..100_000, n),
            prop::collection::vec(any::<usize>(), n),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn total_equals_sum_of_sizes((sizes, parents) in tree_shape(), limit in 1usize..16) {
        let tree = MemoryTree::build(&sizes, &parents, false);
        let summary = Coordinator::with_scanner(tree, vec![PathBuf::from("/n0")], limit)
            .unwrap()
            .run()
            .unwrap();

        prop_assert_eq!(summary.total_bytes, sizes.iter().sum::<u64>());
        prop_assert_eq!(summary.dirs_scanned, sizes.len() as u64);
        prop_assert!(summary.is_clean());
    }

    #[test]
    fn every_directory_scanned_exactly_once_within_limit(
        (sizes, parents) in tree_shape(),
        limit in 1usize..16,
    ) {
        let tree = Arc::new(MemoryTree::build(&sizes, &parents, false));
        Coordinator::from_shared(Arc::clone(&tree), vec![PathBuf::from("/n0")], limit)
            .unwrap()
            .run()
            .unwrap();

        let visits = tree.visits.lock().unwrap();
        prop_assert_eq!(visits.len(), sizes.len());
        prop_assert!(visits.values().all(|&count| count == 1));
        prop_assert!(tree.max_running.load(Ordering::SeqCst) <= limit);
    }

    #[test]
    fn sibling_order_does_not_change_total(
        (sizes, parents) in tree_shape(),
        limit in 1usize..8,
    ) {
        let forward = MemoryTree::build(&sizes, &parents, false);
        let reversed = MemoryTree::build(&sizes, &parents, true);

        let a = Coordinator::with_scanner(forward, vec![PathBuf::from("/n0")], limit)
            .unwrap()
            .run()
            .unwrap();
        let b = Coordinator::with_scanner(reversed, vec![PathBuf::from("/n0")], limit)
            .unwrap()
            .run()
            .unwrap();

        prop_assert_eq!(a.total_bytes, b.total_bytes);
    }

    #[test]
    fn missing_roots_only_remove_their_own_share(
        (sizes, parents) in tree_shape(),
        missing in 1usize..4,
        limit in 1usize..8,
    ) {
        let tree = MemoryTree::build(&sizes, &parents, false);
        let mut roots = vec![PathBuf::from("/n0")];
        roots.extend((0..missing).map(|i| PathBuf::from(format!("/missing{}", i))));

        let summary = Coordinator::with_scanner(tree, roots, limit)
            .unwrap()
            .run()
            .unwrap();

        prop_assert_eq!(summary.total_bytes, sizes.iter().sum::<u64>());
        prop_assert_eq!(summary.errors.len(), missing);
        prop_assert!(summary.completed);
    }
}
