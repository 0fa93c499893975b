//! Worker-pool configuration for the concurrent search, and the scoped
//! worker runner it shares with threaded perft.
//!
//! Fan-out happens once, at the root, and only for searches at least
//! `parallel_depth_threshold` plies deep.

use std::thread;

use crate::search::search_outcome::{SearchError, SearchResult};

pub const DEFAULT_PARALLEL_DEPTH_THRESHOLD: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadingConfig {
    pub requested_threads: usize,
    pub parallel_depth_threshold: u8,
}

impl Default for ThreadingConfig {
    fn default() -> Self {
        Self::from_available_parallelism()
    }
}

impl ThreadingConfig {
    /// One worker per hardware thread, falling back to a single worker when
    /// the count is unavailable.
    pub fn from_available_parallelism() -> Self {
        let requested_threads = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        Self {
            requested_threads,
            parallel_depth_threshold: DEFAULT_PARALLEL_DEPTH_THRESHOLD,
        }
    }

    #[inline]
    pub fn normalized_threads(self) -> usize {
        self.requested_threads.max(1)
    }

    #[inline]
    pub fn fans_out_at(self, depth: u8) -> bool {
        self.normalized_threads() > 1 && depth >= self.parallel_depth_threshold
    }
}

/// Runs `work(worker_id)` on `workers` scoped threads and joins every one
/// before looking at any result. The first panicked worker, in id order,
/// becomes [`SearchError::WorkerPanicked`].
pub(crate) fn run_scoped_workers<T, F>(workers: usize, work: F) -> SearchResult<Vec<T>>
where
    T: Send,
    F: Fn(usize) -> T + Sync,
{
    let joined: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|worker_id| {
                let work = &work;
                scope.spawn(move || work(worker_id))
            })
            .collect();

        handles.into_iter().map(|handle| handle.join()).collect()
    });

    joined
        .into_iter()
        .enumerate()
        .map(|(worker_id, result)| {
            result.map_err(|_| SearchError::WorkerPanicked(format!("worker {worker_id} panicked")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn threading_config_normalizes_threads() {
        let cfg = ThreadingConfig {
            requested_threads: 0,
            parallel_depth_threshold: DEFAULT_PARALLEL_DEPTH_THRESHOLD,
        };
        assert_eq!(cfg.normalized_threads(), 1);
        assert!(!cfg.fans_out_at(8));
    }

    #[test]
    fn fan_out_starts_at_threshold() {
        let cfg = ThreadingConfig {
            requested_threads: 4,
            parallel_depth_threshold: 5,
        };
        assert!(!cfg.fans_out_at(4));
        assert!(cfg.fans_out_at(5));
        assert!(ThreadingConfig::default().normalized_threads() >= 1);
    }

    #[test]
    fn workers_return_results_in_id_order() {
        let results = run_scoped_workers(4, |worker_id| worker_id * 10).expect("no worker should panic");
        assert_eq!(results, vec![0, 10, 20, 30]);
    }

    #[test]
    fn panicking_worker_fails_after_every_worker_joins() {
        let finished = AtomicUsize::new(0);
        let result = run_scoped_workers(3, |worker_id| {
            if worker_id == 1 {
                panic!("scoring failed on worker {worker_id}");
            }
            finished.fetch_add(1, Ordering::SeqCst);
            worker_id
        });
        assert_eq!(result, Err(SearchError::WorkerPanicked("worker 1 panicked".to_owned())));
        assert_eq!(finished.load(Ordering::SeqCst), 2);
    }
}
