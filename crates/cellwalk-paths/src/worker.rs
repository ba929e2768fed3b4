//! Path searches on a background thread.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::cancel::CancelToken;
use crate::error::WorkerError;
use crate::path::Path;
use crate::stats::SearchStats;
use crate::walker::{PathRequest, Walker};

/// A search running on its own thread.
///
/// Starting a job supersedes any earlier search on the same walker.
#[derive(Debug)]
pub struct PathJob {
    handle: JoinHandle<(Path, SearchStats)>,
    cancel: CancelToken,
}

/// Run `request` on a new thread.
pub fn spawn_path_job(walker: Arc<Walker>, request: PathRequest) -> Result<PathJob, WorkerError> {
    let cancel = walker.begin_search();
    let token = cancel.clone();
    let handle = thread::Builder::new()
        .name("path-worker".into())
        .spawn(move || {
            let mut stats = SearchStats::default();
            let path = walker.compute_path_with(&request, &token, &mut stats);
            (path, stats)
        })
        .map_err(WorkerError::Spawn)?;
    Ok(PathJob { handle, cancel })
}

impl PathJob {
    /// Ask the search to stop at its next expansion.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn token(&self) -> &CancelToken {
        &self.cancel
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the search and return its path and counters.
    pub fn join(self) -> Result<(Path, SearchStats), WorkerError> {
        self.handle.join().map_err(|_| WorkerError::Panicked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WalkerConfig;
    use crate::path::SearchOutcome;
    use cellwalk_core::{Footprint, Point, SquareGrid};

    fn walker() -> Arc<Walker> {
        Arc::new(Walker::new(WalkerConfig::default(), SquareGrid::new(50)).unwrap())
    }

    #[test]
    fn job_finds_path() {
        let request = PathRequest::new(Point::new(0, 0), Point::new(5, 2), Footprint::single(), true);
        let job = spawn_path_job(walker(), request).unwrap();
        let (path, stats) = job.join().unwrap();
        assert!(path.is_found());
        assert_eq!(path.goal(), Some(Point::new(5, 2)));
        assert_eq!(stats.searches, 1);
    }

    #[test]
    fn new_job_supersedes_old() {
        let w = walker();
        let far = PathRequest::new(Point::new(0, 0), Point::new(5, 5), Footprint::single(), true);
        let first = spawn_path_job(Arc::clone(&w), far.clone()).unwrap();
        let second = spawn_path_job(Arc::clone(&w), far).unwrap();
        assert!(first.token().is_cancelled());
        assert!(!second.token().is_cancelled());

        let (path, _) = first.join().unwrap();
        // The first search may have finished before it was superseded.
        assert!(matches!(path.outcome(), SearchOutcome::Found | SearchOutcome::Cancelled));
        assert!(second.join().unwrap().0.is_found());
    }
}
