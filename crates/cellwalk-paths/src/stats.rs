use std::fmt;
use std::time::Duration;

/// Counters for one or more searches.
///
/// Owned by the caller and passed into the search; nothing here is global.
/// Reuse one value across searches to accumulate totals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchStats {
    pub searches: u64,
    /// Nodes popped from the open list.
    pub expanded: u64,
    /// Neighbours produced by the generator.
    pub generated: u64,
    /// Open nodes updated with a cheaper route.
    pub relaxed: u64,
    /// Candidates dropped because geometry blocked them.
    pub blocked: u64,
    /// Obstruction tests computed from geometry.
    pub obstruction_tests: u64,
    /// Obstruction tests answered by the cache.
    pub cache_hits: u64,
    /// Obstruction tests where the geometry engine failed.
    pub geometry_failures: u64,
    pub test_time: Duration,
    pub retrieve_time: Duration,
    pub elapsed: Duration,
}

impl SearchStats {
    pub(crate) fn record_obstruction_test(&mut self, took: Duration) {
        self.obstruction_tests += 1;
        self.test_time += took;
    }

    pub(crate) fn record_cache_hit(&mut self, took: Duration) {
        self.cache_hits += 1;
        self.retrieve_time += took;
    }

    /// Mean time of a computed obstruction test.
    pub fn avg_test_time(&self) -> Option<Duration> {
        average(self.test_time, self.obstruction_tests)
    }

    /// Mean time of a cache lookup.
    pub fn avg_retrieve_time(&self) -> Option<Duration> {
        average(self.retrieve_time, self.cache_hits)
    }
}

fn average(total: Duration, count: u64) -> Option<Duration> {
    let count = u32::try_from(count).ok().filter(|&c| c > 0)?;
    Some(total / count)
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expanded={} generated={} relaxed={} blocked={} tests={} hits={} failures={} in {:?}",
            self.expanded,
            self.generated,
            self.relaxed,
            self.blocked,
            self.obstruction_tests,
            self.cache_hits,
            self.geometry_failures,
            self.elapsed
        )
    }
}
