//! Run-level statistics for a POMCP engine (diagnostics only — distinct
//! from the per-node `Statistic` accumulator in `src/statistic.rs`).
//!
//! Same fields and `summary()` report shape as a typical search-stats
//! accumulator, fed from this crate's `Pool` metrics rather than a static
//! pool-size config.

use std::time::Duration;

/// Statistics collected across one or more `select_action` calls.
#[derive(Debug, Clone)]
pub struct SearchStatistics {
    /// Number of simulations run.
    pub iterations: usize,

    /// Total time spent in `select_action`.
    pub total_time: Duration,

    /// Total number of nodes in the tree at the time of the snapshot.
    pub tree_size: usize,

    /// Longest action trace returned by any single simulation so far.
    pub max_depth: usize,

    /// Reserved for wall-clock-budgeted callers that stop a search loop
    /// early; unused by the engine itself, which only budgets by
    /// `num_simulations`.
    pub stopped_early: bool,

    /// Node pool metrics, refreshed on each `statistics()` call.
    pub node_pool_stats: Option<NodePoolStats>,
}

/// A snapshot of `Pool` metrics.
#[derive(Debug, Clone)]
pub struct NodePoolStats {
    pub capacity: usize,
    pub available: usize,
    pub total_allocated: usize,
    pub total_returned: usize,
}

impl SearchStatistics {
    /// Creates a new, empty statistics object.
    pub fn new() -> Self {
        SearchStatistics {
            iterations: 0,
            total_time: Duration::from_secs(0),
            tree_size: 1,
            max_depth: 0,
            stopped_early: false,
            node_pool_stats: None,
        }
    }

    /// Records a fresh node-pool snapshot.
    pub fn update_node_pool_stats(&mut self, capacity: usize, available: usize, allocated: usize, returned: usize) {
        self.node_pool_stats = Some(NodePoolStats {
            capacity,
            available,
            total_allocated: allocated,
            total_returned: returned,
        });
    }

    /// Average time per simulation in microseconds.
    pub fn avg_time_per_iteration_us(&self) -> f64 {
        if self.iterations == 0 {
            return 0.0;
        }
        self.total_time.as_micros() as f64 / self.iterations as f64
    }

    /// Simulations run per second.
    pub fn iterations_per_second(&self) -> f64 {
        if self.total_time.as_secs_f64() <= 0.0 {
            return 0.0;
        }
        self.iterations as f64 / self.total_time.as_secs_f64()
    }

    /// A human-readable summary, for CLI/demo output.
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "POMCP Search Statistics:\n\
             - Simulations: {}\n\
             - Total time: {:.3} seconds\n\
             - Tree size: {} nodes\n\
             - Max depth: {}\n\
             - Avg time per simulation: {:.3} µs\n\
             - Simulations per second: {:.1}",
            self.iterations,
            self.total_time.as_secs_f64(),
            self.tree_size,
            self.max_depth,
            self.avg_time_per_iteration_us(),
            self.iterations_per_second(),
        );

        if let Some(pool_stats) = &self.node_pool_stats {
            summary.push_str(&format!(
                "\n\nNode Pool Statistics:\n\
                 - Capacity: {}\n\
                 - Available nodes: {}\n\
                 - Total allocated: {}\n\
                 - Total returned: {}\n\
                 - Reuse ratio: {:.2}%",
                pool_stats.capacity,
                pool_stats.available,
                pool_stats.total_allocated,
                pool_stats.total_returned,
                if pool_stats.total_allocated > 0 {
                    (pool_stats.total_returned as f64 / pool_stats.total_allocated as f64) * 100.0
                } else {
                    0.0
                }
            ));
        }

        summary
    }
}

impl Default for SearchStatistics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_statistics_report_zero_rates() {
        let stats = SearchStatistics::new();
        assert_eq!(stats.avg_time_per_iteration_us(), 0.0);
        assert_eq!(stats.iterations_per_second(), 0.0);
    }

    #[test]
    fn summary_includes_pool_stats_once_set() {
        let mut stats = SearchStatistics::new();
        stats.update_node_pool_stats(100, 40, 60, 55);
        let summary = stats.summary();
        assert!(summary.contains("Node Pool Statistics"));
        assert!(summary.contains("Capacity: 100"));
    }
}
