//! Accessors backed by the `pids` controller.

use super::Metrics;
use crate::cgroup::stats;

impl Metrics {
    /// Maximum number of tasks in the cgroup (`pids.max`).
    ///
    /// The kernel writes the literal `max` for "no limit".
    pub fn pids_max(&self) -> i64 {
        stats::read_limit(self.pids.as_ref(), "pids.max")
    }

    /// Number of tasks currently in the cgroup (`pids.current`).
    pub fn pids_current(&self) -> i64 {
        stats::read_long(self.pids.as_ref(), "pids.current")
    }
}
