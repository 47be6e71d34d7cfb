//! Accessors backed by the `cpuacct` controller.

use super::Metrics;
use crate::cgroup::stats;

impl Metrics {
    /// Total CPU time consumed by the cgroup, in nanoseconds (`cpuacct.usage`).
    pub fn cpu_usage(&self) -> i64 {
        stats::read_long(self.cpuacct.as_ref(), "cpuacct.usage")
    }

    /// CPU time consumed on each CPU, in nanoseconds (`cpuacct.usage_percpu`).
    pub fn per_cpu_usage(&self) -> Option<Vec<i64>> {
        stats::read_space_list(self.cpuacct.as_ref(), "cpuacct.usage_percpu")
    }

    /// Time spent in user mode, in clock ticks (`user` in `cpuacct.stat`).
    pub fn cpu_user_usage(&self) -> i64 {
        stats::read_keyed_long(self.cpuacct.as_ref(), "cpuacct.stat", "user")
    }

    /// Time spent in kernel mode, in clock ticks (`system` in `cpuacct.stat`).
    pub fn cpu_system_usage(&self) -> i64 {
        stats::read_keyed_long(self.cpuacct.as_ref(), "cpuacct.stat", "system")
    }
}
