//! Accessors backed by the `cpuset` controller.

use super::Metrics;
use crate::cgroup::stats;

impl Metrics {
    /// CPUs the cgroup may run on (`cpuset.cpus`).
    pub fn cpuset_cpus(&self) -> Option<Vec<u32>> {
        stats::read_range_list(self.cpuset.as_ref(), "cpuset.cpus")
    }

    /// CPUs the cgroup actually runs on after ancestor restrictions
    /// (`cpuset.effective_cpus`).
    pub fn effective_cpuset_cpus(&self) -> Option<Vec<u32>> {
        stats::read_range_list(self.cpuset.as_ref(), "cpuset.effective_cpus")
    }

    /// NUMA memory nodes the cgroup may allocate from (`cpuset.mems`).
    pub fn cpuset_mems(&self) -> Option<Vec<u32>> {
        stats::read_range_list(self.cpuset.as_ref(), "cpuset.mems")
    }

    /// Effective NUMA memory nodes (`cpuset.effective_mems`).
    pub fn effective_cpuset_mems(&self) -> Option<Vec<u32>> {
        stats::read_range_list(self.cpuset.as_ref(), "cpuset.effective_mems")
    }

    pub fn cpuset_memory_pressure(&self) -> f64 {
        stats::read_double(self.cpuset.as_ref(), "cpuset.memory_pressure")
    }

    pub fn is_cpuset_memory_pressure_enabled(&self) -> bool {
        stats::read_long(self.cpuset.as_ref(), "cpuset.memory_pressure_enabled") == 1
    }
}
