//! Accessors backed by the `memory` controller.
//!
//! Limits are byte counts. A cgroup's own limit file reports "unlimited" even
//! when an ancestor constrains it; with `memory.use_hierarchy` set, the
//! effective ancestor limit is taken from `memory.stat` instead
//! (`hierarchical_memory_limit`, `hierarchical_memsw_limit`).
//!
//! The `memory_and_swap_*` accessors fall back to their memory-only
//! counterparts when the kernel does not account swap, since the
//! `memory.memsw.*` files are then missing.

use super::Metrics;
use crate::cgroup::Controller;
use crate::cgroup::controller::MemoryController;
use crate::cgroup::stats::{self, UNLIMITED};

impl Metrics {
    fn memory(&self) -> Option<&Controller> {
        self.memory.as_ref().map(MemoryController::controller)
    }

    fn is_swap_enabled(&self) -> bool {
        self.memory
            .as_ref()
            .is_some_and(MemoryController::is_swap_enabled)
    }

    /// Reads a limit file, consulting `memory.stat` for the ancestor limit
    /// when the own limit is unlimited and hierarchical accounting is on.
    fn hierarchical_limit(&self, file: &str, stat_key: &str) -> i64 {
        let limit = stats::read_long(self.memory(), file);
        match self.memory.as_ref() {
            Some(memory) if limit == UNLIMITED && memory.is_hierarchical() => {
                log::trace!("`{file}` is unlimited, falling back to `{stat_key}`");
                stats::read_keyed_long(self.memory(), "memory.stat", stat_key)
            }
            _ => limit,
        }
    }

    pub fn memory_fail_count(&self) -> i64 {
        stats::read_long(self.memory(), "memory.failcnt")
    }

    /// Effective memory limit in bytes (`memory.limit_in_bytes`, or
    /// `hierarchical_memory_limit` from `memory.stat`).
    pub fn memory_limit(&self) -> i64 {
        self.hierarchical_limit("memory.limit_in_bytes", "hierarchical_memory_limit")
    }

    pub fn memory_max_usage(&self) -> i64 {
        stats::read_long(self.memory(), "memory.max_usage_in_bytes")
    }

    pub fn memory_usage(&self) -> i64 {
        stats::read_long(self.memory(), "memory.usage_in_bytes")
    }

    pub fn memory_soft_limit(&self) -> i64 {
        stats::read_long(self.memory(), "memory.soft_limit_in_bytes")
    }

    pub fn kernel_memory_fail_count(&self) -> i64 {
        stats::read_long(self.memory(), "memory.kmem.failcnt")
    }

    pub fn kernel_memory_limit(&self) -> i64 {
        stats::read_long(self.memory(), "memory.kmem.limit_in_bytes")
    }

    pub fn kernel_memory_max_usage(&self) -> i64 {
        stats::read_long(self.memory(), "memory.kmem.max_usage_in_bytes")
    }

    pub fn kernel_memory_usage(&self) -> i64 {
        stats::read_long(self.memory(), "memory.kmem.usage_in_bytes")
    }

    pub fn tcp_memory_fail_count(&self) -> i64 {
        stats::read_long(self.memory(), "memory.kmem.tcp.failcnt")
    }

    pub fn tcp_memory_limit(&self) -> i64 {
        stats::read_long(self.memory(), "memory.kmem.tcp.limit_in_bytes")
    }

    pub fn tcp_memory_max_usage(&self) -> i64 {
        stats::read_long(self.memory(), "memory.kmem.tcp.max_usage_in_bytes")
    }

    pub fn tcp_memory_usage(&self) -> i64 {
        stats::read_long(self.memory(), "memory.kmem.tcp.usage_in_bytes")
    }

    pub fn memory_and_swap_fail_count(&self) -> i64 {
        if !self.is_swap_enabled() {
            return self.memory_fail_count();
        }
        stats::read_long(self.memory(), "memory.memsw.failcnt")
    }

    /// Effective memory+swap limit in bytes.
    ///
    /// Equals [`Metrics::memory_limit`] when swap is not accounted.
    pub fn memory_and_swap_limit(&self) -> i64 {
        if !self.is_swap_enabled() {
            return self.memory_limit();
        }
        self.hierarchical_limit("memory.memsw.limit_in_bytes", "hierarchical_memsw_limit")
    }

    pub fn memory_and_swap_max_usage(&self) -> i64 {
        if !self.is_swap_enabled() {
            return self.memory_max_usage();
        }
        stats::read_long(self.memory(), "memory.memsw.max_usage_in_bytes")
    }

    pub fn memory_and_swap_usage(&self) -> i64 {
        if !self.is_swap_enabled() {
            return self.memory_usage();
        }
        stats::read_long(self.memory(), "memory.memsw.usage_in_bytes")
    }

    /// Whether the OOM killer acts on this cgroup (`oom_kill_disable 0` in
    /// `memory.oom_control`).
    pub fn is_memory_oom_kill_enabled(&self) -> bool {
        stats::read_keyed_long(self.memory(), "memory.oom_control", "oom_kill_disable") == 0
    }
}
