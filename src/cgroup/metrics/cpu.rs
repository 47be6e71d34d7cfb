//! Accessors backed by the `cpu` controller.

use super::Metrics;
use crate::cgroup::stats::{self, UNLIMITED};

/// Shares the kernel assigns to a cgroup nobody configured.
const DEFAULT_CPU_SHARES: i64 = 1024;

impl Metrics {
    /// CFS enforcement period in microseconds (`cpu.cfs_period_us`).
    pub fn cpu_period(&self) -> i64 {
        stats::read_long(self.cpu.as_ref(), "cpu.cfs_period_us")
    }

    /// CFS quota in microseconds per period (`cpu.cfs_quota_us`).
    ///
    /// The kernel reports `-1` for "no quota", which coincides with
    /// [`UNLIMITED`].
    pub fn cpu_quota(&self) -> i64 {
        stats::read_long(self.cpu.as_ref(), "cpu.cfs_quota_us")
    }

    /// Relative CPU weight (`cpu.shares`).
    ///
    /// Both `0` and the kernel default of `1024` mean nobody set a weight and
    /// are reported as [`UNLIMITED`].
    pub fn cpu_shares(&self) -> i64 {
        match stats::read_long(self.cpu.as_ref(), "cpu.shares") {
            0 | DEFAULT_CPU_SHARES => UNLIMITED,
            shares => shares,
        }
    }

    /// Number of elapsed enforcement periods (`nr_periods` in `cpu.stat`).
    pub fn cpu_num_periods(&self) -> i64 {
        stats::read_keyed_long(self.cpu.as_ref(), "cpu.stat", "nr_periods")
    }

    /// Number of periods in which the cgroup was throttled.
    pub fn cpu_num_throttled(&self) -> i64 {
        stats::read_keyed_long(self.cpu.as_ref(), "cpu.stat", "nr_throttled")
    }

    /// Total time the cgroup was throttled, in nanoseconds.
    pub fn cpu_throttled_time(&self) -> i64 {
        stats::read_keyed_long(self.cpu.as_ref(), "cpu.stat", "throttled_time")
    }

    /// Number of CPUs the process should plan for, given `host_cpus` and the
    /// cgroup's quota and shares.
    ///
    /// The quota yields `ceil(quota / period)` CPUs and the shares yield
    /// `ceil(shares / 1024)`. If both are set, the quota wins when
    /// `prefer_quota` is true and the smaller one wins otherwise. The result
    /// never exceeds `host_cpus` and is at least 1.
    pub fn active_processor_count(&self, host_cpus: usize, prefer_quota: bool) -> usize {
        let quota = self.cpu_quota();
        let period = self.cpu_period();
        let shares = self.cpu_shares();

        let quota_count = if quota > UNLIMITED && period > 0 {
            ceil_div(quota, period)
        } else {
            0
        };
        let share_count = if shares > UNLIMITED {
            ceil_div(shares, DEFAULT_CPU_SHARES)
        } else {
            0
        };

        let limit = match (quota_count, share_count) {
            (0, 0) => host_cpus,
            (q, 0) => q,
            (0, s) => s,
            (q, _) if prefer_quota => q,
            (q, s) => q.min(s),
        };
        log::trace!(
            "active processor count: host={host_cpus}, quota_count={quota_count}, share_count={share_count}, limit={limit}"
        );

        limit.min(host_cpus).max(1)
    }
}

/// `ceil(value / divisor)` for a non-negative `value` and positive `divisor`.
fn ceil_div(value: i64, divisor: i64) -> usize {
    match (u64::try_from(value), u64::try_from(divisor)) {
        (Ok(value), Ok(divisor)) if divisor > 0 => {
            usize::try_from(value.div_ceil(divisor)).unwrap_or(usize::MAX)
        }
        _ => 0,
    }
}
