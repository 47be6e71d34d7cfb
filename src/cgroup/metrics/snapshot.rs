use super::Metrics;

/// Every accessor of [`Metrics`] evaluated once, for reporting.
///
/// Values keep the sentinel convention: `-1` means unlimited or unavailable,
/// `None` means an absent or unparsable list.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MetricsSnapshot {
    pub provider: &'static str,

    pub cpu_period: i64,
    pub cpu_quota: i64,
    pub cpu_shares: i64,
    pub cpu_num_periods: i64,
    pub cpu_num_throttled: i64,
    pub cpu_throttled_time: i64,

    pub cpu_usage: i64,
    pub per_cpu_usage: Option<Vec<i64>>,
    pub cpu_user_usage: i64,
    pub cpu_system_usage: i64,

    pub cpuset_cpus: Option<Vec<u32>>,
    pub effective_cpuset_cpus: Option<Vec<u32>>,
    pub cpuset_mems: Option<Vec<u32>>,
    pub effective_cpuset_mems: Option<Vec<u32>>,
    pub cpuset_memory_pressure: f64,
    pub cpuset_memory_pressure_enabled: bool,

    pub memory_fail_count: i64,
    pub memory_limit: i64,
    pub memory_max_usage: i64,
    pub memory_usage: i64,
    pub memory_soft_limit: i64,
    pub kernel_memory_fail_count: i64,
    pub kernel_memory_limit: i64,
    pub kernel_memory_max_usage: i64,
    pub kernel_memory_usage: i64,
    pub tcp_memory_fail_count: i64,
    pub tcp_memory_limit: i64,
    pub tcp_memory_max_usage: i64,
    pub tcp_memory_usage: i64,
    pub memory_and_swap_fail_count: i64,
    pub memory_and_swap_limit: i64,
    pub memory_and_swap_max_usage: i64,
    pub memory_and_swap_usage: i64,
    pub memory_oom_kill_enabled: bool,

    pub pids_max: i64,
    pub pids_current: i64,

    pub blkio_service_count: i64,
    pub blkio_serviced: i64,
}

impl Metrics {
    /// Reads every metric once.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            provider: self.provider(),

            cpu_period: self.cpu_period(),
            cpu_quota: self.cpu_quota(),
            cpu_shares: self.cpu_shares(),
            cpu_num_periods: self.cpu_num_periods(),
            cpu_num_throttled: self.cpu_num_throttled(),
            cpu_throttled_time: self.cpu_throttled_time(),

            cpu_usage: self.cpu_usage(),
            per_cpu_usage: self.per_cpu_usage(),
            cpu_user_usage: self.cpu_user_usage(),
            cpu_system_usage: self.cpu_system_usage(),

            cpuset_cpus: self.cpuset_cpus(),
            effective_cpuset_cpus: self.effective_cpuset_cpus(),
            cpuset_mems: self.cpuset_mems(),
            effective_cpuset_mems: self.effective_cpuset_mems(),
            cpuset_memory_pressure: self.cpuset_memory_pressure(),
            cpuset_memory_pressure_enabled: self.is_cpuset_memory_pressure_enabled(),

            memory_fail_count: self.memory_fail_count(),
            memory_limit: self.memory_limit(),
            memory_max_usage: self.memory_max_usage(),
            memory_usage: self.memory_usage(),
            memory_soft_limit: self.memory_soft_limit(),
            kernel_memory_fail_count: self.kernel_memory_fail_count(),
            kernel_memory_limit: self.kernel_memory_limit(),
            kernel_memory_max_usage: self.kernel_memory_max_usage(),
            kernel_memory_usage: self.kernel_memory_usage(),
            tcp_memory_fail_count: self.tcp_memory_fail_count(),
            tcp_memory_limit: self.tcp_memory_limit(),
            tcp_memory_max_usage: self.tcp_memory_max_usage(),
            tcp_memory_usage: self.tcp_memory_usage(),
            memory_and_swap_fail_count: self.memory_and_swap_fail_count(),
            memory_and_swap_limit: self.memory_and_swap_limit(),
            memory_and_swap_max_usage: self.memory_and_swap_max_usage(),
            memory_and_swap_usage: self.memory_and_swap_usage(),
            memory_oom_kill_enabled: self.is_memory_oom_kill_enabled(),

            pids_max: self.pids_max(),
            pids_current: self.pids_current(),

            blkio_service_count: self.blkio_service_count(),
            blkio_serviced: self.blkio_serviced(),
        }
    }
}
