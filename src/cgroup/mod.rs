//! Container limits from the cgroup v1 hierarchy.
//!
//! This module lets a process find out, at startup, which CPU, memory,
//! process-count and block I/O limits the kernel's cgroup v1 controllers
//! currently impose on it, so that it can size heaps and thread pools by the
//! container's limits instead of the whole machine's.
//!
//! # Key Components
//!
//! - [`resolve_path`] — Maps a controller's mount root, mount point and the
//!   process' cgroup path to the directory holding its pseudo-files.
//! - [`Controller`] / [`MemoryController`] — A resolved controller, plus the
//!   memory controller's hierarchy and swap accounting flags.
//! - [`Metrics`] — One controller per resource domain and one accessor per
//!   kernel value.
//! - [`Registry`] / [`metrics_for`] — Builds the [`Metrics`] instance once per
//!   process and hands the same one to every caller.
//! - [`stats`] — Parsing of pseudo-file contents and the [`stats::UNLIMITED`]
//!   sentinel.
//!
//! # Files read
//!
//! - `cpu.cfs_period_us`, `cpu.cfs_quota_us`, `cpu.shares`, `cpu.stat`
//! - `cpuacct.usage`, `cpuacct.usage_percpu`, `cpuacct.stat`
//! - `cpuset.cpus`, `cpuset.mems` and their `effective_` variants
//! - `memory.*` limits, usage and fail counters, `memory.stat`, `memory.oom_control`
//! - `pids.max`, `pids.current`
//! - `blkio.throttle.io_service_bytes`, `blkio.throttle.io_serviced`
//!
//! Nothing is cached: every accessor call reads the kernel's current value.
mod controller;
mod error;
mod metrics;
mod path;
mod registry;
pub mod stats;

pub use controller::{Controller, ControllerDescriptor, ControllerKind, MemoryController};
pub use error::{Error, Result};
pub use metrics::{Metrics, MetricsBuilder, MetricsSnapshot};
pub use path::resolve_path;
pub use registry::{Registry, metrics_for};
