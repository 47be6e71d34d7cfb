//! Human-readable and JSON renderings of the container limits.

use std::io::Write;

use crate::cgroup::stats::UNLIMITED;
use crate::cgroup::{ControllerKind, Metrics};

/// Output format of [`write_report`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Text,
    Json,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Writes the report for `metrics` to `out`.
///
/// `None` means the process is not constrained by cgroup v1 controllers, which
/// is reported as such rather than as an error.
pub fn write_report<W: Write>(
    out: &mut W,
    metrics: Option<&Metrics>,
    format: Format,
    host_cpus: usize,
    prefer_quota: bool,
) -> Result<(), Error> {
    match (metrics, format) {
        (None, Format::Text) => writeln!(out, "container information not found.")?,
        (None, Format::Json) => writeln!(out, "null")?,
        (Some(metrics), Format::Text) => write_text(out, metrics, host_cpus, prefer_quota)?,
        (Some(metrics), Format::Json) => {
            serde_json::to_writer_pretty(&mut *out, &metrics.snapshot())?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn write_text<W: Write>(
    out: &mut W,
    metrics: &Metrics,
    host_cpus: usize,
    prefer_quota: bool,
) -> std::io::Result<()> {
    let cpuset = metrics.has(ControllerKind::CpuSet);
    let cpu = metrics.has(ControllerKind::Cpu);
    let memory = metrics.has(ControllerKind::Memory);
    let pids = metrics.has(ControllerKind::Pids);

    writeln!(out, "container (cgroup) information:")?;
    writeln!(out, "container_type: {}", metrics.provider())?;
    writeln!(
        out,
        "cpu_cpuset_cpus: {}",
        list_or(cpuset, metrics.cpuset_cpus().as_deref())
    )?;
    writeln!(
        out,
        "cpu_memory_nodes: {}",
        list_or(cpuset, metrics.cpuset_mems().as_deref())
    )?;
    writeln!(
        out,
        "active_processor_count: {}",
        metrics.active_processor_count(host_cpus, prefer_quota)
    )?;
    writeln!(out, "cpu_quota: {}", value_or(cpu, metrics.cpu_quota(), "no quota"))?;
    writeln!(out, "cpu_period: {}", value_or(cpu, metrics.cpu_period(), "no period"))?;
    writeln!(out, "cpu_shares: {}", value_or(cpu, metrics.cpu_shares(), "no shares"))?;

    for (name, value) in [
        ("memory_limit_in_bytes", metrics.memory_limit()),
        ("memory_and_swap_limit_in_bytes", metrics.memory_and_swap_limit()),
        ("memory_soft_limit_in_bytes", metrics.memory_soft_limit()),
        ("memory_usage_in_bytes", metrics.memory_usage()),
        ("memory_max_usage_in_bytes", metrics.memory_max_usage()),
    ] {
        writeln!(out, "{name}: {}", value_or(memory, value, "unlimited"))?;
    }

    writeln!(
        out,
        "maximum number of tasks: {}",
        value_or(pids, metrics.pids_max(), "unlimited")
    )?;
    writeln!(
        out,
        "current number of tasks: {}",
        value_or(pids, metrics.pids_current(), "not supported")
    )?;

    Ok(())
}

/// Renders the value, `fallback` for the sentinel, or "not supported" if the
/// controller is absent.
fn value_or(available: bool, value: i64, fallback: &str) -> String {
    if !available {
        "not supported".to_owned()
    } else if value == UNLIMITED {
        fallback.to_owned()
    } else {
        value.to_string()
    }
}

fn list_or(available: bool, list: Option<&[u32]>) -> String {
    match list {
        Some(list) if available => format_range_list(list),
        _ => "not supported".to_owned(),
    }
}

/// Formats sorted ids in the kernel's range-list notation.
///
/// ```
/// # use cgroup_metrics::report::format_range_list;
/// assert_eq!(format_range_list(&[0, 1, 2, 3, 5, 7, 8]), "0-3,5,7-8");
/// assert_eq!(format_range_list(&[]), "");
/// ```
pub fn format_range_list(ids: &[u32]) -> String {
    let mut parts = Vec::new();
    let mut iter = ids.iter().copied().peekable();

    while let Some(start) = iter.next() {
        let mut end = start;
        while iter.peek() == Some(&(end + 1)) {
            end += 1;
            iter.next();
        }
        if start == end {
            parts.push(start.to_string());
        } else {
            parts.push(format!("{start}-{end}"));
        }
    }

    parts.join(",")
}
