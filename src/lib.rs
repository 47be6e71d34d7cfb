use std::io::Write;
use std::path::PathBuf;

/// cgroup-metrics: container resource limits as seen through cgroup v1.
///
/// This library discovers the cgroup v1 controllers a process belongs to,
/// exposes the kernel's current CPU, memory, pids and block I/O limits and
/// usage through a single process-wide facade, and renders them as a report.
pub mod cgroup;
pub mod discovery;
pub mod error;
pub mod fsutil;
pub mod mountinfo;
pub mod report;

/// Runs the `cgroup-metrics` command.
///
/// Discovers this process' controllers below `PROC_MOUNT_PATH` (default
/// `/proc`), builds the shared [`cgroup::Metrics`] and prints the report to
/// stdout. `PREFER_CONTAINER_QUOTA` (default `true`) selects how quota and
/// shares combine into the active processor count. Passing `--json` prints the
/// full snapshot as JSON.
///
/// # Errors
///
/// Possible errors include:
/// - Unreadable or malformed proc files.
/// - An invalid `PREFER_CONTAINER_QUOTA` value.
/// - Failure to write to stdout.
///
/// A pure cgroup v2 host is not an error: the report states that container
/// information was not found.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let proc_root = std::env::var_os("PROC_MOUNT_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/proc"));
    let prefer_quota = match std::env::var("PREFER_CONTAINER_QUOTA") {
        Ok(value) => value.parse::<bool>().map_err(|err| {
            format!("invalid value `{value}` for `PREFER_CONTAINER_QUOTA`: {err}")
        })?,
        Err(_) => true,
    };
    let format = if std::env::args().skip(1).any(|arg| arg == "--json") {
        report::Format::Json
    } else {
        report::Format::Text
    };
    log::debug!("Proc root: {}", proc_root.display());

    let metrics = match discovery::discover(&proc_root) {
        Ok(descriptors) => {
            log::debug!("Discovered {} cgroup v1 controllers", descriptors.len());
            cgroup::metrics_for(&descriptors)
        }
        Err(discovery::Error::NotCgroupV1 { path }) => {
            log::info!("`{}` lists no cgroup v1 hierarchy", path.display());
            None
        }
        Err(err) => return Err(err.into()),
    };
    if metrics.is_none() {
        log::warn!("cgroup v1 container support is unavailable");
    }

    // `num_cpus::get` is already limited by the CFS quota.
    let host_cpus = discovery::affinity_cpu_count(&proc_root).unwrap_or_else(num_cpus::get);
    let mut stdout = std::io::stdout().lock();
    report::write_report(&mut stdout, metrics, format, host_cpus, prefer_quota)?;
    stdout.flush()?;

    Ok(())
}
