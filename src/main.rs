/// Entry point for the `cgroup-metrics` tool.
///
/// Prints the cgroup v1 limits and usage of the current process.
///
/// # Errors
///
/// Returns an error if the proc files can't be read or the configuration is
/// invalid.
///
/// # Examples
///
/// ```bash
/// RUST_LOG=debug cargo run -- --json
/// ```
fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    cgroup_metrics::run()
}
