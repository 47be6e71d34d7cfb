//! Reading and normalizing cgroup v1 pseudo-files.
//!
//! [`parser`] holds the pure text conversions. The `read_*` helpers in this
//! module resolve a file below a [`Controller`], read it and run the matching
//! parser. A missing controller, a controller without a resolved path and an
//! unreadable file all produce the same result as a "no limit" answer from the
//! kernel: [`UNLIMITED`] or `None`.
//!
//! # Files and their formats
//!
//! - single integer: `cpu.shares`, `memory.limit_in_bytes`, ...
//! - `key value` lines: `cpu.stat`, `cpuacct.stat`, `memory.stat`, `memory.oom_control`
//! - range list: `cpuset.cpus`, `cpuset.mems`, ...
//! - space-separated integers: `cpuacct.usage_percpu`

mod error;
mod parser;

pub use error::StatParseError;
pub use parser::{
    MAX_LIST_ID, OVERFLOW, UNLIMITED, UNLIMITED_MIN, parse_double, parse_keyed_long, parse_limit,
    parse_long, parse_range_list, parse_space_list, try_parse_long, try_parse_range_list,
    try_parse_space_list, unlimited_or_value,
};

use crate::error::ResultOkLogExt;
use crate::fsutil;

use super::Controller;

/// Reads the first line of `file` below the controller's resolved path.
fn read_first_line(controller: Option<&Controller>, file: &str) -> Option<String> {
    let path = controller?.file(file)?;
    fsutil::read_first_line(path).ok_log(log::Level::Trace)
}

/// Reads the whole of `file` below the controller's resolved path.
fn read_contents(controller: Option<&Controller>, file: &str) -> Option<String> {
    let path = controller?.file(file)?;
    fsutil::read_contents(path).ok_log(log::Level::Trace)
}

/// Reads a single integer without applying the unlimited threshold.
///
/// Used for flag probes where the raw magnitude matters.
pub(crate) fn read_raw_long(controller: Option<&Controller>, file: &str) -> i64 {
    read_first_line(controller, file).map_or(UNLIMITED, |line| parse_long(&line))
}

/// Reads a single integer and folds huge values into [`UNLIMITED`].
pub(crate) fn read_long(controller: Option<&Controller>, file: &str) -> i64 {
    unlimited_or_value(read_raw_long(controller, file))
}

/// Reads a number-or-`max` limit.
pub(crate) fn read_limit(controller: Option<&Controller>, file: &str) -> i64 {
    read_first_line(controller, file).map_or(UNLIMITED, |line| parse_limit(&line))
}

/// Reads the value of `key` from a `key value` file, folding huge values
/// into [`UNLIMITED`].
pub(crate) fn read_keyed_long(controller: Option<&Controller>, file: &str, key: &str) -> i64 {
    read_contents(controller, file).map_or(UNLIMITED, |text| {
        unlimited_or_value(parse_keyed_long(&text, key))
    })
}

pub(crate) fn read_double(controller: Option<&Controller>, file: &str) -> f64 {
    read_first_line(controller, file).map_or(UNLIMITED as f64, |line| parse_double(&line))
}

pub(crate) fn read_range_list(controller: Option<&Controller>, file: &str) -> Option<Vec<u32>> {
    parse_range_list(&read_first_line(controller, file)?)
}

pub(crate) fn read_space_list(controller: Option<&Controller>, file: &str) -> Option<Vec<i64>> {
    parse_space_list(&read_first_line(controller, file)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cgroup::metrics::testutil::{controller_in, write_file};

    #[test]
    fn test_read_long_missing_controller() {
        assert_eq!(read_long(None, "cpu.shares"), UNLIMITED);
        assert_eq!(read_range_list(None, "cpuset.cpus"), None);
    }

    #[test]
    fn test_read_long_pathless_controller() {
        let controller = Controller::new("/a/b", "/sys/fs/cgroup/cpu", Some("/x/y"));
        assert!(controller.path().is_none());
        assert_eq!(read_long(Some(&controller), "cpu.shares"), UNLIMITED);
        assert_eq!(read_keyed_long(Some(&controller), "cpu.stat", "nr_periods"), UNLIMITED);
    }

    #[test]
    fn test_read_long_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let controller = controller_in(dir.path());
        assert_eq!(read_long(Some(&controller), "cpu.shares"), UNLIMITED);
        assert_eq!(read_double(Some(&controller), "cpuset.memory_pressure"), -1.0);
    }

    #[test]
    fn test_read_long_applies_threshold_but_raw_does_not() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "memory.limit_in_bytes", "9223372036854771712\n");
        let controller = controller_in(dir.path());
        assert_eq!(read_long(Some(&controller), "memory.limit_in_bytes"), UNLIMITED);
        assert_eq!(
            read_raw_long(Some(&controller), "memory.limit_in_bytes"),
            9_223_372_036_854_771_712
        );
    }

    #[test]
    fn test_read_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "cpu.shares", "");
        write_file(dir.path(), "cpuset.cpus", "\n");
        let controller = controller_in(dir.path());
        assert_eq!(read_long(Some(&controller), "cpu.shares"), UNLIMITED);
        assert_eq!(read_range_list(Some(&controller), "cpuset.cpus"), None);
    }

    #[test]
    fn test_read_keyed_long() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "cpuacct.stat", "user 1234\nsystem 567\n");
        let controller = controller_in(dir.path());
        assert_eq!(read_keyed_long(Some(&controller), "cpuacct.stat", "user"), 1234);
        assert_eq!(read_keyed_long(Some(&controller), "cpuacct.stat", "system"), 567);
        assert_eq!(read_keyed_long(Some(&controller), "cpuacct.stat", "idle"), UNLIMITED);
    }

    #[test]
    fn test_read_limit() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "pids.max", "max\n");
        let controller = controller_in(dir.path());
        assert_eq!(read_limit(Some(&controller), "pids.max"), UNLIMITED);
    }
}
