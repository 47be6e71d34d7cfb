//! Discovery of the cgroup v1 controllers this process belongs to.
//!
//! Combines three proc files into one [`ControllerDescriptor`] per controller:
//!
//! - `/proc/cgroups`: which controllers the kernel has and whether they are
//!   enabled and attached to a v1 hierarchy.
//! - `/proc/self/mountinfo`: where each hierarchy is mounted and at which root.
//! - `/proc/self/cgroup`: the process' path in each hierarchy.
//!
//! The result feeds [`crate::cgroup::metrics_for`]. [`affinity_cpu_count`]
//! reads `/proc/self/status` for the host CPU count the limits are applied to.
mod error;
mod parser;

pub use error::{Error, Result};
pub use parser::{Membership, Subsystem, parse_membership_line, parse_subsystem_line};

use std::collections::HashMap;
use std::path::Path;

use crate::cgroup::{ControllerDescriptor, ControllerKind, stats};
use crate::error::ResultOkLogExt;
use crate::fsutil;
use crate::mountinfo::{self, CgroupMount};

/// Preferred location of cgroup v1 mounts when a controller is mounted twice.
const CGROUP_MOUNT_PREFIX: &str = "/sys/fs/cgroup";

/// Discovers the cgroup v1 controllers of the current process.
///
/// # Arguments
///
/// * `proc_root` - Mount point of procfs, normally `/proc`.
///
/// # Returns
///
/// A map from controller name to descriptor. Descriptors may lack a mount or
/// a cgroup path if the corresponding file did not mention the controller.
/// The map is empty if none of the known controllers is enabled.
///
/// # Errors
///
/// - [`Error::FileRead`] / [`Error::MountInfo`] if a proc file can't be read.
/// - [`Error::MalformedLine`] if `/proc/cgroups` or `/proc/self/cgroup` has
///   an unparsable line.
/// - [`Error::NotCgroupV1`] if every enabled controller sits in the unified
///   hierarchy.
pub fn discover(proc_root: impl AsRef<Path>) -> Result<HashMap<String, ControllerDescriptor>> {
    let proc_root = proc_root.as_ref();

    let mut descriptors = read_subsystems(&proc_root.join("cgroups"))?;
    if descriptors.is_empty() {
        log::debug!("no known cgroup v1 controllers enabled");
        return Ok(descriptors);
    }

    let mounts = mountinfo::detect_cgroup1_mounts(proc_root.join("self/mountinfo"))?;
    assign_mounts(&mut descriptors, &mounts);

    assign_cgroup_paths(&mut descriptors, &proc_root.join("self/cgroup"))?;

    Ok(descriptors)
}

/// Number of CPUs this process may be scheduled on, from the
/// `Cpus_allowed_list` line of `/proc/self/status`.
///
/// The affinity mask is independent of the CFS quota, so this is the host
/// side of [`crate::cgroup::Metrics::active_processor_count`]. Returns `None`
/// if the file or the line can't be read.
pub fn affinity_cpu_count(proc_root: impl AsRef<Path>) -> Option<usize> {
    let path = proc_root.as_ref().join("self/status");
    let contents = fsutil::read_contents(&path).ok_log(log::Level::Debug)?;
    let list = contents
        .lines()
        .find_map(|line| line.strip_prefix("Cpus_allowed_list:"))?;
    let count = stats::parse_range_list(list)?.len();
    (count > 0).then_some(count)
}

/// Reads `/proc/cgroups`, keeping the enabled controllers known to
/// [`ControllerKind`].
fn read_subsystems(path: &Path) -> Result<HashMap<String, ControllerDescriptor>> {
    let contents = fsutil::read_contents(path)?;
    let mut descriptors = HashMap::new();
    let mut any_v1 = false;

    for (idx, line) in contents.lines().enumerate() {
        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }
        let subsystem = parser::parse_subsystem_line(line).ok_or_else(|| Error::MalformedLine {
            path: path.to_path_buf(),
            line: idx + 1,
            content: line.to_owned(),
        })?;

        if !subsystem.enabled || subsystem.name.parse::<ControllerKind>().is_err() {
            continue;
        }
        any_v1 |= subsystem.hierarchy_id != 0;
        descriptors.insert(
            subsystem.name.to_owned(),
            ControllerDescriptor::named(subsystem.name),
        );
    }

    if !descriptors.is_empty() && !any_v1 {
        return Err(Error::NotCgroupV1 {
            path: path.to_path_buf(),
        });
    }

    Ok(descriptors)
}

/// Attaches mount root and mount point to each descriptor. The first mount
/// naming a controller wins, unless a later one lives under `/sys/fs/cgroup`
/// and the earlier one does not.
fn assign_mounts(descriptors: &mut HashMap<String, ControllerDescriptor>, mounts: &[CgroupMount]) {
    for (name, descriptor) in descriptors.iter_mut() {
        for mount in mounts.iter().filter(|m| m.has_controller(name)) {
            let replace = match descriptor.mount_point.as_deref() {
                None => true,
                Some(current) => {
                    !current.starts_with(CGROUP_MOUNT_PREFIX)
                        && mount.mount_point.starts_with(CGROUP_MOUNT_PREFIX)
                }
            };
            if replace {
                descriptor.mount_root = Some(mount.root.clone());
                descriptor.mount_point = Some(mount.mount_point.clone());
            }
        }
    }
}

/// Attaches this process' cgroup path from `/proc/self/cgroup` to each
/// descriptor.
fn assign_cgroup_paths(
    descriptors: &mut HashMap<String, ControllerDescriptor>,
    path: &Path,
) -> Result<()> {
    let contents = fsutil::read_contents(path)?;

    for (idx, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let membership = parser::parse_membership_line(line).ok_or_else(|| Error::MalformedLine {
            path: path.to_path_buf(),
            line: idx + 1,
            content: line.to_owned(),
        })?;
        if membership.hierarchy_id == 0 {
            continue;
        }

        for controller in membership.controllers() {
            if let Some(descriptor) = descriptors.get_mut(controller) {
                descriptor.cgroup_path = Some(membership.path.to_owned());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const CGROUPS: &str = "\
#subsys_name\thierarchy\tnum_cgroups\tenabled
cpuset\t2\t1\t1
cpu\t4\t90\t1
cpuacct\t4\t90\t1
blkio\t9\t90\t1
memory\t5\t130\t1
devices\t7\t90\t1
freezer\t8\t1\t1
net_cls\t3\t1\t1
perf_event\t6\t1\t1
hugetlb\t10\t1\t1
pids\t11\t95\t0
rdma\t12\t1\t1
";

    const MOUNTINFO: &str = "\
1219 1213 0:28 /docker/abc /sys/fs/cgroup/memory ro,nosuid - cgroup cgroup rw,memory
1220 1213 0:29 /docker/abc /sys/fs/cgroup/cpu,cpuacct ro,nosuid - cgroup cgroup rw,cpu,cpuacct
1221 1213 0:30 /docker/abc /sys/fs/cgroup/cpuset ro,nosuid - cgroup cgroup rw,cpuset
1222 1213 0:31 /docker/abc /sys/fs/cgroup/blkio ro,nosuid - cgroup cgroup rw,blkio
1223 1213 0:32 /docker/abc /sys/fs/cgroup/devices ro,nosuid - cgroup cgroup rw,devices
";

    const SELF_CGROUP: &str = "\
12:rdma:/
11:pids:/docker/abc
9:blkio:/docker/abc
5:memory:/docker/abc
4:cpu,cpuacct:/docker/abc
2:cpuset:/docker/abc
1:name=systemd:/docker/abc
0::/system.slice/containerd.service
";

    fn fake_proc(cgroups: &str, mountinfo: &str, self_cgroup: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("self")).unwrap();
        fs::write(dir.path().join("cgroups"), cgroups).unwrap();
        fs::write(dir.path().join("self/mountinfo"), mountinfo).unwrap();
        fs::write(dir.path().join("self/cgroup"), self_cgroup).unwrap();
        dir
    }

    #[test]
    fn test_discover_container() {
        let proc_root = fake_proc(CGROUPS, MOUNTINFO, SELF_CGROUP);
        let descriptors = discover(proc_root.path()).unwrap();

        let mut names: Vec<_> = descriptors.keys().map(String::as_str).collect();
        names.sort_unstable();
        assert_eq!(names, ["blkio", "cpu", "cpuacct", "cpuset", "memory"]);

        assert_eq!(
            descriptors["memory"],
            ControllerDescriptor::new("memory", "/docker/abc", "/sys/fs/cgroup/memory", "/docker/abc")
        );
        assert_eq!(
            descriptors["cpuacct"].mount_point.as_deref(),
            Some("/sys/fs/cgroup/cpu,cpuacct")
        );
    }

    #[test]
    fn test_discover_feeds_metrics() {
        let proc_root = fake_proc(CGROUPS, MOUNTINFO, SELF_CGROUP);
        let descriptors = discover(proc_root.path()).unwrap();
        let metrics = crate::cgroup::Metrics::from_descriptors(&descriptors)
            .unwrap()
            .unwrap();
        assert!(metrics.has(ControllerKind::Memory));
        assert!(!metrics.has(ControllerKind::Pids));
        assert_eq!(
            metrics.controller(ControllerKind::Memory).unwrap().path(),
            Some(Path::new("/sys/fs/cgroup/memory"))
        );
    }

    #[test]
    fn test_discover_missing_mount_leaves_descriptor_incomplete() {
        let mountinfo = "1219 1213 0:28 / /sys/fs/cgroup/memory rw - cgroup cgroup rw,memory\n";
        let proc_root = fake_proc(CGROUPS, mountinfo, SELF_CGROUP);
        let descriptors = discover(proc_root.path()).unwrap();
        assert_eq!(descriptors["cpu"].mount_point, None);
        assert_eq!(descriptors["cpu"].cgroup_path.as_deref(), Some("/docker/abc"));
    }

    #[test]
    fn test_discover_prefers_sys_fs_cgroup_mount() {
        let mountinfo = "\
40 30 0:28 / /mnt/memory rw - cgroup cgroup rw,memory
41 30 0:28 / /sys/fs/cgroup/memory rw - cgroup cgroup rw,memory
42 30 0:28 / /other/memory rw - cgroup cgroup rw,memory
";
        let proc_root = fake_proc("memory 5 1 1\n", mountinfo, "5:memory:/\n");
        let descriptors = discover(proc_root.path()).unwrap();
        assert_eq!(
            descriptors["memory"].mount_point.as_deref(),
            Some("/sys/fs/cgroup/memory")
        );
    }

    #[test]
    fn test_discover_unified_hierarchy() {
        let cgroups = "#subsys_name\thierarchy\tnum_cgroups\tenabled\ncpu\t0\t90\t1\nmemory\t0\t90\t1\n";
        let proc_root = fake_proc(cgroups, "", "0::/\n");
        let err = discover(proc_root.path()).unwrap_err();
        assert!(matches!(err, Error::NotCgroupV1 { .. }));
    }

    #[test]
    fn test_discover_nothing_enabled() {
        let proc_root = fake_proc("#subsys_name\thierarchy\tnum_cgroups\tenabled\n", "", "");
        assert!(discover(proc_root.path()).unwrap().is_empty());
    }

    #[test]
    fn test_discover_malformed_cgroups() {
        let proc_root = fake_proc("memory five\n", "", "");
        let err = discover(proc_root.path()).unwrap_err();
        match err {
            Error::MalformedLine { line, content, .. } => {
                assert_eq!(line, 1);
                assert_eq!(content, "memory five");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_discover_missing_proc() {
        let err = discover("/definitely/does/not/exist").unwrap_err();
        assert!(matches!(err, Error::FileRead(_)));
    }

    #[test]
    fn test_affinity_cpu_count() {
        let proc_root = fake_proc(CGROUPS, MOUNTINFO, SELF_CGROUP);
        fs::write(
            proc_root.path().join("self/status"),
            "Name:\tcat\nThreads:\t1\nCpus_allowed:\tff\nCpus_allowed_list:\t0-5,8\n",
        )
        .unwrap();
        assert_eq!(affinity_cpu_count(proc_root.path()), Some(7));
    }

    #[test]
    fn test_affinity_cpu_count_unreadable() {
        let proc_root = fake_proc(CGROUPS, MOUNTINFO, SELF_CGROUP);
        assert_eq!(affinity_cpu_count(proc_root.path()), None);

        fs::write(proc_root.path().join("self/status"), "Name:\tcat\n").unwrap();
        assert_eq!(affinity_cpu_count(proc_root.path()), None);
    }
}
