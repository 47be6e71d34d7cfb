use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::path::resolve_path;
use super::{Error, stats};

/// The cgroup v1 controllers the metrics facade knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ControllerKind {
    Cpu,
    CpuAcct,
    CpuSet,
    Memory,
    Pids,
    Blkio,
}

impl ControllerKind {
    pub const ALL: [ControllerKind; 6] = [
        ControllerKind::Cpu,
        ControllerKind::CpuAcct,
        ControllerKind::CpuSet,
        ControllerKind::Memory,
        ControllerKind::Pids,
        ControllerKind::Blkio,
    ];

    /// Name of the controller as used by the kernel in `/proc/cgroups`.
    pub fn name(self) -> &'static str {
        match self {
            ControllerKind::Cpu => "cpu",
            ControllerKind::CpuAcct => "cpuacct",
            ControllerKind::CpuSet => "cpuset",
            ControllerKind::Memory => "memory",
            ControllerKind::Pids => "pids",
            ControllerKind::Blkio => "blkio",
        }
    }
}

impl fmt::Display for ControllerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ControllerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ControllerKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| Error::UnknownController { name: s.to_owned() })
    }
}

/// Where one controller hierarchy is mounted and where this process sits in it.
///
/// Produced by [`crate::discovery`]. Any of the location fields may be missing
/// if the corresponding proc file did not mention the controller; such
/// descriptors are skipped when building [`super::Metrics`].
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ControllerDescriptor {
    /// Controller name, e.g. `memory`.
    pub name: String,
    /// Root of the mount within the hierarchy.
    pub mount_root: Option<String>,
    /// Local mount point of the hierarchy.
    pub mount_point: Option<String>,
    /// This process' path within the hierarchy.
    pub cgroup_path: Option<String>,
}

impl ControllerDescriptor {
    /// Constructs a complete descriptor.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cgroup_metrics::cgroup::ControllerDescriptor;
    /// let memory = ControllerDescriptor::new("memory", "/", "/sys/fs/cgroup/memory", "/user.slice");
    /// assert_eq!(memory.mount_point.as_deref(), Some("/sys/fs/cgroup/memory"));
    /// ```
    pub fn new(
        name: impl Into<String>,
        mount_root: impl Into<String>,
        mount_point: impl Into<String>,
        cgroup_path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            mount_root: Some(mount_root.into()),
            mount_point: Some(mount_point.into()),
            cgroup_path: Some(cgroup_path.into()),
        }
    }

    /// Constructs a descriptor with no location information yet.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A resolved controller: its mount information and, if the process' cgroup
/// lies below the mount root, the directory holding its pseudo-files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Controller {
    root: String,
    mount_point: String,
    path: Option<PathBuf>,
}

impl Controller {
    /// Resolves a controller. Without a `cgroup_path` the controller has no
    /// path and every read through it yields the unlimited sentinel.
    pub fn new(
        root: impl Into<String>,
        mount_point: impl Into<String>,
        cgroup_path: Option<&str>,
    ) -> Self {
        let root = root.into();
        let mount_point = mount_point.into();
        let path = cgroup_path.and_then(|cgroup_path| {
            let path = resolve_path(&root, &mount_point, cgroup_path);
            if path.is_none() {
                log::debug!(
                    "cgroup path `{cgroup_path}` is not below mount root `{root}` of `{mount_point}`"
                );
            }
            path
        });

        Self {
            root,
            mount_point,
            path,
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn mount_point(&self) -> &str {
        &self.mount_point
    }

    /// Directory holding the controller's pseudo-files, if resolvable.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Full path of one pseudo-file of this controller.
    pub fn file(&self, name: &str) -> Option<PathBuf> {
        self.path.as_ref().map(|path| path.join(name))
    }
}

/// The memory controller together with the flags probed once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryController {
    controller: Controller,
    hierarchical: bool,
    swap_enabled: bool,
}

impl MemoryController {
    /// Wraps a controller with explicitly given flags.
    pub fn new(controller: Controller, hierarchical: bool, swap_enabled: bool) -> Self {
        Self {
            controller,
            hierarchical,
            swap_enabled,
        }
    }

    /// Wraps a controller, reading `memory.use_hierarchy` and
    /// `memory.memsw.limit_in_bytes` to seed the flags.
    ///
    /// Swap accounting is considered enabled when the swap limit file exists
    /// and holds a positive value.
    pub fn probe(controller: Controller) -> Self {
        let hierarchical = stats::read_raw_long(Some(&controller), "memory.use_hierarchy") > 0;
        let swap_enabled =
            stats::read_raw_long(Some(&controller), "memory.memsw.limit_in_bytes") > 0;
        log::debug!(
            "memory controller at {:?}: hierarchical={hierarchical}, swap_enabled={swap_enabled}",
            controller.path()
        );
        Self::new(controller, hierarchical, swap_enabled)
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Whether `memory.use_hierarchy` is set, i.e. ancestor limits apply.
    pub fn is_hierarchical(&self) -> bool {
        self.hierarchical
    }

    /// Whether the kernel accounts memory+swap (`memory.memsw.*` files).
    pub fn is_swap_enabled(&self) -> bool {
        self.swap_enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cgroup::metrics::testutil::{controller_in, write_file};

    #[test]
    fn test_controller_kind_round_trip_names() {
        for kind in ControllerKind::ALL {
            assert_eq!(kind.name().parse::<ControllerKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_controller_kind_unknown_name() {
        let err = "net_cls".parse::<ControllerKind>().unwrap_err();
        match err {
            Error::UnknownController { name } => assert_eq!(name, "net_cls"),
        }
    }

    #[test]
    fn test_controller_without_cgroup_path_has_no_path() {
        let controller = Controller::new("/", "/sys/fs/cgroup/cpu", None);
        assert_eq!(controller.path(), None);
        assert_eq!(controller.file("cpu.shares"), None);
    }

    #[test]
    fn test_controller_file() {
        let controller = Controller::new("/", "/sys/fs/cgroup/cpu", Some("/foo"));
        assert_eq!(
            controller.file("cpu.shares"),
            Some(PathBuf::from("/sys/fs/cgroup/cpu/foo/cpu.shares"))
        );
        assert_eq!(controller.root(), "/");
        assert_eq!(controller.mount_point(), "/sys/fs/cgroup/cpu");
    }

    #[test]
    fn test_memory_probe_flags_set() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "memory.use_hierarchy", "1\n");
        write_file(dir.path(), "memory.memsw.limit_in_bytes", "9223372036854771712\n");
        let memory = MemoryController::probe(controller_in(dir.path()));
        assert!(memory.is_hierarchical());
        assert!(memory.is_swap_enabled());
    }

    #[test]
    fn test_memory_probe_flags_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let memory = MemoryController::probe(controller_in(dir.path()));
        assert!(!memory.is_hierarchical());
        assert!(!memory.is_swap_enabled());
    }

    #[test]
    fn test_memory_probe_hierarchy_disabled() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "memory.use_hierarchy", "0\n");
        let memory = MemoryController::probe(controller_in(dir.path()));
        assert!(!memory.is_hierarchical());
    }
}
