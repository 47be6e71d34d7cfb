//! The cgroup v1 metrics facade.
//!
//! [`Metrics`] holds at most one resolved controller per resource domain and
//! exposes one accessor per kernel value. Accessors re-read the pseudo-files on
//! every call and never fail: a missing domain, an unresolvable path, an
//! unreadable file and a kernel "no limit" answer all come back as
//! [`UNLIMITED`](super::stats::UNLIMITED) (or `None` for list values).
//!
//! The accessors are grouped by controller in the submodules of this module.

mod blkio;
mod cpu;
mod cpuacct;
mod cpuset;
mod memory;
mod pids;
mod snapshot;

pub use snapshot::MetricsSnapshot;

use std::collections::HashMap;

use super::controller::{Controller, ControllerDescriptor, ControllerKind, MemoryController};
use super::error::Result;

/// Container limits and usage as seen through the cgroup v1 hierarchy.
#[derive(Debug, Clone)]
pub struct Metrics {
    cpu: Option<Controller>,
    cpuacct: Option<Controller>,
    cpuset: Option<Controller>,
    memory: Option<MemoryController>,
    pids: Option<Controller>,
    blkio: Option<Controller>,
}

impl Metrics {
    pub const PROVIDER: &'static str = "cgroupv1";

    /// Builds the facade from a map of controller descriptors.
    ///
    /// Descriptors without a mount root or mount point are skipped. The memory
    /// controller's hierarchy and swap flags are probed here, once.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if no controller could be attached.
    ///
    /// # Errors
    ///
    /// Returns [`super::Error::UnknownController`] if a descriptor names a
    /// controller outside [`ControllerKind`]. No partial facade is produced in
    /// that case.
    pub fn from_descriptors(
        descriptors: &HashMap<String, ControllerDescriptor>,
    ) -> Result<Option<Metrics>> {
        let mut builder = MetricsBuilder::default();

        for descriptor in descriptors.values() {
            let kind = descriptor.name.parse::<ControllerKind>()?;
            let (Some(root), Some(mount_point)) = (
                descriptor.mount_root.as_deref(),
                descriptor.mount_point.as_deref(),
            ) else {
                log::debug!("skipping incomplete `{kind}` controller descriptor");
                continue;
            };

            let controller = Controller::new(root, mount_point, descriptor.cgroup_path.as_deref());
            log::debug!(
                "attaching `{kind}` controller: root={root}, mount_point={mount_point}, path={:?}",
                controller.path()
            );
            match kind {
                ControllerKind::Cpu => builder.set_cpu(controller),
                ControllerKind::CpuAcct => builder.set_cpuacct(controller),
                ControllerKind::CpuSet => builder.set_cpuset(controller),
                ControllerKind::Memory => builder.set_memory(MemoryController::probe(controller)),
                ControllerKind::Pids => builder.set_pids(controller),
                ControllerKind::Blkio => builder.set_blkio(controller),
            };
        }

        Ok(builder.build())
    }

    /// Name of the backing implementation.
    pub fn provider(&self) -> &'static str {
        Self::PROVIDER
    }

    /// Returns the attached controller for `kind`, if any.
    pub fn controller(&self, kind: ControllerKind) -> Option<&Controller> {
        match kind {
            ControllerKind::Cpu => self.cpu.as_ref(),
            ControllerKind::CpuAcct => self.cpuacct.as_ref(),
            ControllerKind::CpuSet => self.cpuset.as_ref(),
            ControllerKind::Memory => self.memory.as_ref().map(MemoryController::controller),
            ControllerKind::Pids => self.pids.as_ref(),
            ControllerKind::Blkio => self.blkio.as_ref(),
        }
    }

    /// Whether a controller for `kind` is attached.
    pub fn has(&self, kind: ControllerKind) -> bool {
        self.controller(kind).is_some()
    }

    /// Returns the memory controller and its flags, if attached.
    pub fn memory_controller(&self) -> Option<&MemoryController> {
        self.memory.as_ref()
    }
}

/// Collects controllers for a [`Metrics`] under construction.
#[derive(Debug, Default)]
pub struct MetricsBuilder {
    cpu: Option<Controller>,
    cpuacct: Option<Controller>,
    cpuset: Option<Controller>,
    memory: Option<MemoryController>,
    pids: Option<Controller>,
    blkio: Option<Controller>,
}

impl MetricsBuilder {
    pub fn set_cpu(&mut self, controller: Controller) -> &mut Self {
        self.cpu = Some(controller);
        self
    }

    pub fn set_cpuacct(&mut self, controller: Controller) -> &mut Self {
        self.cpuacct = Some(controller);
        self
    }

    pub fn set_cpuset(&mut self, controller: Controller) -> &mut Self {
        self.cpuset = Some(controller);
        self
    }

    pub fn set_memory(&mut self, controller: MemoryController) -> &mut Self {
        self.memory = Some(controller);
        self
    }

    pub fn set_pids(&mut self, controller: Controller) -> &mut Self {
        self.pids = Some(controller);
        self
    }

    pub fn set_blkio(&mut self, controller: Controller) -> &mut Self {
        self.blkio = Some(controller);
        self
    }

    /// Builds the facade.
    ///
    /// Returns `None` if no controller was set, so that "no container support"
    /// stays distinguishable from "everything unlimited".
    pub fn build(self) -> Option<Metrics> {
        let any = self.cpu.is_some()
            || self.cpuacct.is_some()
            || self.cpuset.is_some()
            || self.memory.is_some()
            || self.pids.is_some()
            || self.blkio.is_some();
        if !any {
            return None;
        }

        Some(Metrics {
            cpu: self.cpu,
            cpuacct: self.cpuacct,
            cpuset: self.cpuset,
            memory: self.memory,
            pids: self.pids,
            blkio: self.blkio,
        })
    }
}
