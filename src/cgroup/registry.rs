use std::collections::HashMap;
use std::sync::{Mutex, OnceLock, PoisonError};

use super::controller::ControllerDescriptor;
use super::error::Result;
use super::metrics::Metrics;

static GLOBAL: Registry = Registry::new();

/// Holds the one [`Metrics`] instance built from the first set of descriptors
/// that attaches at least one controller.
///
/// Construction attempts are serialized: when several threads race, one
/// builds while the others wait and then return its result. Once a facade is
/// published, later calls return the same instance and ignore their
/// descriptors. An attempt that attaches nothing publishes nothing, so a later
/// call with usable descriptors still builds the facade.
#[derive(Debug, Default)]
pub struct Registry {
    metrics: OnceLock<Metrics>,
    init: Mutex<()>,
}

impl Registry {
    pub const fn new() -> Self {
        Self {
            metrics: OnceLock::new(),
            init: Mutex::new(()),
        }
    }

    /// Returns the facade, building it from `descriptors` if none has been
    /// published yet.
    ///
    /// Returns `None` if no controller could be attached, meaning the process
    /// should size itself by the host's resources.
    ///
    /// # Panics
    ///
    /// Panics if `descriptors` names a controller this crate does not know.
    /// The descriptor set comes from a fixed enumeration, so this indicates the
    /// discovery step and the facade disagree.
    pub fn get_or_init(
        &self,
        descriptors: &HashMap<String, ControllerDescriptor>,
    ) -> Option<&Metrics> {
        self.get_or_init_with(|| Metrics::from_descriptors(descriptors))
    }

    fn get_or_init_with(&self, build: impl FnOnce() -> Result<Option<Metrics>>) -> Option<&Metrics> {
        if let Some(metrics) = self.metrics.get() {
            return Some(metrics);
        }

        // Poisoned only by a build that panicked, which published nothing.
        let _guard = self.init.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(metrics) = self.metrics.get() {
            return Some(metrics);
        }

        match build() {
            Ok(Some(metrics)) => {
                log::debug!("cgroup v1 metrics initialized");
                Some(self.metrics.get_or_init(|| metrics))
            }
            Ok(None) => {
                log::debug!("no cgroup v1 controllers found, container support unavailable");
                None
            }
            Err(err) => panic!("failed to initialize cgroup v1 metrics: {err}"),
        }
    }

    /// Returns the facade if it has been initialized and is available.
    pub fn get(&self) -> Option<&Metrics> {
        self.metrics.get()
    }
}

/// Returns the process-wide facade, building it from `descriptors` on first
/// use. See [`Registry::get_or_init`].
///
/// # Example
///
/// ```no_run
/// use cgroup_metrics::{cgroup, discovery};
///
/// let descriptors = discovery::discover("/proc")?;
/// if let Some(metrics) = cgroup::metrics_for(&descriptors) {
///     println!("memory limit: {}", metrics.memory_limit());
/// }
/// # Ok::<(), discovery::Error>(())
/// ```
pub fn metrics_for(descriptors: &HashMap<String, ControllerDescriptor>) -> Option<&'static Metrics> {
    GLOBAL.get_or_init(descriptors)
}

#[cfg(test)]
mod tests {
    use std::sync::Barrier;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::cgroup::metrics::testutil::write_file;

    fn cpu_descriptors(mount_point: &str) -> HashMap<String, ControllerDescriptor> {
        HashMap::from([(
            "cpu".to_owned(),
            ControllerDescriptor::new("cpu", "/", mount_point, "/"),
        )])
    }

    #[test]
    fn test_registry_returns_same_instance() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::new();
        let first = registry
            .get_or_init(&cpu_descriptors(dir.path().to_str().unwrap()))
            .unwrap();
        let second = registry.get_or_init(&HashMap::new()).unwrap();
        assert!(std::ptr::eq(first, second));
        assert!(std::ptr::eq(first, registry.get().unwrap()));
    }

    #[test]
    fn test_registry_later_descriptors_ignored() {
        let first_dir = tempfile::tempdir().unwrap();
        let second_dir = tempfile::tempdir().unwrap();
        write_file(first_dir.path(), "cpu.shares", "512\n");
        write_file(second_dir.path(), "cpu.shares", "256\n");

        let registry = Registry::new();
        registry.get_or_init(&cpu_descriptors(first_dir.path().to_str().unwrap()));
        let metrics = registry
            .get_or_init(&cpu_descriptors(second_dir.path().to_str().unwrap()))
            .unwrap();
        assert_eq!(metrics.cpu_shares(), 512);
    }

    #[test]
    fn test_registry_retries_after_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "cpu.shares", "512\n");

        let registry = Registry::new();
        assert!(registry.get().is_none());
        assert!(registry.get_or_init(&HashMap::new()).is_none());
        assert!(registry.get().is_none());

        let metrics = registry
            .get_or_init(&cpu_descriptors(dir.path().to_str().unwrap()))
            .unwrap();
        assert_eq!(metrics.cpu_shares(), 512);
        assert!(std::ptr::eq(metrics, registry.get().unwrap()));
    }

    #[test]
    fn test_registry_usable_after_failed_build() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::new();
        let descriptors = HashMap::from([(
            "net_cls".to_owned(),
            ControllerDescriptor::new("net_cls", "/", "/sys/fs/cgroup/net_cls", "/"),
        )]);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            registry.get_or_init(&descriptors);
        }));
        assert!(result.is_err());
        assert!(registry.get().is_none());
        assert!(
            registry
                .get_or_init(&cpu_descriptors(dir.path().to_str().unwrap()))
                .is_some()
        );
    }

    #[test]
    #[should_panic(expected = "unrecognized controller `net_cls`")]
    fn test_registry_unknown_controller_is_fatal() {
        let registry = Registry::new();
        let descriptors = HashMap::from([(
            "net_cls".to_owned(),
            ControllerDescriptor::new("net_cls", "/", "/sys/fs/cgroup/net_cls", "/"),
        )]);
        registry.get_or_init(&descriptors);
    }

    #[test]
    fn test_registry_concurrent_first_use() {
        const THREADS: usize = 16;

        let dir = tempfile::tempdir().unwrap();
        let descriptors = cpu_descriptors(dir.path().to_str().unwrap());
        let registry = Registry::new();
        let builds = AtomicUsize::new(0);
        let barrier = Barrier::new(THREADS);

        let addresses: Vec<usize> = std::thread::scope(|s| {
            let mut handles = Vec::with_capacity(THREADS);
            for _ in 0..THREADS {
                handles.push(s.spawn(|| {
                    barrier.wait();
                    let metrics = registry
                        .get_or_init_with(|| {
                            builds.fetch_add(1, Ordering::SeqCst);
                            Metrics::from_descriptors(&descriptors)
                        })
                        .unwrap();
                    metrics as *const Metrics as usize
                }));
            }
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(addresses.iter().all(|&addr| addr == addresses[0]));
    }
}
