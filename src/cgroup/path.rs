use std::path::PathBuf;

/// Computes the directory holding a controller's pseudo-files.
///
/// A cgroup v1 hierarchy may be mounted at an offset from its true root (for
/// example when a container runtime bind-mounts only the container's own
/// subtree), so the mount point cannot simply be joined with the process'
/// cgroup path.
///
/// # Arguments
///
/// * `root` - Root of the mount within the hierarchy (mountinfo field 4).
/// * `mount_point` - Where the hierarchy is mounted locally.
/// * `cgroup_path` - The process' path in the hierarchy, from `/proc/self/cgroup`.
///
/// # Returns
///
/// `None` if `cgroup_path` does not lie below `root`.
///
/// # Examples
///
/// ```
/// # use std::path::PathBuf;
/// # use cgroup_metrics::cgroup::resolve_path;
/// assert_eq!(
///     resolve_path("/", "/sys/fs/cgroup/memory", "/user.slice"),
///     Some(PathBuf::from("/sys/fs/cgroup/memory/user.slice"))
/// );
/// assert_eq!(
///     resolve_path("/docker/abc", "/sys/fs/cgroup/memory", "/docker/abc"),
///     Some(PathBuf::from("/sys/fs/cgroup/memory"))
/// );
/// assert_eq!(resolve_path("/a/b", "/sys/fs/cgroup/memory", "/x/y"), None);
/// ```
pub fn resolve_path(root: &str, mount_point: &str, cgroup_path: &str) -> Option<PathBuf> {
    if root == "/" {
        if cgroup_path == "/" {
            return Some(PathBuf::from(mount_point));
        }
        // cgroup_path is absolute, `Path::join` would discard the mount point
        return Some(PathBuf::from(format!("{mount_point}{cgroup_path}")));
    }

    if root == cgroup_path {
        return Some(PathBuf::from(mount_point));
    }

    match cgroup_path.strip_prefix(root) {
        Some(suffix) if !suffix.is_empty() => {
            Some(PathBuf::from(format!("{mount_point}{suffix}")))
        }
        _ => None,
    }
}
