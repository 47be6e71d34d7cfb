use crate::fsutil;

use super::parser::parse_mount_info_line;
use super::{Error, Result};
use std::io::BufRead;
use std::path::Path;

/// A mounted cgroup v1 hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CgroupMount {
    /// Root of the mount within the hierarchy.
    pub root: String,
    /// Where the hierarchy is mounted.
    pub mount_point: String,
    /// Superblock options, among them the names of the attached controllers.
    pub options: Vec<String>,
}

impl CgroupMount {
    /// Whether `controller` is attached to this hierarchy.
    pub fn has_controller(&self, controller: &str) -> bool {
        self.options.iter().any(|opt| opt == controller)
    }
}

/// Lists all cgroup v1 hierarchies in a Linux `mountinfo` file.
///
/// Entries are returned in file order. `cgroup2` mounts are ignored.
///
/// # Errors
///
/// - [`Error::FileOpen`] if the file can't be opened.
/// - [`Error::ReadLine`] if reading from the file fails.
/// - [`Error::Parse`] if a line cannot be parsed.
///
/// # Example
///
/// ```no_run
/// use cgroup_metrics::mountinfo::detect_cgroup1_mounts;
///
/// for mount in detect_cgroup1_mounts("/proc/self/mountinfo").unwrap() {
///     println!("{} -> {:?}", mount.mount_point, mount.options);
/// }
/// ```
pub fn detect_cgroup1_mounts(path: impl AsRef<Path>) -> Result<Vec<CgroupMount>> {
    let path = path.as_ref();
    let buf = fsutil::open_file_reader(path)?;

    detect_cgroup1_mounts_from_reader(buf, path)
}

/// Reader-based implementation of [`detect_cgroup1_mounts`]; `origin` is only
/// used in error messages.
fn detect_cgroup1_mounts_from_reader<R: BufRead>(
    mut reader: R,
    origin: &Path,
) -> Result<Vec<CgroupMount>> {
    let mut line = String::with_capacity(256);
    let mut mounts = Vec::new();

    while reader
        .read_line(&mut line)
        .map_err(|source| Error::ReadLine {
            path: origin.to_path_buf(),
            source,
        })?
        != 0
    {
        if !line.trim().is_empty() {
            let mount_info =
                parse_mount_info_line(line.as_str()).map_err(|source| Error::Parse {
                    path: origin.to_path_buf(),
                    source,
                })?;
            if mount_info.fs_type == "cgroup" {
                log::debug!(
                    "Found `cgroup` mount point with root `{}`: {} ({})",
                    mount_info.root,
                    mount_info.mount_point,
                    mount_info.super_options
                );
                mounts.push(CgroupMount {
                    root: mount_info.root.to_owned(),
                    mount_point: mount_info.mount_point.to_owned(),
                    options: mount_info.super_options().map(str::to_owned).collect(),
                });
            }
        }

        line.clear();
    }

    Ok(mounts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn new_cursor_from_contents(contents: &str) -> Cursor<Vec<u8>> {
        Cursor::new(contents.as_bytes().to_vec())
    }

    const HOST_MOUNTINFO: &str = "\
25 30 0:23 / /sys rw,nosuid,nodev,noexec,relatime shared:7 - sysfs sysfs rw
31 25 0:27 / /sys/fs/cgroup/unified rw,nosuid,nodev,noexec,relatime shared:10 - cgroup2 cgroup2 rw,nsdelegate
32 25 0:28 / /sys/fs/cgroup/memory rw,nosuid,nodev,noexec,relatime shared:14 - cgroup cgroup rw,memory
33 25 0:29 / /sys/fs/cgroup/cpu,cpuacct rw,nosuid,nodev,noexec,relatime shared:15 - cgroup cgroup rw,cpu,cpuacct
";

    #[test]
    fn test_detect_cgroup1_mounts() {
        let path = Path::new("/dummy");
        let reader = new_cursor_from_contents(HOST_MOUNTINFO);

        let mounts = detect_cgroup1_mounts_from_reader(reader, path).unwrap();
        assert_eq!(mounts.len(), 2);
        assert_eq!(mounts[0].mount_point, "/sys/fs/cgroup/memory");
        assert!(mounts[0].has_controller("memory"));
        assert_eq!(mounts[1].root, "/");
        assert!(mounts[1].has_controller("cpu"));
        assert!(mounts[1].has_controller("cpuacct"));
        assert!(!mounts[1].has_controller("cpuset"));
    }

    #[test]
    fn test_detect_no_cgroup1_mounts() {
        let input = "25 1 0:24 / /proc rw,relatime - proc proc rw\n";
        let path = Path::new("/dummy");
        let reader = new_cursor_from_contents(input);

        let mounts = detect_cgroup1_mounts_from_reader(reader, path).unwrap();
        assert!(mounts.is_empty());
    }

    #[test]
    fn test_detect_invalid_line() {
        let input = "invalid mountinfo line";
        let path = Path::new("/dummy");
        let reader = new_cursor_from_contents(input);

        let err = detect_cgroup1_mounts_from_reader(reader, path).unwrap_err();
        match err {
            Error::Parse { path: err_path, .. } => assert_eq!(err_path, path),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_detect_from_tempfile() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(
            tmp,
            "1219 1213 0:28 /docker/abc /sys/fs/cgroup/memory ro,nosuid - cgroup cgroup rw,memory"
        )
        .unwrap();

        let mounts = detect_cgroup1_mounts(tmp.path()).unwrap();
        assert_eq!(
            mounts,
            vec![CgroupMount {
                root: "/docker/abc".to_owned(),
                mount_point: "/sys/fs/cgroup/memory".to_owned(),
                options: vec!["rw".to_owned(), "memory".to_owned()],
            }]
        );
    }

    #[test]
    fn test_detect_missing_file() {
        let err = detect_cgroup1_mounts("/definitely/does/not/exist").unwrap_err();
        assert!(matches!(err, Error::FileOpen(_)));
    }
}
