//! Mountinfo line parser for Linux systems.
//!
//! Parses lines in `/proc/[pid]/mountinfo` format. See
//! [`proc_pid_mountinfo(5)`](https://man7.org/linux/man-pages/man5/proc_pid_mountinfo.5.html)
//! for details on the structure. Only the fields needed to locate cgroup
//! hierarchies are kept.

/// The parts of a mountinfo line relevant for cgroup discovery.
#[derive(Debug, PartialEq, Eq)]
pub struct MountInfo<'a> {
    /// Root of the mount within the filesystem (field 4).
    pub root: &'a str,
    /// Mount point relative to the process's root (field 5).
    pub mount_point: &'a str,
    /// Filesystem type (e.g., `cgroup`, `cgroup2`).
    pub fs_type: &'a str,
    /// Superblock options; for cgroup v1 these name the attached controllers.
    pub super_options: &'a str,
}

impl<'a> MountInfo<'a> {
    /// Iterates over the comma-separated superblock options.
    ///
    /// ```
    /// # use cgroup_metrics::mountinfo::parse_mount_info_line;
    /// let line = "30 23 0:26 / /sys/fs/cgroup/cpu,cpuacct rw - cgroup cgroup rw,cpu,cpuacct";
    /// let info = parse_mount_info_line(line).unwrap();
    /// assert_eq!(info.super_options().collect::<Vec<_>>(), ["rw", "cpu", "cpuacct"]);
    /// ```
    pub fn super_options(&self) -> impl Iterator<Item = &'a str> + use<'a> {
        self.super_options.split(',')
    }
}

/// Named fields in a mountinfo line.
#[derive(Debug, Clone, Copy)]
pub enum MountInfoField {
    MountId,
    ParentId,
    MajorMinor,
    Root,
    MountPoint,
    FsType,
    Source,
    SuperOptions,
}

impl std::fmt::Display for MountInfoField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MountInfoField::MountId => "mount_id",
            MountInfoField::ParentId => "parent_id",
            MountInfoField::MajorMinor => "major:minor",
            MountInfoField::Root => "root",
            MountInfoField::MountPoint => "mount_point",
            MountInfoField::FsType => "fs_type",
            MountInfoField::Source => "source",
            MountInfoField::SuperOptions => "super_options",
        };
        write!(f, "{name}")
    }
}

/// Errors that may occur when parsing a mountinfo line.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("missing separator ` - ` in line: `{0}`")]
    MissingSeparator(String),

    #[error("missing `{field}` in line: `{line}`")]
    MissingField { field: MountInfoField, line: String },
}

/// Parses a single line of mountinfo data.
///
/// The returned [`MountInfo`] borrows from `line`. Optional fields between the
/// mount options and the ` - ` separator are skipped.
///
/// # Errors
///
/// Returns [`ParseError::MissingSeparator`] if the line has no ` - `
/// separator and [`ParseError::MissingField`] naming the first absent field.
pub fn parse_mount_info_line(line: &str) -> Result<MountInfo<'_>, ParseError> {
    let line = line.trim_end();
    let (pre, post) = line
        .split_once(" - ")
        .ok_or_else(|| ParseError::MissingSeparator(line.to_owned()))?;

    let missing = |field| ParseError::MissingField {
        field,
        line: line.to_owned(),
    };

    let mut pre_fields = pre.split_whitespace();
    for field in [
        MountInfoField::MountId,
        MountInfoField::ParentId,
        MountInfoField::MajorMinor,
    ] {
        pre_fields.next().ok_or_else(|| missing(field))?;
    }
    let root = pre_fields.next().ok_or_else(|| missing(MountInfoField::Root))?;
    let mount_point = pre_fields
        .next()
        .ok_or_else(|| missing(MountInfoField::MountPoint))?;

    let mut post_fields = post.split_whitespace();
    let fs_type = post_fields
        .next()
        .ok_or_else(|| missing(MountInfoField::FsType))?;
    post_fields
        .next()
        .ok_or_else(|| missing(MountInfoField::Source))?;
    let super_options = post_fields
        .next()
        .ok_or_else(|| missing(MountInfoField::SuperOptions))?;

    Ok(MountInfo {
        root,
        mount_point,
        fs_type,
        super_options,
    })
}
