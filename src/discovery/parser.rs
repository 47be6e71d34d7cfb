//! Parsers for the proc files describing cgroup membership.

/// One row of `/proc/cgroups`: `subsys_name hierarchy num_cgroups enabled`.
#[derive(Debug, PartialEq, Eq)]
pub struct Subsystem<'a> {
    pub name: &'a str,
    /// `0` if the controller is attached to the unified hierarchy or unused.
    pub hierarchy_id: u32,
    pub enabled: bool,
}

/// Parses a row of `/proc/cgroups`.
///
/// Returns `None` for lines that do not have four fields with numeric
/// hierarchy id, cgroup count and enabled flag.
pub fn parse_subsystem_line(line: &str) -> Option<Subsystem<'_>> {
    let mut fields = line.split_whitespace();
    let name = fields.next()?;
    let hierarchy_id = fields.next()?.parse().ok()?;
    let _num_cgroups: u64 = fields.next()?.parse().ok()?;
    let enabled = fields.next()?.parse::<u8>().ok()? == 1;

    Some(Subsystem {
        name,
        hierarchy_id,
        enabled,
    })
}

/// One line of `/proc/<pid>/cgroup`: `hierarchy-id:controller-list:cgroup-path`.
#[derive(Debug, PartialEq, Eq)]
pub struct Membership<'a> {
    /// Always `0` for the cgroup v2 entry.
    pub hierarchy_id: u32,
    /// Comma-separated controllers, empty for the cgroup v2 entry.
    pub controllers: &'a str,
    pub path: &'a str,
}

impl<'a> Membership<'a> {
    pub fn controllers(&self) -> impl Iterator<Item = &'a str> + use<'a> {
        self.controllers.split(',').filter(|c| !c.is_empty())
    }
}

/// Parses a line of `/proc/<pid>/cgroup`. The path may itself contain `:`.
pub fn parse_membership_line(line: &str) -> Option<Membership<'_>> {
    let mut fields = line.trim_end().splitn(3, ':');
    let hierarchy_id = fields.next()?.parse().ok()?;
    let controllers = fields.next()?;
    let path = fields.next()?;

    Some(Membership {
        hierarchy_id,
        controllers,
        path,
    })
}
