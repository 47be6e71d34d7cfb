use std::path::PathBuf;

use crate::{fsutil, mountinfo};

/// Errors that may occur while discovering cgroup v1 controllers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    FileRead(#[from] fsutil::FileReadError),
    #[error(transparent)]
    MountInfo(#[from] mountinfo::Error),
    #[error("malformed line {line} in `{path}`: `{content}`")]
    MalformedLine {
        path: PathBuf,
        line: usize,
        content: String,
    },
    #[error("all controllers in `{path}` are attached to the unified (cgroup v2) hierarchy")]
    NotCgroupV1 { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, Error>;
