/// Turns a `Result` into an `Option`, logging the discarded error.
///
/// Cgroup pseudo-files are routinely missing (controller not mounted, kernel
/// built without swap accounting), so callers pick the level at which the
/// failure is worth reporting.
pub trait ResultOkLogExt<T, E> {
    fn ok_log(self, level: log::Level) -> Option<T>;
}

impl<T, E> ResultOkLogExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error,
{
    fn ok_log(self, level: log::Level) -> Option<T> {
        match self {
            Ok(ok) => Some(ok),
            Err(err) => {
                log::log!(level, "{err}");
                None
            }
        }
    }
}
