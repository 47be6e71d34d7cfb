/// Errors raised while assembling [`super::Metrics`] from controller descriptors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unrecognized controller `{name}` in descriptor map")]
    UnknownController { name: String },
}

pub type Result<T> = std::result::Result<T, Error>;
