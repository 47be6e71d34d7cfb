//! Defines structured error types for parsing cgroup pseudo-file contents.
//!
//! The parsers in [`super::parser`] report failures through [`StatParseError`]
//! internally. None of these errors reach callers of the metric accessors: they
//! are logged and folded into the [`UNLIMITED`](super::UNLIMITED) sentinel or
//! an absent list.
//!
//! # Example
//!
//! ```rust
//! use cgroup_metrics::cgroup::stats::{StatParseError, try_parse_long};
//!
//! let err = try_parse_long("not-a-number").unwrap_err();
//! assert!(matches!(err, StatParseError::InvalidValue { .. }));
//! ```

use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatParseError {
    #[error("invalid integer value '{value}': {source}")]
    InvalidValue {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("invalid floating point value '{value}': {source}")]
    InvalidFloat {
        value: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("invalid range '{value}' in list '{list}'")]
    InvalidRange { value: String, list: String },

    #[error("empty list")]
    EmptyList,
}
