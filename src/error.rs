//! Error types for directive parsing and schema derivation.
//!
//! Two classes of failure exist:
//! - grammar errors: malformed token sequences, unknown module or submodule
//!   names, malformed `key=value` elements
//! - domain validation errors: enumerated-value violations, cross-field
//!   violations, unsupported validation keys
//!
//! Both abort the whole generation pass; a code-generation run either
//! produces a complete, consistent output or nothing. Recursion containment
//! in the schema deriver is *not* an error (self-referential types truncate
//! to an empty object schema).

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The first non-header token does not name a registered module.
    #[error("unknown directive module {module:?} in {line:?}")]
    UnknownModule { module: String, line: String },

    /// A descent token does not name a submodule of the current module.
    #[error("unknown submodule {submodule:?} of module {module:?}")]
    UnknownSubmodule { module: String, submodule: String },

    /// An element of a comma-separated payload is not a `key=value` pair.
    #[error("directive payload must be key=value pairs, got {element:?} in {payload:?}")]
    MalformedKeyValue { element: String, payload: String },

    /// The resource handler received a key other than `path` or `shortName`.
    #[error("invalid resource directive key {key:?}")]
    InvalidResourceKey { key: String },

    /// A printcolumn directive violated its grammar or cross-field checks.
    #[error("invalid printcolumn directive: {reason} in {payload:?}")]
    PrintColumn { reason: String, payload: String },

    /// A validation constraint line failed to parse.
    #[error("invalid validation constraint {line:?}: {reason}")]
    Validation { line: String, reason: String },

    /// No domain was supplied via options or a `+domain=` directive.
    #[error("no domain configured: expected an option or a +domain=<domain> directive")]
    MissingDomain,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn validation(line: &str, reason: impl Into<String>) -> Self {
        Error::Validation {
            line: line.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn printcolumn(payload: &str, reason: impl Into<String>) -> Self {
        Error::PrintColumn {
            reason: reason.into(),
            payload: payload.to_string(),
        }
    }
}
