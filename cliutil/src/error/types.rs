//! Primary error enum for the option binding flows.

use std::io;

use thiserror::Error;

use crate::parse::ParseError;

/// Convenience alias for results produced by the binding engine.
pub type BindResult<T> = Result<T, BindError>;

/// Errors that can occur while declaring flags or populating fields.
///
/// Every failure aborts the walk that produced it. Failures attributable to a
/// single tagged field are wrapped in [`BindError::OptionBinding`] so callers
/// can see which option caused the problem.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BindError {
    /// The value handed to the binding engine does not resolve to a struct.
    #[error("{type_name} passed: value must be a struct")]
    NotAStruct {
        /// Name of the type that was passed.
        type_name: &'static str,
    },

    /// A pointer-like wrapper was empty while resolving the root value.
    #[error("nil passed: value must be a struct")]
    NilValue,

    /// The field's data shape has no built-in handler and no `func` override.
    #[error("type not supported: {type_name}")]
    TypeNotSupported {
        /// Name of the unsupported field type.
        type_name: &'static str,
    },

    /// The tag names a `func` handler that was never registered.
    #[error("option type func not registered: {name}")]
    HandlerNotFound {
        /// Handler name taken from the tag.
        name: String,
    },

    /// The tag's `default` cannot be parsed as the handler's type.
    #[error("invalid default {value:?}: expecting {expected}")]
    InvalidDefault {
        /// Raw default taken from the tag.
        value: String,
        /// Type the handler expected.
        expected: &'static str,
    },

    /// A resolved option value cannot be converted to the requested type.
    #[error("invalid value {value:?}: expecting {expected}")]
    InvalidValue {
        /// Raw value read from the configuration source.
        value: String,
        /// Type the caller expected.
        expected: &'static str,
    },

    /// An integer list value is malformed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A URI uses a scheme the content reader cannot fetch.
    #[error("{scheme}: scheme not supported")]
    SchemeNotSupported {
        /// Scheme component of the rejected URI.
        scheme: String,
    },

    /// Reading a URI or standard input failed.
    #[error("error reading {location}: {source}")]
    Read {
        /// URI, path, or `stdin`.
        location: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// A handler was pointed at a field whose type it cannot write.
    #[error("field of type {found} cannot hold a {expected} value")]
    FieldMismatch {
        /// Type the handler writes.
        expected: &'static str,
        /// Actual field type.
        found: &'static str,
    },

    /// A destination is shared and cannot be borrowed mutably.
    #[error("value of type {type_name} is shared and cannot be set")]
    NotSettable {
        /// Type behind the shared pointer.
        type_name: &'static str,
    },

    /// A flag with the same name has already been declared.
    #[error("flag redefined: {name}")]
    DuplicateFlag {
        /// Name of the conflicting flag.
        name: String,
    },

    /// An option was queried that no flag declares.
    #[error("option not defined: {name}")]
    UndefinedOption {
        /// Name of the undeclared option.
        name: String,
    },

    /// A required option resolved to an empty value.
    #[error("missing required option: {name}")]
    MissingOption {
        /// Name of the missing option.
        name: String,
    },

    /// A failure tied to a specific option.
    #[error("option {option}: {source}")]
    OptionBinding {
        /// Option name taken from the field's tag.
        option: String,
        /// Underlying cause.
        #[source]
        source: Box<BindError>,
    },
}
