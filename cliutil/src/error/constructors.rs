//! Constructors and inspection helpers for `BindError`.

use std::io;

use super::BindError;

impl BindError {
    /// Attach an option name to this error.
    ///
    /// Errors that already carry an option name are returned unchanged so
    /// nested walks do not stack the same context twice.
    ///
    /// # Examples
    ///
    /// ```
    /// use cliutil::BindError;
    /// let err = BindError::NilValue.for_option("verbose");
    /// assert_eq!(err.option(), Some("verbose"));
    /// ```
    #[must_use]
    pub fn for_option(self, option: &str) -> Self {
        match self {
            wrapped @ Self::OptionBinding { .. } => wrapped,
            other => Self::OptionBinding {
                option: option.to_owned(),
                source: Box::new(other),
            },
        }
    }

    /// Name of the option this error is attached to, if any.
    #[must_use]
    pub fn option(&self) -> Option<&str> {
        match self {
            Self::OptionBinding { option, .. } => Some(option),
            _ => None,
        }
    }

    /// The innermost error, skipping any option context.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::OptionBinding { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub(crate) fn read(location: impl Into<String>, source: io::Error) -> Self {
        Self::Read {
            location: location.into(),
            source,
        }
    }

    pub(crate) fn invalid_value(value: &str, expected: &'static str) -> Self {
        Self::InvalidValue {
            value: value.to_owned(),
            expected,
        }
    }

    pub(crate) fn invalid_default(value: &str, expected: &'static str) -> Self {
        Self::InvalidDefault {
            value: value.to_owned(),
            expected,
        }
    }
}
