//! Pretty JSON rendering with optional JMESPath filtering.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use thiserror::Error;

/// Failure rendering a value as JSON.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RenderError {
    /// The value could not be serialised.
    #[error("failed to serialise value: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The filter failed to compile or to evaluate.
    #[error("invalid filter {filter:?}: {reason}")]
    Query {
        /// The JMESPath expression that was applied.
        filter: String,
        /// What went wrong.
        reason: String,
    },

    /// Writing the rendered output failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Render `value` as JSON indented with four spaces.
///
/// # Errors
///
/// Returns [`RenderError::Serialize`] when `value` cannot be serialised.
///
/// # Examples
///
/// ```
/// let out = cliutil::format_json(&serde_json::json!({"a": 1}))?;
/// assert_eq!(out, "{\n    \"a\": 1\n}");
/// # Ok::<(), cliutil::RenderError>(())
/// ```
pub fn format_json<T: Serialize + ?Sized>(value: &T) -> Result<String, RenderError> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Render the result of applying the JMESPath expression `filter` to `value`.
///
/// An empty filter selects the whole document. An expression that selects
/// nothing renders as `null`.
///
/// # Errors
///
/// Returns [`RenderError::Query`] when `filter` is not a valid expression or
/// fails at runtime, or [`RenderError::Serialize`] when `value` cannot be
/// serialised.
///
/// # Examples
///
/// ```
/// let doc = serde_json::json!({"items": [{"name": "a"}, {"name": "b"}]});
/// let out = cliutil::format_json_with_filter(&doc, "items[1].name")?;
/// assert_eq!(out, "\"b\"");
/// # Ok::<(), cliutil::RenderError>(())
/// ```
pub fn format_json_with_filter<T: Serialize + ?Sized>(
    value: &T,
    filter: &str,
) -> Result<String, RenderError> {
    if filter.is_empty() {
        return format_json(value);
    }
    let query_error = |err: jmespath::JmespathError| RenderError::Query {
        filter: filter.to_owned(),
        reason: err.to_string(),
    };
    let expression = jmespath::compile(filter).map_err(query_error)?;
    let document: Value = serde_json::to_value(value)?;
    let selected = expression.search(document).map_err(query_error)?;
    format_json(&*selected)
}

/// Write [`format_json`] output and a newline to standard output.
///
/// # Errors
///
/// See [`format_json`]; also fails when standard output is closed.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), RenderError> {
    let out = format_json(value)?;
    writeln!(io::stdout().lock(), "{out}")?;
    Ok(())
}

/// Write [`format_json_with_filter`] output and a newline to standard output.
///
/// # Errors
///
/// See [`format_json_with_filter`].
pub fn print_json_with_filter<T: Serialize + ?Sized>(
    value: &T,
    filter: &str,
) -> Result<(), RenderError> {
    let out = format_json_with_filter(value, filter)?;
    writeln!(io::stdout().lock(), "{out}")?;
    Ok(())
}
