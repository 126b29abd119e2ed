//! A small leveled logger layered over `tracing`.
//!
//! [`LeveledLogger`] filters messages against a configured [`LogLevel`] and
//! emits the survivors as `tracing` events carrying the level label, the
//! message, an optional error, and the logger's [`LogTags`]. Installing a
//! subscriber is left to the application.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::Level;
use uuid::Uuid;

use crate::validate::{has_space, is_letters};

/// Tag naming the file being processed.
pub const TAG_FILE: &str = "file";
/// Tag carrying the transaction identifier.
pub const TAG_TRANSACTION_ID: &str = "transid";
/// Tag naming the URL being processed.
pub const TAG_URL: &str = "url";

/// Verbosity threshold, from least to most verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LogLevel {
    /// Log nothing.
    None,
    /// Unrecoverable failures.
    Fatal,
    /// Recoverable failures.
    Error,
    /// Significant but expected conditions.
    Notice,
    /// Progress messages.
    #[default]
    Info,
    /// Diagnostic detail.
    Debug,
}

impl LogLevel {
    /// Parse a level name case-insensitively, falling back to
    /// [`LogLevel::Info`] for unknown names.
    ///
    /// # Examples
    ///
    /// ```
    /// use cliutil::LogLevel;
    /// assert_eq!(LogLevel::parse("DEBUG"), LogLevel::Debug);
    /// assert_eq!(LogLevel::parse("chatty"), LogLevel::Info);
    /// ```
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "none" => Self::None,
            "fatal" => Self::Fatal,
            "error" => Self::Error,
            "notice" => Self::Notice,
            "debug" => Self::Debug,
            _ => Self::Info,
        }
    }

    /// Lower-case level name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Fatal => "fatal",
            Self::Error => "error",
            Self::Notice => "notice",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Fatal => "FATAL",
            Self::Error => "ERROR",
            Self::Notice => "NOTICE",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        }
    }
}

impl FromStr for LogLevel {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected log tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum LogTagError {
    /// Tag keys must consist of letters only.
    #[error("key must only contain letters: {key:?} passed")]
    InvalidKey {
        /// The rejected key.
        key: String,
    },
}

/// Ordered `key=value` pairs appended to every log line.
///
/// Values containing whitespace are rendered quoted.
///
/// # Examples
///
/// ```
/// use cliutil::LogTags;
/// # fn main() -> Result<(), cliutil::LogTagError> {
/// let tags = LogTags::new().with("file", "a.txt")?.with("note", "two words")?;
/// assert_eq!(tags.to_string(), r#"file=a.txt note="two words""#);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogTags {
    entries: Vec<(String, String)>,
}

impl LogTags {
    /// No tags.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a tag.
    ///
    /// # Errors
    ///
    /// Returns [`LogTagError::InvalidKey`] when `key` is empty or contains
    /// anything other than letters.
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Result<Self, LogTagError> {
        if !is_letters(key) {
            return Err(LogTagError::InvalidKey {
                key: key.to_owned(),
            });
        }
        self.entries.push((key.to_owned(), value.into()));
        Ok(self)
    }

    /// Most recent value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether no tags are set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for LogTags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            if has_space(value) {
                write!(f, "{key}={value:?}")?;
            } else {
                write!(f, "{key}={value}")?;
            }
        }
        Ok(())
    }
}

/// Logger that drops messages above its configured verbosity.
#[derive(Debug, Clone, Default)]
pub struct LeveledLogger {
    level: LogLevel,
    tags: LogTags,
}

impl LeveledLogger {
    /// Logger emitting messages at `level` and below.
    #[must_use]
    pub const fn new(level: LogLevel) -> Self {
        Self {
            level,
            tags: LogTags::new(),
        }
    }

    /// Add a random transaction identifier under the `transid` tag.
    #[must_use]
    pub fn with_transaction_id(mut self) -> Self {
        let id = Uuid::new_v4().simple().to_string();
        self.tags
            .entries
            .push((TAG_TRANSACTION_ID.to_owned(), id));
        self
    }

    /// Add a tag to every subsequent message.
    ///
    /// # Errors
    ///
    /// See [`LogTags::with`].
    pub fn with_tag(self, key: &str, value: impl Into<String>) -> Result<Self, LogTagError> {
        Ok(Self {
            level: self.level,
            tags: self.tags.with(key, value)?,
        })
    }

    /// Configured level.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }

    /// Current tags.
    #[must_use]
    pub const fn tags(&self) -> &LogTags {
        &self.tags
    }

    /// Transaction identifier, if one was added.
    #[must_use]
    pub fn transaction_id(&self) -> Option<&str> {
        self.tags.get(TAG_TRANSACTION_ID)
    }

    /// Whether messages at `level` are emitted.
    #[must_use]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level != LogLevel::None && level <= self.level
    }

    fn emit(&self, level: LogLevel, message: &str, err: Option<&dyn fmt::Display>) {
        if !self.enabled(level) {
            return;
        }
        let label = level.label();
        let error = err.map(tracing::field::display);
        let tags = &self.tags;
        match level {
            LogLevel::Fatal | LogLevel::Error => {
                tracing::event!(Level::ERROR, level = label, error, %tags, "{message}");
            }
            LogLevel::Notice => {
                tracing::event!(Level::WARN, level = label, error, %tags, "{message}");
            }
            LogLevel::Info => {
                tracing::event!(Level::INFO, level = label, error, %tags, "{message}");
            }
            LogLevel::Debug | LogLevel::None => {
                tracing::event!(Level::DEBUG, level = label, error, %tags, "{message}");
            }
        }
    }

    /// Log at fatal level and exit the process with status 1.
    pub fn fatal(&self, message: &str, err: &dyn fmt::Display) -> ! {
        self.emit(LogLevel::Fatal, message, Some(err));
        std::process::exit(1)
    }

    /// [`LeveledLogger::fatal`] when `result` is an error; otherwise returns
    /// the success value.
    pub fn fatal_if_error<T, E: fmt::Display>(&self, message: &str, result: Result<T, E>) -> T {
        match result {
            Ok(value) => value,
            Err(err) => self.fatal(message, &err),
        }
    }

    /// Log a recoverable failure.
    pub fn error(&self, message: &str, err: &dyn fmt::Display) {
        self.emit(LogLevel::Error, message, Some(err));
    }

    /// [`LeveledLogger::error`] when `result` is an error.
    pub fn error_if_error<T, E: fmt::Display>(&self, message: &str, result: &Result<T, E>) {
        if let Err(err) = result {
            self.error(message, err);
        }
    }

    /// Log a notice.
    pub fn notice(&self, message: &str) {
        self.emit(LogLevel::Notice, message, None);
    }

    /// Log progress.
    pub fn info(&self, message: &str) {
        self.emit(LogLevel::Info, message, None);
    }

    /// Log diagnostic detail.
    pub fn debug(&self, message: &str) {
        self.emit(LogLevel::Debug, message, None);
    }
}

#[cfg(test)]
mod tests;
