//! Resolved option values.
//!
//! A [`ConfigSource`] answers "what is the value of option `name`?" by
//! consulting, in order, the value given explicitly on the command line, an
//! environment variable, and the flag's declared default. Environment
//! variables are named by upper-casing the option name, replacing `-` with
//! `_`, and joining it to the prefix with `_`: option `value-one` under
//! prefix `app` reads `APP_VALUE_ONE`.

use std::collections::HashMap;
use std::io::{self, IsTerminal, Read};

use figment::providers::Env;
use uncased::Uncased;

use crate::error::{BindError, BindResult};
use crate::flagger::FlagKind;
use crate::parse::{parse_bool, parse_int_slice};

/// Layered key-value store backing option population.
///
/// Unset options read as the zero value of the requested type.
#[derive(Debug, Clone, Default)]
pub struct ConfigSource {
    env_prefix: Option<String>,
    declared: HashMap<String, String>,
    kinds: HashMap<String, FlagKind>,
    explicit: HashMap<String, String>,
    env: HashMap<Uncased<'static>, String>,
    stdin: Option<String>,
}

impl ConfigSource {
    /// Source without environment variables or declared flags.
    ///
    /// Values are supplied with [`ConfigSource::with_value`] and
    /// [`ConfigSource::with_default`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Source reading a snapshot of the process environment.
    ///
    /// With a prefix only variables starting with `PREFIX_` are considered.
    #[must_use]
    pub fn from_env(prefix: Option<&str>) -> Self {
        let env_prefix = prefix.filter(|p| !p.is_empty()).map(str::to_owned);
        let env = match env_prefix.as_deref() {
            Some(p) => Env::prefixed(&format!("{p}_")).iter().collect(),
            None => Env::raw().iter().collect(),
        };
        Self {
            env_prefix,
            env,
            ..Self::default()
        }
    }

    /// Add an explicit value, as if given on the command line.
    #[must_use]
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.explicit.insert(name.into(), value.into());
        self
    }

    /// Declare option `name` with a default.
    #[must_use]
    pub fn with_default(mut self, name: impl Into<String>, default: impl Into<String>) -> Self {
        self.declared.insert(name.into(), default.into());
        self
    }

    /// Use `text` in place of standard input.
    #[must_use]
    pub fn with_stdin(mut self, text: impl Into<String>) -> Self {
        self.stdin = Some(text.into());
        self
    }

    pub(crate) fn declare(&mut self, name: &str, kind: FlagKind, default: &str) {
        self.declared.insert(name.to_owned(), default.to_owned());
        self.kinds.insert(name.to_owned(), kind);
    }

    pub(crate) fn set(&mut self, name: &str, value: &str) {
        self.explicit.insert(name.to_owned(), value.to_owned());
    }

    /// Environment prefix, if any.
    #[must_use]
    pub fn env_prefix(&self) -> Option<&str> {
        self.env_prefix.as_deref()
    }

    /// Environment variable consulted for option `name`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cliutil::ConfigSource;
    /// let config = ConfigSource::from_env(Some("app"));
    /// assert_eq!(config.env_key("value-one"), "APP_VALUE_ONE");
    /// ```
    #[must_use]
    pub fn env_key(&self, name: &str) -> String {
        let key = name.replace('-', "_").to_uppercase();
        match self.env_prefix.as_deref() {
            Some(prefix) => format!("{}_{key}", prefix.to_uppercase()),
            None => key,
        }
    }

    fn env_value(&self, name: &str) -> Option<&str> {
        let key = Uncased::from_owned(name.replace('-', "_"));
        self.env.get(&key).map(String::as_str)
    }

    /// Whether `name` was given on the command line or in the environment.
    #[must_use]
    pub fn is_set(&self, name: &str) -> bool {
        self.explicit.contains_key(name) || self.env_value(name).is_some()
    }

    /// Whether a flag called `name` was declared.
    #[must_use]
    pub fn is_declared(&self, name: &str) -> bool {
        self.declared.contains_key(name)
    }

    /// Value type of the flag declared as `name`, when declared through a
    /// [`crate::Flagger`].
    #[must_use]
    pub fn kind(&self, name: &str) -> Option<FlagKind> {
        self.kinds.get(name).copied()
    }

    /// Raw value of `name` after applying precedence.
    #[must_use]
    pub fn get_raw(&self, name: &str) -> Option<&str> {
        self.explicit
            .get(name)
            .map(String::as_str)
            .or_else(|| self.env_value(name))
            .or_else(|| self.declared.get(name).map(String::as_str))
    }

    /// String value of `name`, empty when unset.
    #[must_use]
    pub fn get_string(&self, name: &str) -> String {
        self.get_raw(name).unwrap_or_default().to_owned()
    }

    /// Integer value of `name`, zero when unset or empty.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::InvalidValue`] when the value is not an integer.
    pub fn get_int(&self, name: &str) -> BindResult<i64> {
        self.typed(name, "int", |raw| raw.trim().parse().ok())
    }

    /// Float value of `name`, zero when unset or empty.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::InvalidValue`] when the value is not a number.
    pub fn get_float64(&self, name: &str) -> BindResult<f64> {
        self.typed(name, "float64", |raw| raw.trim().parse().ok())
    }

    /// Boolean value of `name`, `false` when unset or empty.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::InvalidValue`] when the value is not a boolean
    /// spelling accepted by [`crate::parse_bool`].
    pub fn get_bool(&self, name: &str) -> BindResult<bool> {
        self.typed(name, "bool", parse_bool)
    }

    /// Integer list value of `name`, empty when unset.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::Parse`] when the list is malformed.
    pub fn get_int_slice(&self, name: &str) -> BindResult<Vec<i64>> {
        Ok(parse_int_slice(self.get_raw(name).unwrap_or_default())?)
    }

    fn typed<T: Default>(
        &self,
        name: &str,
        expected: &'static str,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> BindResult<T> {
        match self.get_raw(name) {
            None | Some("") => Ok(T::default()),
            Some(raw) => parse(raw).ok_or_else(|| BindError::invalid_value(raw, expected)),
        }
    }

    /// Overwrite `target` with the string value of `name` when it is set.
    pub fn set_string_value(&self, name: &str, target: &mut String) {
        if self.is_set(name) {
            *target = self.get_string(name);
        }
    }

    /// Overwrite `target` with the integer value of `name` when it is set.
    ///
    /// # Errors
    ///
    /// See [`ConfigSource::get_int`].
    pub fn set_int_value(&self, name: &str, target: &mut i64) -> BindResult<()> {
        if self.is_set(name) {
            *target = self.get_int(name)?;
        }
        Ok(())
    }

    /// Overwrite `target` with the float value of `name` when it is set.
    ///
    /// # Errors
    ///
    /// See [`ConfigSource::get_float64`].
    pub fn set_float64_value(&self, name: &str, target: &mut f64) -> BindResult<()> {
        if self.is_set(name) {
            *target = self.get_float64(name)?;
        }
        Ok(())
    }

    /// Overwrite `target` with the boolean value of `name` when it is set.
    ///
    /// # Errors
    ///
    /// See [`ConfigSource::get_bool`].
    pub fn set_bool_value(&self, name: &str, target: &mut bool) -> BindResult<()> {
        if self.is_set(name) {
            *target = self.get_bool(name)?;
        }
        Ok(())
    }

    /// Read all of standard input, or the text given to
    /// [`ConfigSource::with_stdin`].
    ///
    /// An interactive terminal yields an empty string instead of blocking.
    pub(crate) fn read_stdin(&self) -> BindResult<String> {
        if let Some(text) = &self.stdin {
            return Ok(text.clone());
        }
        let stdin = io::stdin();
        if stdin.is_terminal() {
            return Ok(String::new());
        }
        let mut buf = String::new();
        stdin
            .lock()
            .read_to_string(&mut buf)
            .map_err(|err| BindError::read("stdin", err))?;
        Ok(buf)
    }
}
