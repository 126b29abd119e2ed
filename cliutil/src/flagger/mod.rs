//! Flag declaration on top of a `clap::Command`.
//!
//! [`Flagger`] owns the command being built and records every flag it adds,
//! so the parsed matches can later be turned into a [`ConfigSource`] that
//! layers command-line values over the environment and declared defaults.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::mem;

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::config::ConfigSource;
use crate::error::{BindError, BindResult};
use crate::tag::Tag;

/// Value type of a declared flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    /// `--flag` or `--flag=true|false`.
    Bool,
    /// Signed integer.
    Int,
    /// 64-bit float.
    Float64,
    /// Free-form string.
    String,
}

/// Name, shorthand and help text of a flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagDef {
    name: String,
    short: Option<char>,
    usage: String,
}

impl FlagDef {
    /// Definition for the long flag `--name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Definition taken from a field tag's `option`, `short` and `usage`
    /// keys. Only the first character of `short` is used.
    #[must_use]
    pub fn from_tag(tag: &Tag) -> Self {
        Self {
            name: tag.option().unwrap_or_default().to_owned(),
            short: tag.short().and_then(|s| s.chars().next()),
            usage: tag.usage().unwrap_or_default().to_owned(),
        }
    }

    /// Set the single-character alias.
    #[must_use]
    pub const fn with_short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Set the help text.
    #[must_use]
    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    /// Long flag name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Single-character alias.
    #[must_use]
    pub const fn short(&self) -> Option<char> {
        self.short
    }

    /// Help text.
    #[must_use]
    pub fn usage(&self) -> &str {
        &self.usage
    }
}

/// Record of a declared flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagBinding {
    kind: FlagKind,
    short: Option<char>,
    default: String,
    persistent: bool,
}

impl FlagBinding {
    /// Value type.
    #[must_use]
    pub const fn kind(&self) -> FlagKind {
        self.kind
    }

    /// Single-character alias.
    #[must_use]
    pub const fn short(&self) -> Option<char> {
        self.short
    }

    /// Default rendered as a string.
    #[must_use]
    pub fn default_value(&self) -> &str {
        &self.default
    }

    /// Whether the flag is inherited by subcommands.
    #[must_use]
    pub const fn is_persistent(&self) -> bool {
        self.persistent
    }
}

/// Adds flags to a command and tracks them for configuration lookup.
///
/// # Examples
///
/// ```
/// use cliutil::{FlagDef, Flagger};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut flagger = Flagger::new(clap::Command::new("demo")).with_env_prefix("DEMO");
/// flagger.int(&FlagDef::new("retries").with_short('r'), 3)?;
/// let config = flagger.try_config_from(["demo", "-r", "5"])?;
/// assert_eq!(config.get_int("retries")?, 5);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Flagger {
    command: Command,
    env_prefix: Option<String>,
    flags: BTreeMap<String, FlagBinding>,
}

impl Flagger {
    /// Start adding flags to `command`.
    #[must_use]
    pub fn new(command: Command) -> Self {
        Self {
            command,
            env_prefix: None,
            flags: BTreeMap::new(),
        }
    }

    /// Read environment variables named `PREFIX_OPTION_NAME`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into()).filter(|p| !p.is_empty());
        self
    }

    /// Environment prefix, if any.
    #[must_use]
    pub fn env_prefix(&self) -> Option<&str> {
        self.env_prefix.as_deref()
    }

    /// The command built so far.
    #[must_use]
    pub const fn command(&self) -> &Command {
        &self.command
    }

    /// Consume the flagger, returning the built command.
    #[must_use]
    pub fn into_command(self) -> Command {
        self.command
    }

    /// Add the built command as a subcommand of `parent`.
    #[must_use]
    pub fn attach_to(&self, parent: Command) -> Command {
        parent.subcommand(self.command.clone())
    }

    /// Declared flags keyed by name.
    #[must_use]
    pub const fn bindings(&self) -> &BTreeMap<String, FlagBinding> {
        &self.flags
    }

    /// Record for the flag called `name`.
    #[must_use]
    pub fn flag(&self, name: &str) -> Option<&FlagBinding> {
        self.flags.get(name)
    }

    /// Add a local boolean flag.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::DuplicateFlag`] when the name or shorthand is
    /// already taken.
    pub fn bool(&mut self, def: &FlagDef, default: bool) -> BindResult<()> {
        self.add(def, FlagKind::Bool, default.to_string(), false)
    }

    /// Add a boolean flag inherited by subcommands.
    ///
    /// # Errors
    ///
    /// See [`Flagger::bool`].
    pub fn persistent_bool(&mut self, def: &FlagDef, default: bool) -> BindResult<()> {
        self.add(def, FlagKind::Bool, default.to_string(), true)
    }

    /// Add a local integer flag.
    ///
    /// # Errors
    ///
    /// See [`Flagger::bool`].
    pub fn int(&mut self, def: &FlagDef, default: i64) -> BindResult<()> {
        self.add(def, FlagKind::Int, default.to_string(), false)
    }

    /// Add an integer flag inherited by subcommands.
    ///
    /// # Errors
    ///
    /// See [`Flagger::bool`].
    pub fn persistent_int(&mut self, def: &FlagDef, default: i64) -> BindResult<()> {
        self.add(def, FlagKind::Int, default.to_string(), true)
    }

    /// Add a local float flag.
    ///
    /// # Errors
    ///
    /// See [`Flagger::bool`].
    pub fn float64(&mut self, def: &FlagDef, default: f64) -> BindResult<()> {
        self.add(def, FlagKind::Float64, default.to_string(), false)
    }

    /// Add a float flag inherited by subcommands.
    ///
    /// # Errors
    ///
    /// See [`Flagger::bool`].
    pub fn persistent_float64(&mut self, def: &FlagDef, default: f64) -> BindResult<()> {
        self.add(def, FlagKind::Float64, default.to_string(), true)
    }

    /// Add a local string flag.
    ///
    /// # Errors
    ///
    /// See [`Flagger::bool`].
    pub fn string(&mut self, def: &FlagDef, default: &str) -> BindResult<()> {
        self.add(def, FlagKind::String, default.to_owned(), false)
    }

    /// Add a string flag inherited by subcommands.
    ///
    /// # Errors
    ///
    /// See [`Flagger::bool`].
    pub fn persistent_string(&mut self, def: &FlagDef, default: &str) -> BindResult<()> {
        self.add(def, FlagKind::String, default.to_owned(), true)
    }

    fn add(
        &mut self,
        def: &FlagDef,
        kind: FlagKind,
        default: String,
        persistent: bool,
    ) -> BindResult<()> {
        if self.flags.contains_key(def.name()) {
            return Err(BindError::DuplicateFlag {
                name: def.name().to_owned(),
            });
        }
        if let Some(short) = def.short()
            && self.flags.values().any(|flag| flag.short == Some(short))
        {
            return Err(BindError::DuplicateFlag {
                name: format!("-{short}"),
            });
        }

        for builtin in Builtin::ALL {
            if def.name() == builtin.name() && builtin.replaced(&self.command) {
                return Err(BindError::DuplicateFlag {
                    name: def.name().to_owned(),
                });
            }
        }
        for builtin in Builtin::ALL {
            self.yield_to(def, builtin);
        }

        let mut arg = Arg::new(def.name().to_owned())
            .long(def.name().to_owned())
            .action(ArgAction::Set)
            .global(persistent);
        if let Some(short) = def.short() {
            arg = arg.short(short);
        }
        if !def.usage().is_empty() {
            arg = arg.help(def.usage().to_owned());
        }
        if kind == FlagKind::Bool {
            arg = arg
                .num_args(0..=1)
                .require_equals(true)
                .default_missing_value("true");
        }
        if !default.is_empty() {
            arg = arg.default_value(default.clone());
        }
        let command = mem::take(&mut self.command);
        self.command = command.arg(arg);

        tracing::debug!(flag = def.name(), ?kind, persistent, "declared flag");
        self.flags.insert(
            def.name().to_owned(),
            FlagBinding {
                kind,
                short: def.short(),
                default,
                persistent,
            },
        );
        Ok(())
    }

    /// Hand a built-in flag's name or shorthand over to `def`.
    ///
    /// Taking the name drops the built-in; taking only the shorthand keeps
    /// the built-in under its long name.
    fn yield_to(&mut self, def: &FlagDef, builtin: Builtin) {
        let takes_name = def.name() == builtin.name();
        let takes_short = def.short() == Some(builtin.short());
        if !(takes_name || takes_short) || !builtin.is_active(&self.command) {
            return;
        }
        let command = builtin.disable(mem::take(&mut self.command));
        self.command = if takes_name {
            command
        } else {
            command.arg(builtin.long_only())
        };
        tracing::debug!(
            flag = def.name(),
            builtin = builtin.name(),
            "declared flag replaces built-in"
        );
    }

    /// Resolve the declared flags against parsed `matches`.
    ///
    /// Only values given explicitly on the command line are taken from
    /// `matches`; defaults come from the flag records so the environment can
    /// take precedence over them.
    #[must_use]
    pub fn config_source(&self, matches: &ArgMatches) -> ConfigSource {
        let mut config = ConfigSource::from_env(self.env_prefix.as_deref());
        for (name, flag) in &self.flags {
            config.declare(name, flag.kind, &flag.default);
            let given = matches.try_contains_id(name).unwrap_or(false)
                && matches.value_source(name) == Some(ValueSource::CommandLine);
            if !given {
                continue;
            }
            let raw = matches
                .try_get_raw(name)
                .ok()
                .flatten()
                .and_then(Iterator::last)
                .and_then(|value| value.to_str());
            if let Some(value) = raw {
                config.set(name, value);
            }
        }
        config
    }

    /// Parse `args` with the built command and resolve the declared flags.
    ///
    /// # Errors
    ///
    /// Returns the `clap` error when the arguments do not parse.
    pub fn try_config_from<I, T>(&self, args: I) -> Result<ConfigSource, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.command.clone().try_get_matches_from(args)?;
        Ok(self.config_source(&matches))
    }
}

/// Flags `clap` generates on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Builtin {
    Help,
    Version,
}

impl Builtin {
    const ALL: [Self; 2] = [Self::Help, Self::Version];

    const fn name(self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Version => "version",
        }
    }

    const fn short(self) -> char {
        match self {
            Self::Help => 'h',
            Self::Version => 'V',
        }
    }

    /// Whether `clap` will generate this flag for `command`.
    fn is_active(self, command: &Command) -> bool {
        match self {
            Self::Help => !command.is_disable_help_flag_set(),
            Self::Version => {
                !command.is_disable_version_flag_set()
                    && (command.get_version().is_some() || command.get_long_version().is_some())
            }
        }
    }

    /// Whether a long-only stand-in was already added by [`Flagger::yield_to`].
    fn replaced(self, command: &Command) -> bool {
        command
            .get_arguments()
            .any(|arg| arg.get_id().as_str() == self.name())
    }

    fn disable(self, command: Command) -> Command {
        match self {
            Self::Help => command.disable_help_flag(true),
            Self::Version => command.disable_version_flag(true),
        }
    }

    fn long_only(self) -> Arg {
        let (action, help) = match self {
            Self::Help => (ArgAction::Help, "Print help"),
            Self::Version => (ArgAction::Version, "Print version"),
        };
        Arg::new(self.name())
            .long(self.name())
            .action(action)
            .help(help)
    }
}

#[cfg(test)]
mod tests;
