//! Per-type option handlers.
//!
//! A handler knows how to declare one flag from a field's [`Tag`] and how to
//! write the resolved value back into the field. The built-in handlers form a
//! closed set, [`OptionKind`], implemented by [`BuiltinHandler`]. Custom
//! handlers implement [`OptionHandler`] and are registered by name on a
//! [`crate::HandlerRegistry`].

mod source;

use std::collections::HashMap;
use std::fmt;

use crate::binding::{Shape, Slot};
use crate::config::ConfigSource;
use crate::error::{BindError, BindResult};
use crate::flagger::{FlagDef, Flagger};
use crate::parse::{parse_bool, parse_int_slice};
use crate::tag::{Tag, parse_key_value};

pub use source::read_uri;

/// Declares a flag for a field and populates the field from configuration.
pub trait OptionHandler: Send + Sync {
    /// Register the flag on `flagger`.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::InvalidDefault`] when the tag's default cannot
    /// be parsed, or [`BindError::DuplicateFlag`] when the name is taken.
    fn declare(&self, flagger: &mut Flagger) -> BindResult<()>;

    /// Read the option from `config` and write it to `slot`.
    ///
    /// # Errors
    ///
    /// Returns conversion, I/O, or [`BindError::FieldMismatch`] failures.
    fn populate(&self, config: &ConfigSource, slot: Slot<'_>) -> BindResult<()>;
}

/// The built-in handler kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum OptionKind {
    /// `String` field, string flag.
    String,
    /// `i64` field, integer flag.
    Int,
    /// `bool` field, boolean flag.
    Bool,
    /// `f64` field, float flag.
    Float64,
    /// `Vec<i64>` field, string flag holding an integer list.
    IntList,
    /// `HashMap<String, String>` field, string flag holding `key=value` pairs.
    KeyValue,
    /// `bool` field, string flag parsed as a boolean.
    BoolString,
    /// `String` field filled with the content found at the URI in the flag.
    IoReader,
    /// `String` field filled from the flag, or standard input when empty.
    Stdin,
}

impl OptionKind {
    /// Every built-in kind.
    pub const ALL: [Self; 9] = [
        Self::String,
        Self::Int,
        Self::Bool,
        Self::Float64,
        Self::IntList,
        Self::KeyValue,
        Self::BoolString,
        Self::IoReader,
        Self::Stdin,
    ];

    /// Registry name of the kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Bool => "bool",
            Self::Float64 => "float64",
            Self::IntList => "[]int",
            Self::KeyValue => "map[string]string",
            Self::BoolString => "boolstring",
            Self::IoReader => "ioreader",
            Self::Stdin => "stdin",
        }
    }

    /// Kind inferred for a field shape, if any.
    #[must_use]
    pub const fn for_shape(shape: Shape) -> Option<Self> {
        match shape {
            Shape::String => Some(Self::String),
            Shape::Int => Some(Self::Int),
            Shape::Bool => Some(Self::Bool),
            Shape::Float64 => Some(Self::Float64),
            Shape::IntList => Some(Self::IntList),
            Shape::StringMap => Some(Self::KeyValue),
            Shape::Other(_) => None,
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Handler for one of the [`OptionKind`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltinHandler {
    kind: OptionKind,
    tag: Tag,
}

impl BuiltinHandler {
    /// Handler of `kind` configured by `tag`.
    #[must_use]
    pub const fn new(kind: OptionKind, tag: Tag) -> Self {
        Self { kind, tag }
    }

    /// The handler's kind.
    #[must_use]
    pub const fn kind(&self) -> OptionKind {
        self.kind
    }

    /// The resolved tag.
    #[must_use]
    pub const fn tag(&self) -> &Tag {
        &self.tag
    }

    fn name(&self) -> &str {
        self.tag.option().unwrap_or_default()
    }

    fn raw_default(&self) -> &str {
        self.tag.default_value().unwrap_or_default()
    }

    /// Parse the tag default, using `zero` when no default is given.
    fn typed_default<T>(
        &self,
        zero: T,
        expected: &'static str,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> BindResult<T> {
        match self.tag.default_value() {
            None => Ok(zero),
            Some(raw) => parse(raw).ok_or_else(|| BindError::invalid_default(raw, expected)),
        }
    }
}

impl OptionHandler for BuiltinHandler {
    fn declare(&self, flagger: &mut Flagger) -> BindResult<()> {
        let def = FlagDef::from_tag(&self.tag);
        match self.kind {
            OptionKind::Int => {
                let default = self.typed_default(0, "int", |s| s.trim().parse().ok())?;
                flagger.int(&def, default)
            }
            OptionKind::Bool => {
                let default = self.typed_default(false, "bool", parse_bool)?;
                flagger.bool(&def, default)
            }
            OptionKind::Float64 => {
                let default = self.typed_default(0.0, "float64", |s| s.trim().parse().ok())?;
                flagger.float64(&def, default)
            }
            OptionKind::String
            | OptionKind::IntList
            | OptionKind::KeyValue
            | OptionKind::BoolString
            | OptionKind::IoReader
            | OptionKind::Stdin => flagger.string(&def, self.raw_default()),
        }
    }

    fn populate(&self, config: &ConfigSource, slot: Slot<'_>) -> BindResult<()> {
        let name = self.name();
        match self.kind {
            OptionKind::String => *slot.downcast::<String>()? = config.get_string(name),
            OptionKind::Int => *slot.downcast::<i64>()? = config.get_int(name)?,
            OptionKind::Bool => *slot.downcast::<bool>()? = config.get_bool(name)?,
            OptionKind::Float64 => *slot.downcast::<f64>()? = config.get_float64(name)?,
            OptionKind::IntList => {
                let values = parse_int_slice(&config.get_string(name))?;
                slot.downcast::<Vec<i64>>()?.extend(values);
            }
            OptionKind::KeyValue => {
                let map: HashMap<String, String> = parse_key_value(&config.get_string(name));
                *slot.downcast::<HashMap<String, String>>()? = map;
            }
            OptionKind::BoolString => {
                let raw = config.get_string(name);
                let value = parse_bool(&raw).ok_or_else(|| BindError::invalid_value(&raw, "bool"))?;
                *slot.downcast::<bool>()? = value;
            }
            OptionKind::IoReader => {
                if !config.is_set(name) {
                    return Ok(());
                }
                let content = read_uri(&config.get_string(name))?;
                *slot.downcast::<String>()? = content;
            }
            OptionKind::Stdin => {
                let value = config.get_string(name);
                let content = if value.is_empty() {
                    config.read_stdin()?
                } else {
                    value
                };
                *slot.downcast::<String>()? = content;
            }
        }
        Ok(())
    }
}
