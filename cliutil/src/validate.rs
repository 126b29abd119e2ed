//! Input validation helpers.

use crate::config::ConfigSource;
use crate::error::{BindError, BindResult};
use crate::flagger::FlagKind;

/// Whether `s` is non-empty and consists only of letters.
#[must_use]
pub fn is_letters(s: &str) -> bool {
    !s.is_empty() && s.chars().all(char::is_alphabetic)
}

/// Whether `s` is non-empty and consists only of decimal digits.
#[must_use]
pub fn is_number(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Whether `s` contains any whitespace.
#[must_use]
pub fn has_space(s: &str) -> bool {
    s.chars().any(char::is_whitespace)
}

/// Check that every option in `names` resolved to a non-empty value.
///
/// Empty strings are missing, and so is zero for integer flags.
///
/// # Errors
///
/// Returns [`BindError::UndefinedOption`] for a name that was never declared
/// and has no value, and [`BindError::MissingOption`] for the first empty
/// option.
pub fn has_required_options(config: &ConfigSource, names: &[&str]) -> BindResult<()> {
    for &name in names {
        let Some(raw) = config.get_raw(name) else {
            return Err(BindError::UndefinedOption {
                name: name.to_owned(),
            });
        };
        let missing = raw.is_empty()
            || (config.kind(name) == Some(FlagKind::Int) && config.get_int(name)? == 0);
        if missing {
            return Err(BindError::MissingOption {
                name: name.to_owned(),
            });
        }
    }
    Ok(())
}

/// [`has_required_options`] for a single option.
///
/// # Errors
///
/// See [`has_required_options`].
pub fn has_required_option(config: &ConfigSource, name: &str) -> BindResult<()> {
    has_required_options(config, &[name])
}
