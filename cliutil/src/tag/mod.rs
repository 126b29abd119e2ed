//! Parsing of `key=value` tag strings.
//!
//! A tag is the annotation attached to a struct field that describes how the
//! field binds to a command-line option, for example:
//!
//! ```text
//! option=value-one short=O default='some value' usage='value one usage'
//! ```
//!
//! Tokens are separated by whitespace. Whitespace between a pair of matching
//! quotation marks does not separate tokens, and any Unicode quotation mark
//! may open a quoted run. Each token splits on its first `=`; a token without
//! `=` becomes a key with an empty value. Quotation marks are trimmed from both
//! ends of keys and values. Parsing never fails.

use std::collections::{BTreeMap, HashMap};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Keys recognised by the built-in handlers.
pub mod keys {
    /// Flag name. Fields whose tag lacks this key are not bound.
    pub const OPTION: &str = "option";
    /// Single-character flag alias.
    pub const SHORT: &str = "short";
    /// String-encoded default value.
    pub const DEFAULT: &str = "default";
    /// Help text.
    pub const USAGE: &str = "usage";
    /// Explicit handler name.
    pub const FUNC: &str = "func";
}

/// Parsed field tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag {
    entries: BTreeMap<String, String>,
}

impl Tag {
    /// Parse a tag string.
    ///
    /// # Examples
    ///
    /// ```
    /// use cliutil::Tag;
    /// let tag = Tag::parse("option=value-one short=O default='some value'");
    /// assert_eq!(tag.option(), Some("value-one"));
    /// assert_eq!(tag.default_value(), Some("some value"));
    /// ```
    #[must_use]
    pub fn parse(s: &str) -> Self {
        Self {
            entries: pairs(s).collect(),
        }
    }

    /// Value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns `true` when `key` is present, even with an empty value.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Store `value` under `key`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    /// The `option` key.
    #[must_use]
    pub fn option(&self) -> Option<&str> {
        self.get(keys::OPTION)
    }

    /// The `short` key.
    #[must_use]
    pub fn short(&self) -> Option<&str> {
        self.get(keys::SHORT)
    }

    /// The `default` key.
    #[must_use]
    pub fn default_value(&self) -> Option<&str> {
        self.get(keys::DEFAULT)
    }

    /// The `usage` key.
    #[must_use]
    pub fn usage(&self) -> Option<&str> {
        self.get(keys::USAGE)
    }

    /// The `func` key.
    #[must_use]
    pub fn func(&self) -> Option<&str> {
        self.get(keys::FUNC)
    }

    /// Copy every key of `fallback` that this tag does not define.
    ///
    /// Keys already present in `self` win.
    #[must_use]
    pub fn merged_over(mut self, fallback: &Self) -> Self {
        for (key, value) in &fallback.entries {
            self.entries
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
        self
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the tag has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromStr for Tag {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<Tag> for HashMap<String, String> {
    fn from(tag: Tag) -> Self {
        tag.entries.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Tag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, value) in &self.entries {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            if let Some(quote) = quote_for(value) {
                write!(f, "{key}={quote}{value}{quote}")?;
            } else {
                write!(f, "{key}={value}")?;
            }
        }
        Ok(())
    }
}

/// Quotation mark to wrap `value` in when displayed, if it needs one.
///
/// Values holding whitespace or quotation marks are quoted with a mark they
/// do not contain, so the displayed tag parses back to the same entries.
fn quote_for(value: &str) -> Option<char> {
    const MARKS: [char; 4] = ['\'', '"', '\u{201C}', '\u{00AB}'];
    let needs_quotes = value
        .chars()
        .any(|c| c.is_whitespace() || is_quotation_mark(c));
    needs_quotes.then(|| {
        MARKS
            .into_iter()
            .find(|mark| !value.contains(*mark))
            .unwrap_or('\'')
    })
}

/// Parse a `key=value` string into a map.
///
/// # Examples
///
/// ```
/// use cliutil::parse_key_value;
/// let map = parse_key_value("a=1 b='two words'");
/// assert_eq!(map.get("b").map(String::as_str), Some("two words"));
/// ```
#[must_use]
pub fn parse_key_value(s: &str) -> HashMap<String, String> {
    pairs(s).collect()
}

/// Returns `true` for code points with the Unicode `Quotation_Mark` property.
#[must_use]
pub const fn is_quotation_mark(c: char) -> bool {
    matches!(
        c,
        '"' | '\''
            | '\u{00AB}'
            | '\u{00BB}'
            | '\u{2018}'..='\u{201F}'
            | '\u{2039}'
            | '\u{203A}'
            | '\u{2E42}'
            | '\u{300C}'..='\u{300F}'
            | '\u{301D}'..='\u{301F}'
            | '\u{FE41}'..='\u{FE44}'
            | '\u{FF02}'
            | '\u{FF07}'
            | '\u{FF62}'
            | '\u{FF63}'
    )
}

fn pairs(s: &str) -> impl Iterator<Item = (String, String)> + '_ {
    tokens(s).into_iter().map(|token| {
        let (key, value) = token.split_once('=').unwrap_or((token, ""));
        (
            key.trim_matches(is_quotation_mark).to_owned(),
            value.trim_matches(is_quotation_mark).to_owned(),
        )
    })
}

/// Split on whitespace that is not inside a quoted run.
fn tokens(s: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut open_quote: Option<char> = None;
    let mut start: Option<usize> = None;
    for (idx, c) in s.char_indices() {
        let separator = match open_quote {
            Some(q) if q == c => {
                open_quote = None;
                false
            }
            Some(_) => false,
            None if is_quotation_mark(c) => {
                open_quote = Some(c);
                false
            }
            None => c.is_whitespace(),
        };
        match (separator, start) {
            (true, Some(begin)) => {
                out.extend(s.get(begin..idx));
                start = None;
            }
            (false, None) => start = Some(idx),
            _ => {}
        }
    }
    if let Some(begin) = start {
        out.extend(s.get(begin..));
    }
    out
}
