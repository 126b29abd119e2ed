//! Command presentation helpers.

use std::fmt;
use std::io::{self, Write};

use clap::Command;

/// Usage line for `command` taking positional `args`.
///
/// # Examples
///
/// ```
/// assert_eq!(cliutil::use_line("copy", &["src", "dest"]), "copy [SRC] [DEST]");
/// ```
#[must_use]
pub fn use_line(command: &str, args: &[&str]) -> String {
    args.iter().fold(command.to_owned(), |mut line, arg| {
        line.push_str(" [");
        line.push_str(&arg.to_uppercase());
        line.push(']');
        line
    })
}

/// Write `err` to `w` preceded by each prefix and followed by a blank line.
///
/// # Errors
///
/// Returns any error from the writer.
///
/// # Examples
///
/// ```
/// let mut out = Vec::new();
/// cliutil::write_error(&mut out, &"boom", &["app", "sync"])?;
/// assert_eq!(out, b"app: sync: boom\n\n");
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn write_error<W: Write + ?Sized>(
    w: &mut W,
    err: &dyn fmt::Display,
    prefixes: &[&str],
) -> io::Result<()> {
    for prefix in prefixes {
        write!(w, "{prefix}: ")?;
    }
    write!(w, "{err}\n\n")
}

/// Report `err` with `command`'s help on standard error, then exit with
/// status 1. Does nothing when `result` is `Ok`.
pub fn handle_error<T, E: fmt::Display>(
    command: &mut Command,
    result: Result<T, E>,
    prefixes: &[&str],
) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            let mut stderr = io::stderr().lock();
            let _written = write_error(&mut stderr, &err, prefixes);
            let _usage = command.write_help(&mut stderr);
            std::process::exit(1)
        }
    }
}
