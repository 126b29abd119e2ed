//! Helpers for running tests inside a `figment::Jail`.
//!
//! The jail serialises environment mutation across tests and restores every
//! variable it touched once the closure returns.

use anyhow::{Result, anyhow};

/// Executes `f` inside a [`figment::Jail`], returning the closure's output.
///
/// The closure returns an [`anyhow::Result`] so test bodies can use
/// `ensure!` and `?` freely; failures are carried through the jail.
///
/// # Errors
///
/// Returns an error if the closure fails or returns no value.
pub fn with_jail<F, T>(f: F) -> Result<T>
where
    F: FnOnce(&mut figment::Jail) -> Result<T>,
{
    let mut output = None;
    figment::Jail::try_with(|j| {
        output = Some(f(j).map_err(figment_error)?);
        Ok(())
    })
    .map_err(|err| anyhow!(err.to_string()))?;
    output.ok_or_else(|| anyhow!("jail closure did not return a value"))
}

/// Converts any displayable error into a [`figment::Error`].
#[expect(
    clippy::needless_pass_by_value,
    reason = "used with map_err, which hands over the error by value"
)]
#[must_use]
pub fn figment_error<E: ToString>(err: E) -> figment::Error {
    figment::Error::from(err.to_string())
}
