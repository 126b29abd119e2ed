//! Test helpers shared across the cliutil crates.
//!
//! * [`jail`] runs closures inside a [`figment::Jail`] for environment
//!   isolation.
//! * [`files`] writes throwaway files for URI-reading tests.
//! * [`logs`] captures `tracing` output as text.

pub mod files;
pub mod jail;
pub mod logs;
