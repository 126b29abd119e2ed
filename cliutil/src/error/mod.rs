//! Error types produced while declaring and populating options.

mod constructors;
mod types;

pub use types::{BindError, BindResult};

#[cfg(test)]
mod tests;
