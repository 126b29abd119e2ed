//! Procedural macros for `cliutil`.
//!
//! `#[derive(Options)]` implements `cliutil::Options` and `cliutil::Target`
//! for a struct with named fields. Each public field annotated with a
//! `#[cliutil("...")]` tag string is reported to the binding engine in
//! declaration order; fields annotated `#[cliutil(nested)]` are walked
//! recursively.
//!
//! ```ignore
//! #[derive(cliutil::Options, Default)]
//! struct Args {
//!     #[cliutil("option=name short=n default=world usage='who to greet'")]
//!     pub name: String,
//!     #[cliutil(nested)]
//!     pub network: Network,
//! }
//! ```

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;

/// Derive macro for `cliutil::Options`.
///
/// Recognised attributes:
///
/// * `#[cliutil("tag")]` or `#[cliutil(tag = "tag")]` on a field binds it to
///   an option described by the tag string.
/// * `#[cliutil(nested)]` on a field flattens its options into the walk.
///
/// A tagged field typed `Option<T>` or `Box<T>` is visited as its `T`; a
/// `None` value is not visited at all.
/// * `#[cliutil(crate = "path")]` on the struct overrides the path used to
///   reach the runtime crate.
///
/// Private fields are never bound, even when tagged.
#[proc_macro_derive(Options, attributes(cliutil))]
pub fn derive_options(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
