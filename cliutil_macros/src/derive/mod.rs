//! Expansion of `#[derive(Options)]`.

mod crate_path;
mod generate;
mod parse;

use proc_macro2::TokenStream;
use syn::DeriveInput;

/// Expand the derive for `input`.
///
/// # Errors
///
/// Returns a spanned error for enums, unions, tuple structs, malformed
/// `cliutil` attributes, or a field that is both tagged and nested.
pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let attrs = parse::parse_struct_attrs(&input.attrs)?;
    let fields = parse::collect_fields(input)?;
    let krate = crate_path::resolve(attrs.crate_path.as_ref());
    Ok(generate::options_impl(input, &fields, &krate))
}
