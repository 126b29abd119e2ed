//! Path used by generated code to reach the runtime crate.

use proc_macro2::TokenStream;
use quote::quote;

/// Tokens naming the runtime crate.
///
/// Defaults to `::cliutil`; `#[cliutil(crate = "...")]` substitutes a
/// re-exported or renamed path.
pub(crate) fn resolve(crate_path: Option<&syn::Path>) -> TokenStream {
    crate_path.map_or_else(|| quote! { ::cliutil }, |path| quote! { #path })
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests panic to surface unexpected results")]
mod tests {
    use rstest::rstest;

    use super::resolve;

    #[rstest]
    #[case::default(None, ":: cliutil")]
    #[case::renamed(Some("cli"), "cli")]
    #[case::reexported(Some("app::deps::cliutil"), "app :: deps :: cliutil")]
    fn resolves_crate_tokens(#[case] input: Option<&str>, #[case] expected: &str) {
        let parsed = input.map(|s| syn::parse_str::<syn::Path>(s).expect("valid path"));
        assert_eq!(resolve(parsed.as_ref()).to_string(), expected);
    }
}
