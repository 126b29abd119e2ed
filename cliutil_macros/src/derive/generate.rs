//! Code generation for the `Options` derive.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::DeriveInput;

use super::parse::{BoundField, FieldRole, Wrapper};

/// `Options` and `Target` impls for `input`.
pub(crate) fn options_impl(
    input: &DeriveInput,
    fields: &[BoundField],
    krate: &TokenStream,
) -> TokenStream {
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let visitor = if fields.is_empty() {
        format_ident!("_visitor")
    } else {
        format_ident!("visitor")
    };

    let walk = fields.iter().map(|field| walk_field(field, krate, &visitor));
    let walk_mut = fields
        .iter()
        .map(|field| walk_mut_field(field, krate, &visitor));

    quote! {
        #[automatically_derived]
        impl #impl_generics #krate::Options for #ident #ty_generics #where_clause {
            fn walk(
                &self,
                #visitor: &mut dyn #krate::Visit,
            ) -> #krate::BindResult<()> {
                #( #walk )*
                ::core::result::Result::Ok(())
            }

            fn walk_mut(
                &mut self,
                #visitor: &mut dyn #krate::VisitMut,
            ) -> #krate::BindResult<()> {
                #( #walk_mut )*
                ::core::result::Result::Ok(())
            }
        }

        #[automatically_derived]
        impl #impl_generics #krate::Target for #ident #ty_generics #where_clause {
            fn resolve(&self) -> #krate::BindResult<&dyn #krate::Options> {
                ::core::result::Result::Ok(self)
            }

            fn resolve_mut(&mut self) -> #krate::BindResult<&mut dyn #krate::Options> {
                ::core::result::Result::Ok(self)
            }
        }
    }
}

fn field_descriptor(field: &BoundField, tag: &syn::LitStr, krate: &TokenStream) -> TokenStream {
    let name = field.ident.to_string();
    quote! { &#krate::Field { name: #name, tag: #tag } }
}

fn walk_field(field: &BoundField, krate: &TokenStream, visitor: &syn::Ident) -> TokenStream {
    let ident = &field.ident;
    match &field.role {
        FieldRole::Tagged(tag, wrappers) => {
            let descriptor = field_descriptor(field, tag, krate);
            unwrap_layers(wrappers, quote! { &self.#ident }, false, 0, &|value| {
                quote! {
                    #visitor.visit(#descriptor, #krate::Shape::of_val(#value))?;
                }
            })
        }
        FieldRole::Nested => quote! {
            #krate::Options::walk(&self.#ident, #visitor)?;
        },
    }
}

fn walk_mut_field(field: &BoundField, krate: &TokenStream, visitor: &syn::Ident) -> TokenStream {
    let ident = &field.ident;
    match &field.role {
        FieldRole::Tagged(tag, wrappers) => {
            let descriptor = field_descriptor(field, tag, krate);
            unwrap_layers(wrappers, quote! { &mut self.#ident }, true, 0, &|value| {
                quote! {
                    #visitor.visit_mut(#descriptor, #krate::Slot::new(#value))?;
                }
            })
        }
        FieldRole::Nested => quote! {
            #krate::Options::walk_mut(&mut self.#ident, #visitor)?;
        },
    }
}

/// Wrap `leaf` in code that dereferences each `Box` layer and skips the
/// field when an `Option` layer is `None`.
fn unwrap_layers(
    wrappers: &[Wrapper],
    value: TokenStream,
    mutable: bool,
    depth: usize,
    leaf: &dyn Fn(&TokenStream) -> TokenStream,
) -> TokenStream {
    let Some((wrapper, rest)) = wrappers.split_first() else {
        return leaf(&value);
    };
    let inner = format_ident!("__cliutil_value{depth}");
    let body = unwrap_layers(rest, quote! { #inner }, mutable, depth + 1, leaf);
    match (wrapper, mutable) {
        (Wrapper::Option, _) => quote! {
            if let ::core::option::Option::Some(#inner) = #value {
                #body
            }
        },
        (Wrapper::Box, false) => quote! {
            {
                let #inner = &**#value;
                #body
            }
        },
        (Wrapper::Box, true) => quote! {
            {
                let #inner = &mut **#value;
                #body
            }
        },
    }
}
