//! Attribute parsing for the `Options` derive.

use syn::{
    Attribute, Data, DeriveInput, Fields, GenericArgument, Ident, LitStr, PathArguments, Type,
    Visibility,
};

/// Struct-level `#[cliutil(...)]` settings.
#[derive(Default)]
pub(crate) struct StructAttrs {
    pub crate_path: Option<syn::Path>,
}

/// Field-level `#[cliutil(...)]` settings.
#[derive(Default)]
struct FieldAttrs {
    tag: Option<LitStr>,
    nested: bool,
}

/// Pointer-like layer around a tagged field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Wrapper {
    /// `Option<T>`: `None` skips the field.
    Option,
    /// `Box<T>`: bound as the boxed value.
    Box,
}

/// How a public field takes part in the walk.
pub(crate) enum FieldRole {
    /// Bound to the option described by the tag string, after unwrapping
    /// the listed layers from the outside in.
    Tagged(LitStr, Vec<Wrapper>),
    /// Walked recursively.
    Nested,
}

/// A field the generated code visits.
pub(crate) struct BoundField {
    pub ident: Ident,
    pub role: FieldRole,
}

fn cliutil_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs.iter().filter(|a| a.path().is_ident("cliutil"))
}

pub(crate) fn parse_struct_attrs(attrs: &[Attribute]) -> syn::Result<StructAttrs> {
    let mut out = StructAttrs::default();
    for attr in cliutil_attrs(attrs) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("crate") {
                let lit: LitStr = meta.value()?.parse()?;
                out.crate_path = Some(lit.parse()?);
                Ok(())
            } else {
                Err(meta.error("unsupported cliutil struct attribute"))
            }
        })?;
    }
    Ok(out)
}

fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    for attr in cliutil_attrs(attrs) {
        // Bare string form: #[cliutil("option=name")]
        if let Ok(lit) = attr.parse_args::<LitStr>() {
            set_tag(&mut out, lit)?;
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("tag") {
                let lit: LitStr = meta.value()?.parse()?;
                set_tag(&mut out, lit)
            } else if meta.path.is_ident("nested") {
                out.nested = true;
                Ok(())
            } else {
                Err(meta.error("unsupported cliutil field attribute"))
            }
        })?;
    }
    Ok(out)
}

fn set_tag(out: &mut FieldAttrs, lit: LitStr) -> syn::Result<()> {
    if out.tag.is_some() {
        return Err(syn::Error::new(lit.span(), "duplicate cliutil tag"));
    }
    out.tag = Some(lit);
    Ok(())
}

/// Collect the public, annotated fields of `input` in declaration order.
pub(crate) fn collect_fields(input: &DeriveInput) -> syn::Result<Vec<BoundField>> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            Fields::Unit => return Ok(Vec::new()),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    data.struct_token,
                    "Options requires named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Options can only be derived for structs",
            ));
        }
    };

    let mut out = Vec::new();
    for field in fields {
        let attrs = parse_field_attrs(&field.attrs)?;
        let role = match (attrs.tag, attrs.nested) {
            (Some(tag), true) => {
                return Err(syn::Error::new(
                    tag.span(),
                    "a field cannot be both tagged and nested",
                ));
            }
            (Some(tag), false) => FieldRole::Tagged(tag, wrappers(&field.ty)),
            (None, true) => FieldRole::Nested,
            (None, false) => continue,
        };
        if !matches!(field.vis, Visibility::Public(_)) {
            continue;
        }
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        out.push(BoundField { ident, role });
    }
    Ok(out)
}

/// Peel `Option<..>` and `Box<..>` layers off `ty`, outermost first.
pub(crate) fn wrappers(ty: &Type) -> Vec<Wrapper> {
    let mut out = Vec::new();
    let mut current = ty;
    while let Some((wrapper, inner)) = single_wrapper(current) {
        out.push(wrapper);
        current = inner;
    }
    out
}

fn single_wrapper(ty: &Type) -> Option<(Wrapper, &Type)> {
    let Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }
    let segment = path.path.segments.last()?;
    let wrapper = if segment.ident == "Option" {
        Wrapper::Option
    } else if segment.ident == "Box" {
        Wrapper::Box
    } else {
        return None;
    };
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    let mut types = args.args.iter().filter_map(|arg| match arg {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    });
    match (types.next(), types.next()) {
        (Some(inner), None) => Some((wrapper, inner)),
        _ => None,
    }
}
