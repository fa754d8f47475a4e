use proc_macro::TokenStream;
use quote::quote;
use syn::{
    ext::IdentExt, parse_macro_input, spanned::Spanned, Attribute, Data, DeriveInput, Expr,
    ExprLit, Field, Fields, Lit, LitStr, Meta, Result, Type,
};

/// Derive `flagbind::Args` for a struct with named fields.
///
/// Fields annotated with `#[args("...")]` (or `#[args = "..."]`) become
/// bindable; the string is kept verbatim and parsed when the schema is
/// extracted. Every other field is listed as skipped.
///
/// ```ignore
/// #[derive(Default, flagbind::Args)]
/// struct Arguments {
///     #[args("alias=a,argument=all,description=All values")]
///     all: bool,
///     #[args("argument=port,description=Port number")]
///     port: i32,
///     cache: Vec<u8>,
/// }
/// ```
///
/// Annotated fields whose type does not implement `flagbind::FieldValue`
/// (`f64`, `Vec<_>`, user types) are kept in the schema but fail when a token
/// matches them.
#[proc_macro_derive(Args, attributes(args))]
pub fn derive_args(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand_args(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_args(input: DeriveInput) -> Result<proc_macro2::TokenStream> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            other => {
                return Err(syn::Error::new(
                    other.span(),
                    "invalid target: `Args` can only be derived for structs with named fields",
                ));
            }
        },
        Data::Enum(data) => {
            return Err(syn::Error::new(
                data.enum_token.span,
                "invalid target: `Args` can only be derived for structs, not enums",
            ));
        }
        Data::Union(data) => {
            return Err(syn::Error::new(
                data.union_token.span,
                "invalid target: `Args` can only be derived for structs, not unions",
            ));
        }
    };

    let defs = fields
        .iter()
        .map(field_def_expr)
        .collect::<Result<Vec<_>>>()?;

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::flagbind::Args for #ident #ty_generics #where_clause {
            fn fields() -> ::std::vec::Vec<::flagbind::FieldDef<Self>> {
                ::std::vec![ #(#defs),* ]
            }
        }
    })
}

fn field_def_expr(field: &Field) -> Result<proc_macro2::TokenStream> {
    // Named fields always have an ident.
    let Some(ident) = field.ident.as_ref() else {
        return Err(syn::Error::new(field.span(), "expected a named field"));
    };
    let name = LitStr::new(&ident.unraw().to_string(), ident.span());
    let ty = &field.ty;
    let type_name = LitStr::new(&type_name(ty), ty.span());

    let Some(annotation) = annotation(&field.attrs)? else {
        return Ok(quote! {
            ::flagbind::FieldDef::skipped(#name, #type_name)
        });
    };

    Ok(quote! {
        {
            #[allow(unused_imports)]
            use ::flagbind::__private::{Bindable as _, Unbindable as _};
            (&::flagbind::__private::Slot::<#ty>::new()).field_def(
                #name,
                #annotation,
                #type_name,
                |target: &mut Self, value| {
                    (&::flagbind::__private::Slot::<#ty>::new()).store(&mut target.#ident, value)
                },
            )
        }
    })
}

/// The single `#[args(...)]` string on a field, if any.
fn annotation(attrs: &[Attribute]) -> Result<Option<LitStr>> {
    let mut found: Option<LitStr> = None;

    for attr in attrs.iter().filter(|a| a.path().is_ident("args")) {
        let lit = match &attr.meta {
            Meta::List(_) => attr.parse_args::<LitStr>()?,
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(s), ..
                }) => s.clone(),
                other => {
                    return Err(syn::Error::new(
                        other.span(),
                        "expected a string literal: #[args = \"alias=a,argument=all\"]",
                    ));
                }
            },
            Meta::Path(path) => {
                return Err(syn::Error::new(
                    path.span(),
                    "expected #[args(\"alias=a,argument=all\")]",
                ));
            }
        };
        if found.is_some() {
            return Err(syn::Error::new(attr.span(), "duplicate #[args] attribute"));
        }
        found = Some(lit);
    }

    Ok(found)
}

fn type_name(ty: &Type) -> String {
    quote!(#ty)
        .to_string()
        .replace(" < ", "<")
        .replace("< ", "<")
        .replace(" >", ">")
        .replace(" ,", ",")
        .replace(" :: ", "::")
        .replace(":: ", "::")
        .replace("& ", "&")
}
