use crate::utils::{apply_derives, ensure_leading_field};
use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Item, Result, Token, Type, parse::Parse, parse::ParseStream, parse_macro_input};

/// #[versioned] 宏实现
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as VersionedAttrConfig);
    let input = parse_macro_input!(item as Item);

    let mut st = match input {
        Item::Struct(s) => s,
        Item::Enum(e) => {
            return syn::Error::new(e.ident.span(), "#[versioned] only on struct")
                .to_compile_error()
                .into();
        }
        other => {
            return syn::Error::new(other.span(), "#[versioned] only on struct")
                .to_compile_error()
                .into();
        }
    };

    // 仅支持具名字段结构体
    let fields_named = match &mut st.fields {
        syn::Fields::Named(f) => f,
        _ => {
            return syn::Error::new(st.ident.span(), "only supports named-field struct")
                .to_compile_error()
                .into();
        }
    };

    // 确保 version 在最前，已有定义原样复用
    let version_ty: Type = syn::parse_quote! { ::seqstore::Version };
    ensure_leading_field(fields_named, "version", &version_ty);

    // 引擎需要 Clone（写入副本）与 Default（新建实体）；字节型后端需要 serde
    let mut required: Vec<syn::Path> = vec![
        syn::parse_quote!(Clone),
        syn::parse_quote!(Default),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
    ];
    if cfg.derive_debug.unwrap_or(true) {
        required.insert(0, syn::parse_quote!(Debug));
    }
    apply_derives(&mut st.attrs, required);

    let ident = &st.ident;
    let (impl_generics, ty_generics, where_clause) = st.generics.split_for_impl();

    let expanded = quote! {
        #st

        impl #impl_generics ::seqstore::Versioned for #ident #ty_generics #where_clause {
            fn version(&self) -> ::seqstore::Version { self.version }

            fn version_mut(&mut self) -> &mut ::seqstore::Version { &mut self.version }
        }
    };

    TokenStream::from(expanded)
}

// -------- parsing --------

struct VersionedAttrConfig {
    derive_debug: Option<bool>,
}

impl Parse for VersionedAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut derive_debug: Option<bool> = None;

        if input.is_empty() {
            return Ok(Self { derive_debug });
        }

        let elems: Punctuated<VersionedAttrElem, Token![,]> =
            Punctuated::<VersionedAttrElem, Token![,]>::parse_terminated(input)?;

        for elem in elems.into_iter() {
            match elem {
                VersionedAttrElem::Debug(b) => {
                    if derive_debug.is_some() {
                        return Err(syn::Error::new(
                            proc_macro2::Span::call_site(),
                            "duplicate key 'debug' in attribute",
                        ));
                    }
                    derive_debug = Some(b);
                }
            }
        }

        Ok(Self { derive_debug })
    }
}

enum VersionedAttrElem {
    Debug(bool),
}

impl Parse for VersionedAttrElem {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: syn::Ident = input.parse()?;
        if key == "debug" {
            let _eq: Token![=] = input.parse()?;
            let expr: syn::Expr = input.parse()?;
            match expr {
                syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Bool(b),
                    ..
                }) => Ok(VersionedAttrElem::Debug(b.value())),
                other => Err(syn::Error::new(
                    other.span(),
                    "expected boolean literal for 'debug'",
                )),
            }
        } else {
            Err(syn::Error::new(
                key.span(),
                "unknown key in attribute; expected 'debug'",
            ))
        }
    }
}
