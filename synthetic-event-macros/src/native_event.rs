use crate::utils::{camel_case, take_field_options};
use proc_macro::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Ident, Item, Result, Token, parse::Parse, parse::ParseStream, parse_macro_input};

/// #[native_event] 宏实现
/// - 仅支持具名字段结构体
/// - 生成 `field(&self, name)`：按（重命名后的）字段名匹配并转换为 JSON
/// - 可选生成 `prevent_default` / `stop_propagation`，委托给指定方法并返回 true
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as NativeEventAttrConfig);
    let input = parse_macro_input!(item as Item);

    let mut st = match input {
        Item::Struct(s) => s,
        other => {
            return syn::Error::new(other.span(), "#[native_event] only on struct")
                .to_compile_error()
                .into();
        }
    };

    let fields_named = match &mut st.fields {
        syn::Fields::Named(f) => f,
        _ => {
            return syn::Error::new(st.span(), "only supports named-field struct")
                .to_compile_error()
                .into();
        }
    };

    // 逐字段生成匹配分支，同时剥离 #[native(...)]
    let mut arms = Vec::new();
    for field in fields_named.named.iter_mut() {
        let opts = match take_field_options(&mut field.attrs) {
            Ok(o) => o,
            Err(e) => return e.to_compile_error().into(),
        };
        if opts.skip {
            continue;
        }
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        let key = opts
            .rename
            .unwrap_or_else(|| camel_case(&ident.unraw().to_string()));
        arms.push(quote! {
            #key => ::core::option::Option::Some(
                ::synthetic_event::native_event::to_field_value(&self.#ident)
            ),
        });
    }

    let prevent_default = cfg.prevent_default.map(|method| {
        quote! {
            fn prevent_default(&self) -> bool {
                self.#method();
                true
            }
        }
    });
    let stop_propagation = cfg.stop_propagation.map(|method| {
        quote! {
            fn stop_propagation(&self) -> bool {
                self.#method();
                true
            }
        }
    });

    let name = &st.ident;
    let (impl_generics, ty_generics, where_clause) = st.generics.split_for_impl();

    let expanded = quote! {
        #st

        impl #impl_generics ::synthetic_event::native_event::NativeEvent for #name #ty_generics #where_clause {
            fn field(&self, name: &str) -> ::core::option::Option<::synthetic_event::serde_json::Value> {
                match name {
                    #(#arms)*
                    _ => ::core::option::Option::None,
                }
            }

            #prevent_default
            #stop_propagation
        }
    };

    TokenStream::from(expanded)
}

// -------- parsing --------

struct NativeEventAttrConfig {
    prevent_default: Option<Ident>,
    stop_propagation: Option<Ident>,
}

impl Parse for NativeEventAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut cfg = Self {
            prevent_default: None,
            stop_propagation: None,
        };
        if input.is_empty() {
            return Ok(cfg);
        }

        let pairs: Punctuated<NativeEventAttrElem, Token![,]> =
            Punctuated::parse_terminated(input)?;

        for elem in pairs {
            let (slot, key, method) = match elem {
                NativeEventAttrElem::PreventDefault(m) => {
                    (&mut cfg.prevent_default, "prevent_default", m)
                }
                NativeEventAttrElem::StopPropagation(m) => {
                    (&mut cfg.stop_propagation, "stop_propagation", m)
                }
            };
            if slot.is_some() {
                return Err(syn::Error::new(
                    method.span(),
                    format!("duplicate key '{key}' in attribute"),
                ));
            }
            *slot = Some(method);
        }
        Ok(cfg)
    }
}

enum NativeEventAttrElem {
    PreventDefault(Ident),
    StopPropagation(Ident),
}

impl Parse for NativeEventAttrElem {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: Ident = input.parse()?;
        let _eq: Token![=] = input.parse()?;
        let method: Ident = input.parse()?;
        if key == "prevent_default" {
            Ok(Self::PreventDefault(method))
        } else if key == "stop_propagation" {
            Ok(Self::StopPropagation(method))
        } else {
            Err(syn::Error::new(
                key.span(),
                "unknown key in attribute; expected 'prevent_default' or 'stop_propagation'",
            ))
        }
    }
}
