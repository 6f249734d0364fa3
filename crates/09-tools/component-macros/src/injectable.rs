//! Injectable 派生宏实现

use crate::utils::{arc_inner_type, field_has_attribute, unraw};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, Ident, LitStr};

/// 字段的注入方式
enum FieldKind<'a> {
    /// `Arc<T>` 依赖
    Dependency { ident: &'a Ident, name: LitStr, ty: &'a syn::Type },
    /// `#[inject(default)]` 字段
    Default { ident: &'a Ident },
}

pub fn derive_injectable_impl(input: DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => Some(&fields.named),
            Fields::Unit => None,
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Injectable 只支持具名字段结构体，依赖按字段名绑定",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(name, "Injectable 只能用于结构体"));
        }
    };

    let mut kinds = Vec::new();
    for field in fields.into_iter().flatten() {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };

        if field_has_attribute(field, "inject") {
            parse_inject_attribute(&field.attrs)?;
            kinds.push(FieldKind::Default { ident });
            continue;
        }

        match arc_inner_type(&field.ty) {
            Some(ty) => kinds.push(FieldKind::Dependency {
                ident,
                name: LitStr::new(unraw(&ident.to_string()), ident.span()),
                ty,
            }),
            None => {
                return Err(syn::Error::new_spanned(
                    &field.ty,
                    "依赖字段必须是 Arc<T>，其他字段请标记 #[inject(default)]",
                ));
            }
        }
    }

    let lifetime = parse_lifetime(&input.attrs)?;
    Ok(expand_named(name, &input, kinds, lifetime))
}

fn expand_named(
    name: &Ident,
    input: &DeriveInput,
    kinds: Vec<FieldKind<'_>>,
    lifetime: Option<Ident>,
) -> TokenStream {
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let specs = kinds.iter().filter_map(|kind| match kind {
        FieldKind::Dependency { name, ty, .. } => Some(quote! {
            ::di_abstractions::DependencySpec::of::<#ty>(#name)
        }),
        FieldKind::Default { .. } => None,
    });

    let initializers = kinds.iter().map(|kind| match kind {
        FieldKind::Dependency { ident, name, ty } => quote! {
            #ident: dependencies.take::<#ty>(#name)?
        },
        FieldKind::Default { ident } => quote! {
            #ident: ::std::default::Default::default()
        },
    });

    let lifetime_fn = lifetime_tokens(lifetime);

    quote! {
        impl #impl_generics ::di_abstractions::Injectable for #name #ty_generics #where_clause {
            fn dependencies() -> ::std::vec::Vec<::di_abstractions::DependencySpec> {
                ::std::vec![#(#specs),*]
            }

            #[allow(unused_variables)]
            fn inject(
                dependencies: &mut ::di_abstractions::ResolvedDependencies,
            ) -> ::std::result::Result<Self, ::infrastructure_common::BoxError> {
                ::std::result::Result::Ok(Self {
                    #(#initializers),*
                })
            }

            #lifetime_fn
        }
    }
}

fn lifetime_tokens(lifetime: Option<Ident>) -> TokenStream {
    match lifetime {
        Some(variant) => quote! {
            fn default_lifetime() -> ::infrastructure_common::Lifetime {
                ::infrastructure_common::Lifetime::#variant
            }
        },
        None => TokenStream::new(),
    }
}

/// 解析 `#[injectable(singleton)]` / `#[injectable(transient)]`
fn parse_lifetime(attrs: &[Attribute]) -> syn::Result<Option<Ident>> {
    let mut lifetime = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("injectable")) {
        attr.parse_nested_meta(|meta| {
            let variant = if meta.path.is_ident("singleton") {
                "Singleton"
            } else if meta.path.is_ident("transient") {
                "Transient"
            } else {
                return Err(meta.error("未知的生命周期，可选值: singleton, transient"));
            };
            lifetime = Some(Ident::new(variant, proc_macro2::Span::call_site()));
            Ok(())
        })?;
    }
    Ok(lifetime)
}

/// 字段上只接受 `#[inject(default)]`
fn parse_inject_attribute(attrs: &[Attribute]) -> syn::Result<()> {
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("inject")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("default") {
                Ok(())
            } else {
                Err(meta.error("字段属性只支持 #[inject(default)]"))
            }
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_named_struct_generates_specs_in_field_order() {
        let input: DeriveInput = parse_quote! {
            #[injectable(singleton)]
            struct Reporter {
                repository: Arc<Repository>,
                settings: Arc<Settings>,
                #[inject(default)]
                count: u32,
            }
        };

        let output = derive_injectable_impl(input).unwrap().to_string();
        let repository = output.find("\"repository\"").unwrap();
        let settings = output.find("\"settings\"").unwrap();
        assert!(repository < settings);
        assert!(output.contains("Singleton"));
        assert!(output.contains("Default :: default"));
    }

    #[test]
    fn test_plain_field_is_rejected() {
        let input: DeriveInput = parse_quote! {
            struct Broken {
                name: String,
            }
        };

        assert!(derive_injectable_impl(input).is_err());
    }

    #[test]
    fn test_tuple_struct_is_rejected() {
        let input: DeriveInput = parse_quote! {
            struct Broken(Arc<Settings>);
        };

        assert!(derive_injectable_impl(input).is_err());
    }

    #[test]
    fn test_unknown_lifetime_is_rejected() {
        let input: DeriveInput = parse_quote! {
            #[injectable(scoped)]
            struct Broken {
                settings: Arc<Settings>,
            }
        };

        assert!(derive_injectable_impl(input).is_err());
    }

    #[test]
    fn test_unit_struct_has_no_dependencies() {
        let input: DeriveInput = parse_quote! {
            struct Clock;
        };

        let output = derive_injectable_impl(input).unwrap().to_string();
        assert!(!output.contains("DependencySpec :: of"));
    }
}
