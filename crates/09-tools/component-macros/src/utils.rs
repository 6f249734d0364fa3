//! 宏工具函数

use syn::{Field, Type};

/// 从类型中提取泛型参数
pub fn extract_generic_type(ty: &Type) -> Option<&Type> {
    match ty {
        Type::Path(type_path) => {
            if let Some(segment) = type_path.path.segments.last() {
                if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
                    if let Some(syn::GenericArgument::Type(inner_type)) = args.args.first() {
                        return Some(inner_type);
                    }
                }
            }
            None
        }
        _ => None,
    }
}

/// 检查类型是否为 Arc<T>，是则返回 T
pub fn arc_inner_type(ty: &Type) -> Option<&Type> {
    match ty {
        Type::Path(type_path) if type_path.qself.is_none() => {
            let segment = type_path.path.segments.last()?;
            if segment.ident == "Arc" {
                extract_generic_type(ty)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// 检查字段是否有特定属性
pub fn field_has_attribute(field: &Field, attr_name: &str) -> bool {
    field.attrs.iter().any(|attr| attr.path().is_ident(attr_name))
}

/// 去掉原始标识符的 `r#` 前缀
pub fn unraw(name: &str) -> &str {
    name.strip_prefix("r#").unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_arc_inner_type() {
        let ty: Type = parse_quote!(std::sync::Arc<Config>);
        let inner: Type = parse_quote!(Config);
        assert_eq!(arc_inner_type(&ty), Some(&inner));

        let ty: Type = parse_quote!(Box<Config>);
        assert!(arc_inner_type(&ty).is_none());

        let ty: Type = parse_quote!(u32);
        assert!(arc_inner_type(&ty).is_none());
    }

    #[test]
    fn test_unraw() {
        assert_eq!(unraw("r#type"), "type");
        assert_eq!(unraw("config"), "config");
    }
}
