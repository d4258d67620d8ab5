use syn::{Attribute, LitStr};

/// 字段级参数：`#[native(rename = "...")]` / `#[native(skip)]`
#[derive(Default)]
pub(crate) struct FieldOptions {
    pub(crate) rename: Option<String>,
    pub(crate) skip: bool,
}

// 解析并移除 #[native(...)]，其余属性原样保留
pub(crate) fn take_field_options(attrs: &mut Vec<Attribute>) -> syn::Result<FieldOptions> {
    let mut opts = FieldOptions::default();
    let mut retained = Vec::with_capacity(attrs.len());

    for attr in attrs.drain(..) {
        if !attr.path().is_ident("native") {
            retained.push(attr);
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                opts.skip = true;
                Ok(())
            } else if meta.path.is_ident("rename") {
                if opts.rename.is_some() {
                    return Err(meta.error("duplicate key 'rename' in attribute"));
                }
                let lit: LitStr = meta.value()?.parse()?;
                opts.rename = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("unknown key in attribute; expected 'rename' or 'skip'"))
            }
        })?;
    }

    *attrs = retained;
    Ok(opts)
}

// snake_case → camelCase
pub(crate) fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for ch in name.chars() {
        if ch == '_' {
            upper_next = !out.is_empty();
            continue;
        }
        if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::camel_case;

    #[test]
    fn converts_snake_case_field_names() {
        assert_eq!(camel_case("client_x"), "clientX");
        assert_eq!(camel_case("data_transfer"), "dataTransfer");
        assert_eq!(camel_case("is_trusted"), "isTrusted");
        assert_eq!(camel_case("button"), "button");
        assert_eq!(camel_case("_private"), "private");
    }
}
