use proc_macro2::TokenStream;
use quote::quote;
use syn::parse2;
use syn::DeriveInput;
use syn::LitStr;

pub fn derive_ecs_component(item: TokenStream) -> syn::Result<TokenStream> {
    let input: DeriveInput = parse2(item)?;
    let name = component_name(&input)?;
    let ty = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics ::signalex_core::EcsComponent for #ty #ty_generics #where_clause {
            const NAME: &'static str = #name;
        }
    })
}

fn component_name(input: &DeriveInput) -> syn::Result<LitStr> {
    let mut name = None;
    for attr in input.attrs.iter().filter(|it| it.path().is_ident("ecs")) {
        attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident("name") {
                return Err(meta.error("expected `name = \"...\"`"));
            }
            let value: LitStr = meta.value()?.parse()?;
            if value.value().is_empty() {
                return Err(meta.error("component name must not be empty"));
            }
            name = Some(value);
            Ok(())
        })?;
    }
    Ok(name.unwrap_or_else(|| LitStr::new(&input.ident.to_string(), input.ident.span())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn expand(source: &str) -> syn::Result<String> {
        let item = TokenStream::from_str(source).unwrap();
        let output = derive_ecs_component(item)?;
        Ok(prettyplease::unparse(&parse2(output).unwrap()))
    }

    #[test]
    fn name_defaults_to_type_name() {
        let output = expand("struct Health(i32);").unwrap();

        assert_eq!(
            output,
            "impl ::signalex_core::EcsComponent for Health {\n    const NAME: &'static str = \"Health\";\n}\n"
        );
    }

    #[test]
    fn name_attribute_overrides_type_name() {
        let output = expand(
            r#"
            #[derive(Debug)]
            #[ecs(name = "position")]
            struct Position { x: f32, y: f32 }
            "#,
        )
        .unwrap();

        assert!(output.contains("const NAME: &'static str = \"position\";"));
    }

    #[test]
    fn generics_are_carried_over() {
        let output = expand("struct Tagged<T: Clone + 'static> { value: T }").unwrap();

        assert!(output.contains("impl<T: Clone + 'static> ::signalex_core::EcsComponent for Tagged<T>"));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = expand(r#"#[ecs(label = "x")] struct A;"#).unwrap_err();

        assert_eq!(err.to_string(), "expected `name = \"...\"`");
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = expand(r#"#[ecs(name = "")] struct A;"#).unwrap_err();

        assert_eq!(err.to_string(), "component name must not be empty");
    }
}
