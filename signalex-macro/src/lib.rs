use proc_macro::TokenStream;

/// Implements `signalex_core::EcsComponent`, naming the component after the type unless
/// `#[ecs(name = "...")]` says otherwise.
#[proc_macro_derive(EcsComponent, attributes(ecs))]
pub fn derive_ecs_component(item: TokenStream) -> TokenStream {
    signalex_macro_core::components::derive_ecs_component(item.into())
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
