use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

pub fn derive_component(input: TokenStream) -> TokenStream {
    // Parse the input tokens into a syntax tree
    let ast = parse_macro_input!(input as DeriveInput);

    // Component storage is keyed by `TypeId`, so generic components are allowed as long as every
    // instantiation is `'static`. The trait itself carries that bound.
    let struct_name = &ast.ident;
    let (impl_generics, type_generics, where_clause) = ast.generics.split_for_impl();

    // `::sparse_engine` resolves inside the crate through `extern crate self as sparse_engine;`
    // in lib.rs, and outside the crate through the normal dependency name.
    TokenStream::from(quote! {
        impl #impl_generics ::sparse_engine::ecs::Component for #struct_name #type_generics #where_clause {
        }
    })
}
