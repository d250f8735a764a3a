//! `#[derive(JsonCoder)]`: Rust has no runtime reflection, so the type
//! shape `auto` needs has to be produced at compile time instead. This
//! macro walks a `syn::DeriveInput` and emits both an `impl
//! jcodec::auto::Described for #name` (the type's shape, for
//! introspection) and an `impl jcodec::auto::JsonCodable for #name` (the
//! code that actually builds a decoder/encoder for it), deferring each
//! field/variant's nested descriptor behind a `Thunk` so self-referential
//! types terminate (see `Described`'s doc comment in `jcodec::auto`).
//!
//! Generated code assumes the crate depending on this one also depends on
//! `jcodec` under its default name; there is no `$crate`-style indirection
//! for a renamed dependency, matching the simplicity of most single-purpose
//! derive macros in this ecosystem.

extern crate proc_macro;

mod codable;
mod describe;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use syn::{parse_macro_input, Data, DeriveInput};

#[proc_macro_derive(JsonCoder)]
pub fn derive_json_coder(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = input.ident.clone();

    let result: syn::Result<TokenStream2> = (|| match &input.data {
        Data::Struct(data) => {
            let described = describe::derive_for_struct(&name, data)?;
            let codable = codable::derive_for_struct(&name, data)?;
            Ok(quote::quote! { #described #codable })
        }
        Data::Enum(data) => {
            let described = describe::derive_for_enum(&name, data, &input.attrs)?;
            let codable = codable::derive_for_enum(&name, data, &input.attrs)?;
            Ok(quote::quote! { #described #codable })
        }
        Data::Union(_) => Err(syn::Error::new_spanned(
            &input.ident,
            "`JsonCoder` cannot be derived for a union",
        )),
    })();

    match result {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
