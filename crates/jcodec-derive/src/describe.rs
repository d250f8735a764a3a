use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, DataEnum, DataStruct, Fields, Ident};

/// A record: `struct Foo { a: A, b: B }` -> `TypeDescriptor::Record`, one
/// `(json_key, thunk)` pair per field, in declaration order (AUTO applies
/// the caller's `CaseStrategy` to `json_key` at generation time, not here).
pub fn derive_for_struct(name: &Ident, data: &DataStruct) -> syn::Result<TokenStream> {
    let named = match &data.fields {
        Fields::Named(named) => &named.named,
        Fields::Unnamed(_) | Fields::Unit => {
            return Err(syn::Error::new_spanned(
                name,
                "`JsonCoder` only supports structs with named fields",
            ));
        }
    };

    let field_entries = named.iter().map(|field| {
        let field_name = field.ident.as_ref().expect("named field").to_string();
        let ty = &field.ty;
        quote! {
            (#field_name, (|| <#ty as ::jcodec::auto::Described>::describe()) as ::jcodec::auto::Thunk)
        }
    });

    Ok(quote! {
        impl ::jcodec::auto::Described for #name {
            fn describe() -> ::jcodec::auto::TypeDescriptor {
                ::jcodec::auto::TypeDescriptor::Record {
                    fields: vec![#(#field_entries),*],
                }
            }
        }
    })
}

/// Two shapes, depending on the variants:
/// - Every variant is unit and the enum carries `#[repr(iNN/uNN)]`: a
///   C-like enum -> `TypeDescriptor::Enum`, discriminants extracted via
///   `as i64` (mirroring what the encoder does at runtime).
/// - Otherwise: a discriminated union -> `TypeDescriptor::Union`, one
///   `(variant_name, field_thunks)` entry per variant.
pub fn derive_for_enum(name: &Ident, data: &DataEnum, attrs: &[Attribute]) -> syn::Result<TokenStream> {
    let all_unit = data.variants.iter().all(|v| matches!(v.fields, Fields::Unit));
    let repr = attrs.iter().find_map(extract_repr_ident);

    if all_unit {
        if let Some(repr_ty) = repr {
            let repr_name = repr_ty.to_string();
            let members = data.variants.iter().map(|v| {
                let variant_ident = &v.ident;
                let variant_name = variant_ident.to_string();
                quote! { (#variant_name, #name::#variant_ident as i64) }
            });
            return Ok(quote! {
                impl ::jcodec::auto::Described for #name {
                    fn describe() -> ::jcodec::auto::TypeDescriptor {
                        ::jcodec::auto::TypeDescriptor::Enum {
                            repr: #repr_name,
                            members: vec![#(#members),*],
                        }
                    }
                }
            });
        }
    }

    let mut cases = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        let variant_ident = &variant.ident;
        let variant_name = variant_ident.to_string();
        let field_thunks = match &variant.fields {
            Fields::Unit => quote! { vec![] },
            Fields::Unnamed(fields) => {
                let thunks = fields.unnamed.iter().map(|field| {
                    let ty = &field.ty;
                    quote! { (|| <#ty as ::jcodec::auto::Described>::describe()) as ::jcodec::auto::Thunk }
                });
                quote! { vec![#(#thunks),*] }
            }
            Fields::Named(_) => {
                return Err(syn::Error::new_spanned(
                    variant_ident,
                    "`JsonCoder` does not support enum variants with named fields",
                ));
            }
        };
        cases.push(quote! { (#variant_name, #field_thunks) });
    }

    Ok(quote! {
        impl ::jcodec::auto::Described for #name {
            fn describe() -> ::jcodec::auto::TypeDescriptor {
                ::jcodec::auto::TypeDescriptor::Union {
                    cases: vec![#(#cases),*],
                }
            }
        }
    })
}

fn extract_repr_ident(attr: &Attribute) -> Option<Ident> {
    if !attr.path().is_ident("repr") {
        return None;
    }
    let mut found = None;
    let _ = attr.parse_nested_meta(|meta| {
        if let Some(ident) = meta.path.get_ident() {
            found = Some(ident.clone());
        }
        Ok(())
    });
    found
}
