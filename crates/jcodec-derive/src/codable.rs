//! Emits `impl ::jcodec::auto::JsonCodable for #name`: the code that
//! actually builds a decoder/encoder, as opposed to `describe`'s
//! `Described` impl, which only reports the type's shape. See
//! `jcodec::auto::codable`'s module doc for why these are two separate
//! traits.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Attribute, DataEnum, DataStruct, Fields, Ident, Type};

/// `Option<Inner>` detected syntactically (the same heuristic most derive
/// macros in this ecosystem use for "is this field optional" -- it breaks
/// only for a field type named `Option` that isn't `core`'s, which no
/// sane codebase does).
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else { return None };
    let segment = path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else { return None };
    match args.args.first()? {
        syn::GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

pub fn derive_for_struct(name: &Ident, data: &DataStruct) -> syn::Result<TokenStream> {
    let named = match &data.fields {
        Fields::Named(named) => &named.named,
        Fields::Unnamed(_) | Fields::Unit => {
            return Err(syn::Error::new_spanned(name, "`JsonCoder` only supports structs with named fields"));
        }
    };

    let mut key_lets = Vec::new();
    let mut dec_lets = Vec::new();
    let mut enc_lets = Vec::new();
    let mut field_inits = Vec::new();
    let mut encode_pushes = Vec::new();

    for (i, field) in named.iter().enumerate() {
        let field_ident = field.ident.as_ref().expect("named field");
        let field_name = field_ident.to_string();
        let key_ident = format_ident!("__jcodec_key_{}", i);
        let dec_ident = format_ident!("__jcodec_dec_{}", i);
        let enc_ident = format_ident!("__jcodec_enc_{}", i);

        if let Some(inner) = option_inner(&field.ty) {
            key_lets.push(quote! {
                let #key_ident: &'static str = Box::leak(ctx.case.convert(#field_name).into_boxed_str());
            });
            dec_lets.push(quote! {
                let #dec_ident = ::jcodec::auto::resolve_decoder::<#inner>(ctx);
            });
            enc_lets.push(quote! {
                let #enc_ident = ::jcodec::auto::resolve_encoder::<#inner>(ctx);
            });
            field_inits.push(quote! {
                #field_ident: get.optional.field(#key_ident, #dec_ident.clone())
            });
            encode_pushes.push(quote! {
                match &v.#field_ident {
                    Some(inner) => fields.push((#key_ident.to_string(), #enc_ident.encode(inner))),
                    None => if !skip_null_field {
                        fields.push((#key_ident.to_string(), ::jcodec::null()));
                    },
                }
            });
        } else {
            let ty = &field.ty;
            key_lets.push(quote! {
                let #key_ident: &'static str = Box::leak(ctx.case.convert(#field_name).into_boxed_str());
            });
            dec_lets.push(quote! {
                let #dec_ident = ::jcodec::auto::resolve_decoder::<#ty>(ctx);
            });
            enc_lets.push(quote! {
                let #enc_ident = ::jcodec::auto::resolve_encoder::<#ty>(ctx);
            });
            field_inits.push(quote! {
                #field_ident: get.required.field(#key_ident, #dec_ident.clone())
            });
            encode_pushes.push(quote! {
                fields.push((#key_ident.to_string(), #enc_ident.encode(&v.#field_ident)));
            });
        }
    }

    Ok(quote! {
        impl ::jcodec::auto::JsonCodable for #name {
            fn build_decoder(ctx: &::jcodec::auto::GenContext) -> ::jcodec::Decoder<Self> {
                #(#key_lets)*
                #(#dec_lets)*
                ::jcodec::object(move |get: &::jcodec::Getters<::jcodec::Json>| #name {
                    #(#field_inits),*
                })
            }

            fn build_encoder(ctx: &::jcodec::auto::GenContext) -> ::jcodec::Encoder<Self> {
                #(#key_lets)*
                #(#enc_lets)*
                let skip_null_field = ctx.skip_null_field;
                ::jcodec::Encoder::new(move |v: &#name| {
                    let mut fields: Vec<(String, ::jcodec::Json)> = Vec::new();
                    #(#encode_pushes)*
                    ::jcodec::encode::object(fields)
                })
            }
        }
    })
}

pub fn derive_for_enum(name: &Ident, data: &DataEnum, attrs: &[Attribute]) -> syn::Result<TokenStream> {
    let all_unit = data.variants.iter().all(|v| matches!(v.fields, Fields::Unit));
    let repr = attrs.iter().find_map(extract_repr_ident);

    if all_unit {
        if let Some(repr_ty) = repr {
            let repr_method = match repr_ty.to_string().as_str() {
                "i8" | "u8" | "i16" | "u16" | "i32" | "u32" => repr_ty.clone(),
                other => {
                    return Err(syn::Error::new_spanned(
                        &repr_ty,
                        format!("`JsonCoder` doesn't support a C-like enum's `#[repr({other})]`; use i8/u8/i16/u16/i32/u32"),
                    ))
                }
            };
            let variant_pairs = data.variants.iter().map(|v| {
                let variant_ident = &v.ident;
                quote! { (#name::#variant_ident as #repr_method, #name::#variant_ident) }
            });
            let decode_fn = format_ident!("{}", repr_method.to_string());
            return Ok(quote! {
                // `*v as #repr_method` below needs `Self: Copy`, which every
                // fieldless `#[repr(iNN)]` enum can derive.
                impl ::jcodec::auto::JsonCodable for #name where Self: Copy {
                    fn build_decoder(_ctx: &::jcodec::auto::GenContext) -> ::jcodec::Decoder<Self> {
                        ::jcodec::decode::Enum::#decode_fn(vec![#(#variant_pairs),*])
                    }

                    fn build_encoder(_ctx: &::jcodec::auto::GenContext) -> ::jcodec::Encoder<Self> {
                        ::jcodec::encode::Enum::#decode_fn(|v: &#name| *v as #repr_method)
                    }
                }
            });
        }
    }

    let mut decode_variants = Vec::new();
    let mut encode_arms = Vec::new();
    let mut pre_lets = Vec::new();

    for (vi, variant) in data.variants.iter().enumerate() {
        let variant_ident = &variant.ident;
        let variant_name = variant_ident.to_string();
        match &variant.fields {
            Fields::Unit => {
                // Tolerates both the bare-string form (`"Bar"`) and the
                // trailing-empty array form (`["Bar"]`) for a 0-arity
                // variant.
                decode_variants.push(quote! {
                    ::jcodec::decode::one_of(vec![
                        ::jcodec::decode::and_then(::jcodec::decode::string(), |tag: String| {
                            if tag == #variant_name {
                                ::jcodec::decode::succeed(#name::#variant_ident)
                            } else {
                                ::jcodec::decode::fail("tag mismatch")
                            }
                        }),
                        ::jcodec::decode::and_then(::jcodec::decode::index(0, ::jcodec::decode::string()), |tag: String| {
                            if tag == #variant_name {
                                ::jcodec::decode::succeed(#name::#variant_ident)
                            } else {
                                ::jcodec::decode::fail("tag mismatch")
                            }
                        }),
                    ])
                });
                encode_arms.push(quote! {
                    #name::#variant_ident => ::jcodec::encode::string::<::jcodec::Json>().encode(&#variant_name.to_string())
                });
            }
            Fields::Unnamed(fields) => {
                let n = fields.unnamed.len();
                if n == 0 || n > 8 {
                    return Err(syn::Error::new_spanned(
                        variant_ident,
                        "`JsonCoder` supports discriminated-union variants with 1 to 8 fields",
                    ));
                }
                let binders: Vec<Ident> = (0..n).map(|i| format_ident!("f{}", i)).collect();
                let enc_idents: Vec<Ident> =
                    (0..n).map(|i| format_ident!("__jcodec_enc_v{}_f{}", vi, i)).collect();
                for (i, field) in fields.unnamed.iter().enumerate() {
                    let ty = &field.ty;
                    let enc_ident = &enc_idents[i];
                    pre_lets.push(quote! {
                        let #enc_ident = ::jcodec::auto::resolve_encoder::<#ty>(ctx);
                    });
                }
                let field_decoders = fields.unnamed.iter().enumerate().map(|(i, field)| {
                    let ty = &field.ty;
                    let idx = i + 1;
                    quote! { ::jcodec::decode::index(#idx, ::jcodec::auto::resolve_decoder::<#ty>(ctx)) }
                });
                let map_fn = format_ident!("map{}", n);
                let total_len = n + 1;
                decode_variants.push(quote! {
                    ::jcodec::decode::and_then(
                        ::jcodec::decode::index(0, ::jcodec::decode::string()),
                        |tag: String| {
                            if tag == #variant_name {
                                ::jcodec::decode::and_then(::jcodec::decode::exact_length(#total_len), move |_| {
                                    ::jcodec::decode::#map_fn(
                                        |#(#binders),*| #name::#variant_ident(#(#binders),*),
                                        #(#field_decoders),*
                                    )
                                })
                            } else {
                                ::jcodec::decode::fail("tag mismatch")
                            }
                        },
                    )
                });
                encode_arms.push(quote! {
                    #name::#variant_ident(#(#binders),*) => ::jcodec::encode::seq(vec![
                        ::jcodec::encode::string::<::jcodec::Json>().encode(&#variant_name.to_string()),
                        #(#enc_idents.encode(#binders)),*
                    ])
                });
            }
            Fields::Named(_) => {
                return Err(syn::Error::new_spanned(
                    variant_ident,
                    "`JsonCoder` does not support enum variants with named fields",
                ));
            }
        }
    }

    let type_name = name.to_string();
    let has_unit_variant = data.variants.iter().any(|v| matches!(v.fields, Fields::Unit));
    // `decode::succeed` needs to hand back an owned value without consuming
    // the decoder, so a unit variant requires `Self: Clone`.
    let clone_bound = if has_unit_variant { quote! { where Self: Clone } } else { quote! {} };

    Ok(quote! {
        impl ::jcodec::auto::JsonCodable for #name #clone_bound {
            fn build_decoder(ctx: &::jcodec::auto::GenContext) -> ::jcodec::Decoder<Self> {
                ::jcodec::auto::union_decoder(#type_name, vec![#(#decode_variants),*])
            }

            fn build_encoder(ctx: &::jcodec::auto::GenContext) -> ::jcodec::Encoder<Self> {
                #(#pre_lets)*
                ::jcodec::Encoder::new(move |v: &#name| match v {
                    #(#encode_arms),*
                })
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
