//! # Bitform Derive Macros
//!
//! This crate provides the procedural macros for `bitform`. It enumerates struct fields
//! at compile time so plain-data composites need no hand-written codec:
//!
//! * `Encode` / `Decode` on a struct: every field in declaration order.
//! * `Encode` / `Decode` on a fieldless enum with an integer `#[repr]`: the
//!   discriminant as that integer.
//! * `Reflect` on a struct: field count and in-memory offsets.
//!
//! `Encode` and `Decode` expand independently, so deriving only one of them is not an
//! error until the missing direction is used. Pair them with
//! `const _: () = bitform::assert_codec::<MyType>();` to fail at the definition instead.
//!
//! Compatible with `syn 2.0`.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse_macro_input, parse_quote, Attribute, Data, DataEnum, DataStruct, DeriveInput, Fields,
    Generics, Ident, Index, Member,
};

/// Derives `bitform::Encode`.
///
/// Does not imply `Decode`; see `bitform::assert_codec` for a definition-site check.
#[proc_macro_derive(Encode, attributes(bitform))]
pub fn derive_encode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input, Direction::Encode)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Derives `bitform::Decode`.
///
/// Does not imply `Encode`; see `bitform::assert_codec` for a definition-site check.
#[proc_macro_derive(Decode, attributes(bitform))]
pub fn derive_decode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input, Direction::Decode)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Derives `bitform::Reflect`.
#[proc_macro_derive(Reflect, attributes(bitform))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_reflect(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[derive(Clone, Copy)]
enum Direction {
    Encode,
    Decode,
}

impl Direction {
    fn trait_path(self) -> TokenStream2 {
        match self {
            Self::Encode => quote! { bitform::Encode },
            Self::Decode => quote! { bitform::Decode },
        }
    }
}

// --- Internal Data Structures ---

struct StructField {
    member: Member,
    ty: syn::Type,
    skip: bool,
}

fn collect_fields(fields: &Fields) -> syn::Result<Vec<StructField>> {
    fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let member = match &field.ident {
                Some(ident) => Member::Named(ident.clone()),
                None => Member::Unnamed(Index::from(i)),
            };
            Ok(StructField {
                member,
                ty: field.ty.clone(),
                skip: parse_field_attributes(&field.attrs)?,
            })
        })
        .collect()
}

/// Parses `#[bitform(...)]` on a field. Returns `is_skipped`.
fn parse_field_attributes(attrs: &[Attribute]) -> syn::Result<bool> {
    let mut skip = false;

    for attr in attrs {
        if attr.path().is_ident("bitform") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    skip = true;
                    return Ok(());
                }
                Err(meta.error("Unknown bitform attribute key. Supported: skip"))
            })?;
        }
    }
    Ok(skip)
}

/// Finds the integer `#[repr(..)]` of an enum.
fn parse_repr(name: &Ident, attrs: &[Attribute]) -> syn::Result<Ident> {
    const INTEGER_REPRS: [&str; 10] = [
        "u8", "u16", "u32", "u64", "usize", "i8", "i16", "i32", "i64", "isize",
    ];
    let mut repr = None;

    for attr in attrs {
        if attr.path().is_ident("repr") {
            attr.parse_nested_meta(|meta| {
                if meta.input.peek(syn::token::Paren) {
                    // `align(N)` / `packed(N)`
                    let _args;
                    syn::parenthesized!(_args in meta.input);
                    return Ok(());
                }
                if let Some(ident) = meta.path.get_ident() {
                    if INTEGER_REPRS.iter().any(|r| ident == r) {
                        repr = Some(ident.clone());
                    }
                }
                Ok(())
            })?;
        }
    }

    repr.ok_or_else(|| {
        syn::Error::new(
            name.span(),
            "bitform enums need an integer repr, e.g. #[repr(u8)]",
        )
    })
}

fn add_trait_bounds(mut generics: Generics, bound: &TokenStream2) -> Generics {
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(#bound));
    }
    generics
}

// --- Generator: Encode / Decode ---

fn expand(input: &DeriveInput, direction: Direction) -> syn::Result<TokenStream2> {
    match &input.data {
        Data::Struct(data) => expand_struct(input, data, direction),
        Data::Enum(data) => expand_enum(input, data, direction),
        Data::Union(_) => Err(syn::Error::new(
            input.ident.span(),
            "bitform cannot derive for unions",
        )),
    }
}

fn expand_struct(
    input: &DeriveInput,
    data: &DataStruct,
    direction: Direction,
) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let trait_path = direction.trait_path();
    let generics = add_trait_bounds(input.generics.clone(), &trait_path);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let fields = collect_fields(&data.fields)?;
    let wired = fields.iter().filter(|f| !f.skip);

    let body = match direction {
        Direction::Encode => {
            let stmts = wired.map(|f| {
                let member = &f.member;
                quote! { bitform::Serializer::put(ser, &self.#member)?; }
            });
            quote! {
                #[allow(unused_variables)]
                fn encode<S: bitform::Serializer>(&self, ser: &mut S) -> bitform::Result<()> {
                    #(#stmts)*
                    Ok(())
                }
            }
        }
        Direction::Decode => {
            let stmts = wired.map(|f| {
                let member = &f.member;
                quote! { bitform::Deserializer::get(de, &mut self.#member)?; }
            });
            quote! {
                #[allow(unused_variables)]
                fn decode<D: bitform::Deserializer>(&mut self, de: &mut D) -> bitform::Result<()> {
                    #(#stmts)*
                    Ok(())
                }
            }
        }
    };

    Ok(quote! {
        impl #impl_generics #trait_path for #name #ty_generics #where_clause {
            const STRATEGY: bitform::Strategy = bitform::Strategy::Composite;

            #body
        }
    })
}

fn expand_enum(
    input: &DeriveInput,
    data: &DataEnum,
    direction: Direction,
) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "bitform enums cannot be generic",
        ));
    }
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new(
                variant.ident.span(),
                "bitform enums must be fieldless",
            ));
        }
    }

    let repr = parse_repr(name, &input.attrs)?;
    let trait_path = direction.trait_path();
    let variants: Vec<&Ident> = data.variants.iter().map(|v| &v.ident).collect();

    let body = match direction {
        Direction::Encode => quote! {
            fn encode<S: bitform::Serializer>(&self, ser: &mut S) -> bitform::Result<()> {
                let raw: #repr = match self {
                    #(Self::#variants => Self::#variants as #repr,)*
                };
                bitform::Serializer::give(ser, raw, bitform::rt::repr_bits::<#repr>())
            }
        },
        Direction::Decode => quote! {
            fn decode<D: bitform::Deserializer>(&mut self, de: &mut D) -> bitform::Result<()> {
                let raw: #repr = bitform::Deserializer::take(de, bitform::rt::repr_bits::<#repr>())?;
                *self = match raw {
                    #(r if r == Self::#variants as #repr => Self::#variants,)*
                    other => return Err(bitform::rt::invalid_discriminant::<Self, #repr>(other)),
                };
                Ok(())
            }
        },
    };

    Ok(quote! {
        impl #trait_path for #name {
            const STRATEGY: bitform::Strategy = bitform::Strategy::Enumeration;

            #body
        }
    })
}

// --- Generator: Reflect ---

fn expand_reflect(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let data = match &input.data {
        Data::Struct(data) => data,
        _ => {
            return Err(syn::Error::new(
                name.span(),
                "Reflect only supports structs",
            ))
        }
    };

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let fields = collect_fields(&data.fields)?;
    let count = fields.len();

    let entries = fields.iter().map(|f| {
        let member = &f.member;
        let ty = &f.ty;
        let field_name = match member {
            Member::Named(ident) => ident.to_string(),
            Member::Unnamed(index) => index.index.to_string(),
        };
        quote! {
            bitform::rt::Field {
                name: #field_name,
                offset: ::core::mem::offset_of!(Self, #member),
                size: ::core::mem::size_of::<#ty>(),
                align: ::core::mem::align_of::<#ty>(),
            }
        }
    });

    Ok(quote! {
        impl #impl_generics bitform::Reflect for #name #ty_generics #where_clause {
            const FIELD_COUNT: usize = #count;

            fn layout() -> bitform::rt::Layout {
                bitform::rt::Layout::new(::std::vec![#(#entries),*])
            }
        }
    })
}
