//! Derive macros for modelspec model testing.
//!
//! This crate provides procedural macros to automatically derive the
//! dynamic attribute-access capability for model types.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

/// Derive macro for implementing `Attributes` on a struct.
///
/// Every named field becomes an attribute addressable by its field name,
/// converted through `AttributeValue`. Unknown attribute names and
/// type-mismatched assignments panic with the offending name, so a
/// misconfigured check fails loudly instead of answering silently.
///
/// # Example
///
/// ```rust,ignore
/// use modelspec::Attributes;
///
/// #[derive(Attributes, Debug, Clone)]
/// struct User {
///     name: String,
///     age: i64,
///     email: Option<String>,
/// }
///
/// // `get("age")` and `set("age", Value::Int(30))` now work by name.
/// ```
#[proc_macro_derive(Attributes)]
pub fn derive_attributes(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match attributes_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Generate the implementation of the `Attributes` trait.
fn attributes_impl(input: &DeriveInput) -> Result<TokenStream2, syn::Error> {
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => named_fields(data)?,
        Data::Enum(_) | Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                input,
                "Attributes derive macro only supports structs with named fields",
            ));
        }
    };

    let type_name = name.to_string();
    let field_names: Vec<String> = fields.iter().map(|ident| ident.to_string()).collect();

    let get_arms = fields.iter().zip(&field_names).map(|(ident, name)| {
        quote! {
            #name => modelspec::AttributeValue::to_value(&self.#ident),
        }
    });

    let set_arms = fields.iter().zip(&field_names).map(|(ident, name)| {
        quote! {
            #name => {
                self.#ident = match modelspec::AttributeValue::from_value(value) {
                    Some(converted) => converted,
                    None => panic!(
                        "cannot assign that value to `{}#{}`",
                        #type_name, attribute,
                    ),
                };
            }
        }
    });

    let expanded = quote! {
        impl #impl_generics modelspec::Attributes for #name #ty_generics #where_clause {
            fn get(&self, attribute: &str) -> modelspec::Value {
                match attribute {
                    #(#get_arms)*
                    _ => panic!("no attribute named `{}` on `{}`", attribute, #type_name),
                }
            }

            fn set(&mut self, attribute: &str, value: modelspec::Value) {
                match attribute {
                    #(#set_arms)*
                    _ => panic!("no attribute named `{}` on `{}`", attribute, #type_name),
                }
            }
        }
    };

    Ok(expanded)
}

/// The named field identifiers of the struct, rejecting tuple and unit
/// structs.
fn named_fields(data: &syn::DataStruct) -> Result<Vec<syn::Ident>, syn::Error> {
    match &data.fields {
        Fields::Named(fields) => Ok(fields
            .named
            .iter()
            .map(|field| field.ident.clone().expect("named field has an ident"))
            .collect()),
        Fields::Unnamed(_) | Fields::Unit => Err(syn::Error::new_spanned(
            &data.fields,
            "Attributes derive macro requires named fields",
        )),
    }
}
