//! Message struct and accessor generation.
//!
//! Every message becomes a plain struct whose fields are public and carry
//! serde attributes keeping the wire name and omitting absent values. An
//! inherent impl adds one getter and one setter per field.
//!
//! ## Examples
//!
//! For `SetSceneRequest { scene_id: uint32 [required] }`:
//!
//! ```ignore
//! #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
//! pub struct SetSceneRequest {
//!     #[serde(rename = "scene_id", default, skip_serializing_if = "Option::is_none")]
//!     pub scene_id: Option<u32>,
//! }
//!
//! impl SetSceneRequest {
//!     pub fn scene_id(&self) -> u32 { /* panics when unset */ }
//!     pub fn set_scene_id(&mut self, value: u32) -> &mut Self { ... }
//! }
//! ```

use jrpc_define::ScalarKind;
use proc_macro2::TokenStream;
use quote::quote;

use super::{ident, parse_type};
use crate::errors::GeneratorError;
use crate::plan::{FieldPlan, MessagePlan};
use crate::resolver::Container;

/// Generates the struct and accessor impl for a message.
pub fn generate_message(message: &MessagePlan) -> Result<TokenStream, GeneratorError> {
    let name = ident(&message.ident);
    let doc = format!(" `{}` message.", message.full_name);

    let allow = message
        .ident
        .contains('_')
        .then(|| quote! { #[allow(non_camel_case_types)] });

    let fields = message
        .fields
        .iter()
        .map(generate_field)
        .collect::<Result<Vec<_>, _>>()?;

    let accessors = message
        .fields
        .iter()
        .map(|field| {
            let getter = generate_getter(field)?;
            let setter = generate_setter(field)?;
            Ok(quote! { #getter #setter })
        })
        .collect::<Result<Vec<_>, GeneratorError>>()?;

    let accessor_impl = (!accessors.is_empty()).then(|| {
        quote! {
            impl #name {
                #(#accessors)*
            }
        }
    });

    Ok(quote! {
        #[doc = #doc]
        #allow
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct #name {
            #(#fields,)*
        }

        #accessor_impl
    })
}

fn generate_field(field: &FieldPlan) -> Result<TokenStream, GeneratorError> {
    let name = ident(&field.ident);
    let wire = &field.wire_name;
    let ty = parse_type(&field.ty.storage_type())?;
    let skip = match field.ty.container {
        Container::Single => "Option::is_none",
        Container::Repeated => "Vec::is_empty",
        Container::Map { .. } => "HashMap::is_empty",
    };

    Ok(quote! {
        #[serde(rename = #wire, default, skip_serializing_if = #skip)]
        pub #name: #ty
    })
}

/// The type a getter hands out for one element, borrowed unless `Copy`.
fn borrowed_element(field: &FieldPlan) -> Result<TokenStream, GeneratorError> {
    if field.ty.is_copy() {
        let ty = parse_type(&field.ty.element)?;
        return Ok(quote! { #ty });
    }
    let ty = match field.ty.scalar {
        Some(ScalarKind::String) => parse_type("str")?,
        Some(ScalarKind::Bytes) => parse_type("[u8]")?,
        _ => parse_type(&field.ty.element)?,
    };
    Ok(quote! { &#ty })
}

fn generate_getter(field: &FieldPlan) -> Result<TokenStream, GeneratorError> {
    let name = ident(&field.ident);
    let wire = &field.wire_name;

    match &field.ty.container {
        Container::Repeated => {
            let element = parse_type(&field.ty.element)?;
            let doc = format!(" Returns `{}`. An omitted list is empty.", wire);
            Ok(quote! {
                #[doc = #doc]
                pub fn #name(&self) -> &[#element] {
                    &self.#name
                }
            })
        }
        Container::Map { .. } => {
            let ty = parse_type(&field.ty.storage_type())?;
            let doc = format!(" Returns `{}`. An omitted map is empty.", wire);
            Ok(quote! {
                #[doc = #doc]
                pub fn #name(&self) -> &#ty {
                    &self.#name
                }
            })
        }
        Container::Single => {
            let ret = borrowed_element(field)?;
            let access = if field.ty.is_copy() {
                quote! { self.#name }
            } else {
                quote! { self.#name.as_deref() }
            };

            if field.rules.required {
                let doc = format!(" Returns `{}`.", wire);
                let message = format!("{} marked as required but was not set", wire);
                Ok(quote! {
                    #[doc = #doc]
                    #[doc = ""]
                    #[doc = " # Panics"]
                    #[doc = ""]
                    #[doc = " Panics if the field is unset. Validated messages always have it."]
                    pub fn #name(&self) -> #ret {
                        match #access {
                            Some(value) => value,
                            None => panic!("{}", #message),
                        }
                    }
                })
            } else {
                let doc = format!(" Returns `{}`, or `None` if it was not set.", wire);
                Ok(quote! {
                    #[doc = #doc]
                    pub fn #name(&self) -> Option<#ret> {
                        #access
                    }
                })
            }
        }
    }
}

fn generate_setter(field: &FieldPlan) -> Result<TokenStream, GeneratorError> {
    let name = ident(&field.ident);
    let setter = ident(&field.setter);
    let doc = format!(" Sets `{}`.", field.wire_name);

    let (param, assign) = match field.ty.container {
        Container::Single if field.ty.is_boxed() => {
            let ty = parse_type(&field.ty.element)?;
            (quote! { #ty }, quote! { Some(Box::new(value)) })
        }
        Container::Single if field.ty.scalar == Some(ScalarKind::String) => {
            (quote! { impl Into<String> }, quote! { Some(value.into()) })
        }
        Container::Single => {
            let ty = parse_type(&field.ty.element)?;
            (quote! { #ty }, quote! { Some(value) })
        }
        _ => {
            let ty = parse_type(&field.ty.storage_type())?;
            (quote! { #ty }, quote! { value })
        }
    };

    Ok(quote! {
        #[doc = #doc]
        pub fn #setter(&mut self, value: #param) -> &mut Self {
            self.#name = #assign;
            self
        }
    })
}
