//! `rt::Validate` impl generation.
//!
//! Checks run per field in declaration order: nested messages first, then
//! presence, then `min`, then `max`. The first failure is returned.

use proc_macro2::TokenStream;
use quote::quote;

use super::{bound_literal, ident};
use crate::errors::GeneratorError;
use crate::plan::{FieldPlan, MessagePlan};
use crate::rules::Recurse;

/// Generates `impl rt::Validate for <Message>`.
///
/// ## Examples
///
/// For a required `scene_id` with `max = 100`:
///
/// ```ignore
/// impl rt::Validate for SetSceneRequest {
///     fn validate(&self) -> Result<(), rt::Error> {
///         if self.scene_id.is_none() {
///             return Err(rt::Error::bad_request("field 'scene_id' is required"));
///         }
///         if self.scene_id.is_some_and(|value| value > 100) {
///             return Err(rt::Error::bad_request("field 'scene_id' should be ≤ 100"));
///         }
///         Ok(())
///     }
/// }
/// ```
pub fn generate_validate(message: &MessagePlan) -> Result<TokenStream, GeneratorError> {
    let name = ident(&message.ident);
    let checks = message
        .fields
        .iter()
        .map(field_checks)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(quote! {
        impl rt::Validate for #name {
            fn validate(&self) -> Result<(), rt::Error> {
                #(#checks)*
                Ok(())
            }
        }
    })
}

fn field_checks(field: &FieldPlan) -> Result<TokenStream, GeneratorError> {
    let name = ident(&field.ident);
    let wire = &field.wire_name;
    let rules = &field.rules;

    let recurse = rules.recurse.map(|recurse| match recurse {
        Recurse::Single => quote! {
            if let Some(value) = self.#name.as_deref() {
                rt::Validate::validate(value)?;
            }
        },
        Recurse::Repeated => quote! {
            for value in &self.#name {
                rt::Validate::validate(value)?;
            }
        },
        Recurse::MapValues => quote! {
            for value in self.#name.values() {
                rt::Validate::validate(value)?;
            }
        },
    });

    let required = rules.required.then(|| {
        let message = format!("field '{}' is required", wire);
        quote! {
            if self.#name.is_none() {
                return Err(rt::Error::bad_request(#message));
            }
        }
    });

    let is_float = field.ty.numeric_kind().is_some_and(|kind| kind.is_float());

    let min = rules
        .min
        .map(|bound| {
            let literal = bound_literal(bound, is_float)?;
            let message = format!("field '{}' should be ≥ {}", wire, bound);
            Ok::<_, GeneratorError>(quote! {
                if self.#name.is_some_and(|value| value < #literal) {
                    return Err(rt::Error::bad_request(#message));
                }
            })
        })
        .transpose()?;

    let max = rules
        .max
        .map(|bound| {
            let literal = bound_literal(bound, is_float)?;
            let message = format!("field '{}' should be ≤ {}", wire, bound);
            Ok::<_, GeneratorError>(quote! {
                if self.#name.is_some_and(|value| value > #literal) {
                    return Err(rt::Error::bad_request(#message));
                }
            })
        })
        .transpose()?;

    Ok(quote! { #recurse #required #min #max })
}
