//! Token emitters for each kind of generated item.
//!
//! Each submodule turns part of a [`UnitPlan`](crate::plan::UnitPlan) into a
//! `TokenStream`. Generated code reaches the runtime crate through the `rt`
//! alias declared at the top of the module.
//!
//! - [`types`] - message structs with getters and setters
//! - [`validate`] - `rt::Validate` impls
//! - [`router`] - one router type per service
//! - [`client`] - client call stubs per method
//! - [`events`] - publish methods and subscriber wrappers for event messages

pub mod client;
pub mod events;
pub mod router;
pub mod types;
pub mod validate;

pub use client::generate_client;
pub use events::generate_event;
pub use router::generate_router;
pub use types::generate_message;
pub use validate::generate_validate;

use jrpc_define::{Bound, HttpMethod};
use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;

use crate::errors::GeneratorError;

/// Builds an identifier, honoring the `r#` prefix of raw identifiers.
pub(crate) fn ident(name: &str) -> Ident {
    match name.strip_prefix("r#") {
        Some(raw) => Ident::new_raw(raw, Span::call_site()),
        None => Ident::new(name, Span::call_site()),
    }
}

/// Parses a rendered Rust type such as `Option<Box<Scene_Action>>`.
pub(crate) fn parse_type(ty: &str) -> Result<syn::Type, GeneratorError> {
    syn::parse_str(ty)
        .map_err(|e| GeneratorError::CodeGenError(format!("Invalid type '{}': {}", ty, e)))
}

/// `rt::http::Method::<METHOD>` for a handler annotation.
pub(crate) fn http_method(method: HttpMethod) -> TokenStream {
    let name = ident(&method.to_string());
    quote! { rt::http::Method::#name }
}

/// Renders a bound as a literal of the field's numeric kind.
///
/// Integer bounds on float fields become float literals (`0` -> `0.0`).
pub(crate) fn bound_literal(bound: Bound, float: bool) -> Result<syn::Expr, GeneratorError> {
    let text = match (bound, float) {
        (Bound::Int(value), false) => value.to_string(),
        (Bound::Int(value), true) => format!("{:?}", value as f64),
        (Bound::UInt(value), false) => value.to_string(),
        (Bound::UInt(value), true) => format!("{:?}", value as f64),
        (Bound::Float(value), _) => format!("{:?}", value),
    };
    syn::parse_str(&text)
        .map_err(|e| GeneratorError::CodeGenError(format!("Invalid bound '{}': {}", text, e)))
}
