//! Router generation for services.
//!
//! Each service becomes a `<Name>Router` holding one optional handler slot
//! per method. `into_router` registers every route on an `rt::Router`; the
//! per-route closure decodes, validates and dispatches the request.

use proc_macro2::TokenStream;
use quote::quote;

use super::{http_method, ident, parse_type};
use crate::errors::GeneratorError;
use crate::plan::{MethodPlan, RouterPlan};

/// Generates the router type for a service.
///
/// ## Examples
///
/// For `SceneService` with `SetScene` bound to `POST /scene/set`:
///
/// ```ignore
/// #[derive(Default)]
/// pub struct SceneRouter {
///     set_scene: Option<rt::Handler<SetSceneRequest, SetSceneResponse>>,
/// }
///
/// impl SceneRouter {
///     pub const NAME: &'static str = "service.scene";
///     pub fn new() -> Self;
///     pub fn set_scene<F>(self, handler: F) -> Self;
///     pub fn into_router(self) -> rt::Router;
/// }
/// ```
pub fn generate_router(router: &RouterPlan) -> Result<TokenStream, GeneratorError> {
    let name = ident(&router.ident);
    let base = &router.base;
    let doc = format!(" Router for `{}`, served under `{}`.", router.service, base);

    let mut slots = Vec::with_capacity(router.methods.len());
    let mut setters = Vec::with_capacity(router.methods.len());
    let mut routes = Vec::with_capacity(router.methods.len());
    for method in &router.methods {
        let slot = ident(&method.ident);
        let input = parse_type(&method.input.rust_name)?;
        let output = parse_type(&method.output.rust_name)?;
        let route = format!("{} {}", method.http_method, method.url);

        slots.push(quote! {
            #slot: Option<rt::Handler<#input, #output>>
        });

        let setter_doc = format!(" Sets the handler for `{}`.", route);
        setters.push(quote! {
            #[doc = #setter_doc]
            pub fn #slot<F>(mut self, handler: F) -> Self
            where
                F: Fn(#input) -> Result<#output, rt::Error> + Send + Sync + 'static,
            {
                self.#slot = Some(Box::new(handler));
                self
            }
        });

        routes.push(generate_route(method)?);
    }

    let slot_names: Vec<_> = router.methods.iter().map(|m| ident(&m.ident)).collect();
    let into_router = if router.methods.is_empty() {
        quote! {
            /// Builds the route table. The service declares no methods.
            pub fn into_router(self) -> rt::Router {
                rt::Router::new()
            }
        }
    } else {
        quote! {
            /// Builds the route table.
            ///
            /// Routes whose handler was never set panic when they are called.
            pub fn into_router(self) -> rt::Router {
                let Self { #(#slot_names),* } = self;
                let mut router = rt::Router::new();
                #(#routes)*
                router
            }
        }
    };

    Ok(quote! {
        #[doc = #doc]
        #[derive(Default)]
        pub struct #name {
            #(#slots,)*
        }

        impl #name {
            /// Router name every route path is appended to.
            pub const NAME: &'static str = #base;

            /// Creates a router with no handlers set.
            pub fn new() -> Self {
                Self::default()
            }

            #(#setters)*

            #into_router
        }
    })
}

fn generate_route(method: &MethodPlan) -> Result<TokenStream, GeneratorError> {
    let slot = ident(&method.ident);
    let input = parse_type(&method.input.rust_name)?;
    let verb = http_method(method.http_method);
    let path = &method.path;
    let route = format!("{} {}", method.http_method, method.url);
    let missing = format!("no handler exists for {}", route);

    Ok(quote! {
        router.handle(#verb, #path, move |request: &rt::Request| {
            let Some(handler) = #slot.as_ref() else {
                panic!("{}", #missing);
            };

            let input: #input = match rt::request::decode(request) {
                Ok(input) => input,
                Err(err) => {
                    let err = rt::Error::wrap(err, rt::ErrorKind::BadRequest, "failed to decode request");
                    rt::tracing::error!(route = #route, error = %err, "Request rejected");
                    return rt::response::write_error(&err);
                }
            };

            if let Err(err) = rt::Validate::validate(&input) {
                let err = rt::Error::wrap(err, rt::ErrorKind::BadRequest, "failed to validate request");
                rt::tracing::error!(route = #route, error = %err, "Request rejected");
                return rt::response::write_error(&err);
            }

            match handler(input) {
                Ok(output) => rt::response::write_json(&output),
                Err(err) => {
                    let err = err.with_message("failed to handle request");
                    rt::tracing::error!(route = #route, error = %err, "Request failed");
                    rt::response::write_error(&err)
                }
            }
        });
    })
}
