//! Client call stub generation.
//!
//! A method whose input message is emitted by the unit gets an async method
//! on that message. Inputs imported from another unit are foreign types, so
//! those methods get a free function taking the input instead.

use proc_macro2::TokenStream;
use quote::quote;

use super::{http_method, ident, parse_type};
use crate::errors::GeneratorError;
use crate::plan::{MethodPlan, RouterPlan};

/// Generates the client stub for one method.
///
/// ## Examples
///
/// ```ignore
/// impl SetSceneRequest {
///     pub async fn set_scene(&self, client: &rt::rpc::Client) -> Result<SetSceneResponse, rt::Error> {
///         client
///             .call(rt::rpc::Request {
///                 method: rt::http::Method::POST,
///                 url: "service.scene/scene/set",
///                 body: self,
///             })
///             .await
///     }
/// }
/// ```
pub fn generate_client(router: &RouterPlan, method: &MethodPlan) -> Result<TokenStream, GeneratorError> {
    let name = ident(&method.ident);
    let input = parse_type(&method.input.rust_name)?;
    let output = parse_type(&method.output.rust_name)?;
    let verb = http_method(method.http_method);
    let url = &method.url;
    let doc = format!(
        " Calls `{}.{}` (`{} {}`).",
        router.service, method.name, method.http_method, url
    );

    if method.input.local {
        Ok(quote! {
            impl #input {
                #[doc = #doc]
                pub async fn #name(&self, client: &rt::rpc::Client) -> Result<#output, rt::Error> {
                    client
                        .call(rt::rpc::Request {
                            method: #verb,
                            url: #url,
                            body: self,
                        })
                        .await
                }
            }
        })
    } else {
        Ok(quote! {
            #[doc = #doc]
            pub async fn #name(client: &rt::rpc::Client, input: &#input) -> Result<#output, rt::Error> {
                client
                    .call(rt::rpc::Request {
                        method: #verb,
                        url: #url,
                        body: input,
                    })
                    .await
            }
        })
    }
}
