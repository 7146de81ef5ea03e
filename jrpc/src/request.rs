//! Inbound request decoding.

use serde::de::DeserializeOwned;

use crate::error::{Error, ErrorKind};
use crate::router::Request;

/// Decodes the JSON body of `request` into `T`.
///
/// An empty body decodes as `{}`, so requests whose input message has no
/// required fields may omit the body entirely. Fields absent from the body
/// stay unset; presence rules are enforced later by validation, not here.
///
/// ## Errors
///
/// Returns a [`ErrorKind::BadRequest`] error when the body is not valid JSON
/// for `T`.
pub fn decode<T: DeserializeOwned>(request: &Request) -> Result<T, Error> {
    let body = request.body();
    let bytes: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        body
    };

    serde_json::from_slice(bytes)
        .map_err(|e| Error::wrap(e, ErrorKind::BadRequest, "invalid JSON body"))
}
