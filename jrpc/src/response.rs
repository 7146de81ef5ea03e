//! Outbound response writing.

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderValue};
use http::StatusCode;
use serde::Serialize;

use crate::error::Error;
use crate::router::Response;

const APPLICATION_JSON: &str = "application/json";

/// Writes `value` as a `200 OK` JSON response.
///
/// A value that fails to serialize produces an `internal` error response
/// instead.
pub fn write_json<T: Serialize + ?Sized>(value: &T) -> Response {
    match serde_json::to_vec(value) {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(e) => {
            let err = Error::wrap(e, crate::ErrorKind::Internal, "failed to encode response");
            tracing::error!(error = %err, "Response serialization failed");
            write_error(&err)
        }
    }
}

/// Writes `err` as a JSON error response with the status of its kind.
pub fn write_error(err: &Error) -> Response {
    // ErrorBody holds only a unit enum and a string.
    let body = serde_json::to_vec(&err.to_body()).unwrap_or_default();
    json_response(err.status(), body)
}

fn json_response(status: StatusCode, body: Vec<u8>) -> Response {
    let mut response = Response::new(Bytes::from(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
    response
}
