//! Runtime error vocabulary.
//!
//! Every failure that crosses a route, client or event boundary is an
//! [`Error`] with a machine-readable [`ErrorKind`] and a human message. The
//! kind decides the HTTP status a route responds with; the message carries
//! field-level context such as `field 'scene_id' is required`.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Machine-readable classification of an [`Error`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// The caller sent something malformed or invalid.
    BadRequest,
    /// The caller is not authenticated.
    Unauthorized,
    /// The caller may not perform the operation.
    Forbidden,
    /// The addressed resource does not exist.
    NotFound,
    /// The server failed for reasons unrelated to the input.
    Internal,
    /// A downstream dependency could not be reached.
    Unavailable,
}

impl ErrorKind {
    /// HTTP status a route responds with for this kind.
    pub fn status(self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Best-effort classification of a status received without an error body.
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::BAD_REQUEST => Self::BadRequest,
            StatusCode::UNAUTHORIZED => Self::Unauthorized,
            StatusCode::FORBIDDEN => Self::Forbidden,
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::SERVICE_UNAVAILABLE | StatusCode::BAD_GATEWAY => Self::Unavailable,
            s if s.is_client_error() => Self::BadRequest,
            _ => Self::Internal,
        }
    }
}

/// A runtime error with a kind, a message and an optional cause.
///
/// ## Examples
///
/// ```
/// use jrpc::{Error, ErrorKind};
///
/// let err = Error::bad_request("field 'scene_id' is required");
/// let err = Error::wrap(err, ErrorKind::BadRequest, "failed to validate request");
///
/// assert_eq!(err.kind(), ErrorKind::BadRequest);
/// assert_eq!(
///     err.to_string(),
///     "failed to validate request: field 'scene_id' is required"
/// );
/// ```
#[derive(Debug, Error)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl Error {
    /// Creates an error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unavailable, message)
    }

    /// Wraps `source` in a new error of `kind`.
    ///
    /// The message becomes `"{message}: {source}"` so the cause stays visible
    /// to callers that only see the serialized form.
    pub fn wrap<E>(source: E, kind: ErrorKind, message: impl Into<String>) -> Self
    where
        E: Into<BoxError>,
    {
        let source = source.into();
        Self {
            kind,
            message: format!("{}: {}", message.into(), source),
            source: Some(source),
        }
    }

    /// Prefixes the message with extra context, keeping the kind.
    pub fn with_message(self, message: impl Into<String>) -> Self {
        let kind = self.kind;
        Self::wrap(self, kind, message)
    }

    /// The machine-readable kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The human-readable message, including wrapped context.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns `true` if this is a [`ErrorKind::BadRequest`] error.
    pub fn is_bad_request(&self) -> bool {
        self.kind == ErrorKind::BadRequest
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }

    /// The serializable wire form.
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            kind: self.kind,
            message: self.message.clone(),
        }
    }

    /// Rebuilds an error from a failed response.
    ///
    /// Uses the structured body when it parses, otherwise classifies by
    /// status and keeps the raw body text as the message.
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        match serde_json::from_slice::<ErrorBody>(body) {
            Ok(body) => body.into(),
            Err(_) => Self::new(
                ErrorKind::from_status(status),
                format!("{}: {}", status, String::from_utf8_lossy(body)),
            ),
        }
    }
}

/// Wire form of an [`Error`]: `{"kind": "bad_request", "message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<ErrorBody> for Error {
    fn from(body: ErrorBody) -> Self {
        Self::new(body.kind, body.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn kind_maps_to_status() {
        assert_eq!(ErrorKind::BadRequest.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorKind::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorKind::Internal.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn kind_from_status_falls_back() {
        assert_eq!(
            ErrorKind::from_status(StatusCode::UNPROCESSABLE_ENTITY),
            ErrorKind::BadRequest
        );
        assert_eq!(
            ErrorKind::from_status(StatusCode::BAD_GATEWAY),
            ErrorKind::Unavailable
        );
        assert_eq!(
            ErrorKind::from_status(StatusCode::IM_A_TEAPOT),
            ErrorKind::BadRequest
        );
        assert_eq!(
            ErrorKind::from_status(StatusCode::NOT_IMPLEMENTED),
            ErrorKind::Internal
        );
    }

    #[test]
    fn kind_display_snake_case() {
        assert_eq!(ErrorKind::BadRequest.to_string(), "bad_request");
        assert_eq!(ErrorKind::Unavailable.to_string(), "unavailable");
    }

    #[test]
    fn wrap_keeps_source_and_prefixes_message() {
        let inner = Error::not_found("scene not found");
        let err = Error::wrap(inner, ErrorKind::Internal, "failed to load scene");

        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.message(), "failed to load scene: scene not found");
        assert!(err.source().is_some());
    }

    #[test]
    fn with_message_keeps_kind() {
        let err = Error::not_found("scene not found").with_message("failed to handle request");

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "failed to handle request: scene not found");
    }

    #[test]
    fn body_serializes_kind_and_message() {
        let body = Error::bad_request("field 'scene_id' is required").to_body();
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "kind": "bad_request",
                "message": "field 'scene_id' is required"
            })
        );
    }

    #[test]
    fn from_response_parses_structured_body() {
        let body = br#"{"kind": "forbidden", "message": "no access"}"#;
        let err = Error::from_response(StatusCode::FORBIDDEN, body);

        assert_eq!(err.kind(), ErrorKind::Forbidden);
        assert_eq!(err.message(), "no access");
    }

    #[test]
    fn from_response_falls_back_to_status() {
        let err = Error::from_response(StatusCode::BAD_GATEWAY, b"upstream down");

        assert_eq!(err.kind(), ErrorKind::Unavailable);
        assert!(err.message().contains("upstream down"));
    }
}
