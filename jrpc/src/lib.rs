//! Runtime support for jrpc generated code.
//!
//! Code emitted by `jrpc-gen` links against this crate for everything that
//! is not specific to one schema:
//!
//! - **Errors**: [`Error`] and [`ErrorKind`], the wire-visible error vocabulary
//! - **Validation**: the [`Validate`] trait implemented by every generated message
//! - **Routing**: [`Router`], a route table built once at startup and shared
//!   read-only across requests, plus [`request`] decoding and [`response`] writing
//! - **Client calls**: [`rpc::Client`], one network round trip per call
//! - **Events**: the [`firehose`] publish/subscribe abstraction and an
//!   in-memory transport
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! // SceneRouter is emitted by jrpc-gen for `SceneService`.
//! let router = Arc::new(
//!     SceneRouter::new()
//!         .set_scene(|body| handler.set_scene(body))
//!         .into_router(),
//! );
//!
//! let response = router.dispatch(&request);
//! ```

pub mod error;
pub mod firehose;
pub mod request;
pub mod response;
pub mod router;
pub mod rpc;

pub use bytes;
pub use http;
pub use tracing;

pub use error::{Error, ErrorBody, ErrorKind};
pub use router::{Handler, Request, Response, Router};

/// Validation attached to every generated message.
///
/// Implementations check their own fields in declaration order and recurse
/// into nested and repeated message fields, returning the first failure.
pub trait Validate {
    /// Returns a [`ErrorKind::BadRequest`] error naming the first field that
    /// violates a declared constraint.
    fn validate(&self) -> Result<(), Error>;
}

impl<T: Validate> Validate for Box<T> {
    fn validate(&self) -> Result<(), Error> {
        (**self).validate()
    }
}
