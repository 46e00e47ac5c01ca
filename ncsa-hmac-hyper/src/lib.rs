//! # ncsa-hmac-hyper
//!
//! `ncsa-hmac-hyper` is a crate that provides a convenient API for `Hyper` users to handle NCSA.HMAC authorization.
//! This crate extends hyper's http request with the ability to set and verify the `Authorization` header
//! (`NCSA.HMAC <publicId>:<signature>`), filling `Content-Digest` and `Date` as needed.
//! Additionally it also provides a way to set and verify the content-digest header alone.
//!
//! ## Async-first design
//!
//! The primary API is async, since the body has to be buffered and keys may be resolved over I/O,
//! via [`HmacAuthorizationReq`].
//!
//! ## Blocking API
//!
//! When the `blocking` feature is enabled (on by default), synchronous wrappers are provided via
//! [`HmacAuthorizationReqSync`]. These use `futures::executor::block_on`
//! internally and are intended **exclusively for non-async contexts**.
//!
//! # Panics
//!
//! Calling any `*_sync` method from within an async runtime (e.g. inside a `tokio::spawn` task)
//! will panic. If you are already in an async context, use the async methods directly.

mod error;
mod hyper_content_digest;
mod hyper_http;

/// content-digest header name
const CONTENT_DIGEST_HEADER: &str = "content-digest";

pub use error::{HyperDigestError, HyperDigestResult, HyperHmacError, HyperHmacResult};
pub use hyper_content_digest::{ContentDigest, RequestContentDigest};
#[cfg(feature = "blocking")]
pub use hyper_http::HmacAuthorizationReqSync;
pub use hyper_http::{HmacAuthorization, HmacAuthorizationReq};
pub use ncsa_hmac::prelude;

/* ----------------------------------------------------------------- */
