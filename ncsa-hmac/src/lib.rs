//! # ncsa-hmac
//!
//! `ncsa-hmac` signs and verifies HTTP-style requests with the `NCSA.HMAC` scheme.
//! The string to sign is built from the method, content type, content digest (hex MD5 of the body), date and path,
//! and is keyed with HMAC-SHA-256/384/512. Verification compares signatures in constant time and resolves the claimed
//! identity to its key through a caller-supplied [`KeyResolver`](prelude::KeyResolver).
//!
//! The crate does not depend on any HTTP framework. Callers build a [`SignableRequest`](prelude::SignableRequest)
//! from already-parsed fields.

mod authorization;
mod canonical;
mod crypto;
mod error;
mod request;
mod resolver;
mod signer;
mod trace;
mod verifier;

pub mod prelude {
  pub use crate::{
    authorization::{AuthorizationHeader, NCSA_HMAC_SCHEME},
    canonical::{canonicalize, CanonicalString, CanonicalizationVersion, Canonicalizer, CanonicalizerConfig, ContentDigestPolicy},
    crypto::{KeyPair, Signature, SigningHash},
    error::{HmacAuthError, HmacAuthResult, ResolverError},
    request::{content_digest, http_date, http_date_now, SignableRequest},
    resolver::{AsyncKeyResolver, KeyResolver, StaticKeyResolver},
    signer::{authorization_header, sign, Signer},
    verifier::{verify, Authentication, Rejection, Verifier, VerifierConfig},
  };
}

/* ----------------------------------------------------------------- */
