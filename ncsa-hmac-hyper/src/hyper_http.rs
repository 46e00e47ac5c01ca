use crate::{
  error::{HyperHmacError, HyperHmacResult},
  hyper_content_digest::ContentDigest,
  CONTENT_DIGEST_HEADER,
};
use bytes::Bytes;
use http::{header, HeaderMap, HeaderValue, Request};
use http_body::Body;
use http_body_util::Full;
use ncsa_hmac::prelude::{
  authorization_header, http_date_now, Authentication, AsyncKeyResolver, AuthorizationHeader, HmacAuthError, KeyPair,
  SignableRequest, SigningHash, Verifier, NCSA_HMAC_SCHEME,
};
use std::future::Future;
use tracing::debug;

/* --------------------------------------- */
/// A trait to read NCSA.HMAC related headers of a request without touching its body
pub trait HmacAuthorization {
  type Error;

  /// Check if the request has an authorization header with the `NCSA.HMAC` scheme
  fn has_hmac_authorization(&self) -> bool;

  /// Extract the public id claimed in the authorization header, None if the header is absent
  fn hmac_public_id(&self) -> Result<Option<String>, Self::Error>;

  /// Build the signable request from the method, path and query, content-type and date headers, and the given body
  fn signable_request(&self, body: Option<Bytes>) -> Result<SignableRequest, Self::Error>;
}

/// A trait to sign and verify requests with NCSA.HMAC
pub trait HmacAuthorizationReq {
  type Error;

  /// Set content-digest (if the body is not empty), date (if missing) and authorization headers.
  /// The body is buffered and returned in the new request.
  fn set_hmac_authorization(
    self,
    key_pair: &KeyPair,
    hash: SigningHash,
  ) -> impl Future<Output = Result<Request<Full<Bytes>>, Self::Error>> + Send
  where
    Self: Sized;

  /// Verify the authorization header and return the outcome along with the buffered request
  fn authenticate_hmac<R>(
    self,
    verifier: &Verifier,
    resolver: &R,
  ) -> impl Future<Output = Result<(Authentication, Request<Full<Bytes>>), Self::Error>> + Send
  where
    Self: Sized,
    R: AsyncKeyResolver + Sync;

  /// Verify the authorization header. Unknown identities and signature mismatches are `Ok(false)`.
  fn verify_hmac_authorization<R>(
    self,
    verifier: &Verifier,
    resolver: &R,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send
  where
    Self: Sized,
    R: AsyncKeyResolver + Sync;
}

/* --------------------------------------- */
#[cfg(feature = "blocking")]
/// Synchronous counterpart of [`HmacAuthorizationReq`].
///
/// Every method delegates to the corresponding async method via `futures::executor::block_on`.
///
/// # Panics
///
/// All methods will panic if called from within an async runtime (e.g. a `tokio` task).
/// Use the async [`HmacAuthorizationReq`] methods instead when you are already in an async context.
pub trait HmacAuthorizationReqSync: HmacAuthorizationReq {
  fn set_hmac_authorization_sync(self, key_pair: &KeyPair, hash: SigningHash) -> Result<Request<Full<Bytes>>, Self::Error>
  where
    Self: Sized;

  fn authenticate_hmac_sync<R>(
    self,
    verifier: &Verifier,
    resolver: &R,
  ) -> Result<(Authentication, Request<Full<Bytes>>), Self::Error>
  where
    Self: Sized,
    R: AsyncKeyResolver + Sync;

  fn verify_hmac_authorization_sync<R>(self, verifier: &Verifier, resolver: &R) -> Result<bool, Self::Error>
  where
    Self: Sized,
    R: AsyncKeyResolver + Sync;
}

/* --------------------------------------- */
impl<B> HmacAuthorization for Request<B> {
  type Error = HyperHmacError;

  fn has_hmac_authorization(&self) -> bool {
    authorization_value(self.headers())
      .ok()
      .flatten()
      .is_some_and(|v| v.starts_with(&format!("{NCSA_HMAC_SCHEME} ")))
  }

  fn hmac_public_id(&self) -> HyperHmacResult<Option<String>> {
    let Some(value) = authorization_value(self.headers())? else {
      return Ok(None);
    };
    let header = value.parse::<AuthorizationHeader>()?;
    Ok(Some(header.public_id().to_string()))
  }

  fn signable_request(&self, body: Option<Bytes>) -> HyperHmacResult<SignableRequest> {
    let path = self.uri().path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let content_type = header_str(self.headers(), header::CONTENT_TYPE)?;
    let date = header_str(self.headers(), header::DATE)?;
    Ok(SignableRequest::new(self.method().as_str(), path, content_type, date, body))
  }
}

impl<B> HmacAuthorizationReq for Request<B>
where
  B: Body + Send,
  <B as Body>::Data: Send,
{
  type Error = HyperHmacError;

  async fn set_hmac_authorization(self, key_pair: &KeyPair, hash: SigningHash) -> HyperHmacResult<Request<Full<Bytes>>>
  where
    Self: Sized,
  {
    let (mut parts, body) = self.into_parts();
    let (body_bytes, digest) = body
      .into_bytes_with_digest()
      .await
      .map_err(|_e| HyperHmacError::HttpBodyError("Failed to read body".to_string()))?;

    if digest.is_empty() {
      parts.headers.remove(CONTENT_DIGEST_HEADER);
    } else {
      parts.headers.insert(CONTENT_DIGEST_HEADER, HeaderValue::from_str(&digest)?);
    }
    if !parts.headers.contains_key(header::DATE) {
      parts.headers.insert(header::DATE, HeaderValue::from_str(&http_date_now())?);
    }

    let mut req = Request::from_parts(parts, Full::new(body_bytes.clone()));
    let signable = req.signable_request(Some(body_bytes))?;
    let authorization = authorization_header(&signable, key_pair, hash)?;
    debug!(public_id = %key_pair.public_id(), %hash, "Set NCSA.HMAC authorization");
    req
      .headers_mut()
      .insert(header::AUTHORIZATION, HeaderValue::from_str(&authorization)?);
    Ok(req)
  }

  async fn authenticate_hmac<R>(
    self,
    verifier: &Verifier,
    resolver: &R,
  ) -> HyperHmacResult<(Authentication, Request<Full<Bytes>>)>
  where
    Self: Sized,
    R: AsyncKeyResolver + Sync,
  {
    let authorization = authorization_value(self.headers())?
      .ok_or_else(|| HmacAuthError::MalformedAuthHeader("missing authorization header".to_string()))?
      .to_string();

    let (parts, body) = self.into_parts();
    let body_bytes = body
      .into_bytes()
      .await
      .map_err(|_e| HyperHmacError::HttpBodyError("Failed to read body".to_string()))?;
    let req = Request::from_parts(parts, Full::new(body_bytes.clone()));

    let signable = req.signable_request(Some(body_bytes))?;
    let authentication = verifier.authenticate_async(&signable, &authorization, resolver).await?;
    Ok((authentication, req))
  }

  async fn verify_hmac_authorization<R>(self, verifier: &Verifier, resolver: &R) -> HyperHmacResult<bool>
  where
    Self: Sized,
    R: AsyncKeyResolver + Sync,
  {
    let (authentication, _) = self.authenticate_hmac(verifier, resolver).await?;
    Ok(authentication.is_authenticated())
  }
}

/* --------------------------------------- */
#[cfg(feature = "blocking")]
impl<B> HmacAuthorizationReqSync for Request<B>
where
  B: Body + Send,
  <B as Body>::Data: Send,
{
  fn set_hmac_authorization_sync(self, key_pair: &KeyPair, hash: SigningHash) -> Result<Request<Full<Bytes>>, Self::Error>
  where
    Self: Sized,
  {
    futures::executor::block_on(self.set_hmac_authorization(key_pair, hash))
  }

  fn authenticate_hmac_sync<R>(
    self,
    verifier: &Verifier,
    resolver: &R,
  ) -> Result<(Authentication, Request<Full<Bytes>>), Self::Error>
  where
    Self: Sized,
    R: AsyncKeyResolver + Sync,
  {
    futures::executor::block_on(self.authenticate_hmac(verifier, resolver))
  }

  fn verify_hmac_authorization_sync<R>(self, verifier: &Verifier, resolver: &R) -> Result<bool, Self::Error>
  where
    Self: Sized,
    R: AsyncKeyResolver + Sync,
  {
    futures::executor::block_on(self.verify_hmac_authorization(verifier, resolver))
  }
}

/* --------------------------------------- */
// inner functions
/// Authorization header value, None if absent
fn authorization_value(headers: &HeaderMap) -> HyperHmacResult<Option<&str>> {
  headers
    .get(header::AUTHORIZATION)
    .map(|v| v.to_str())
    .transpose()
    .map_err(HyperHmacError::from)
}

/// Header value as a string, empty if absent
fn header_str(headers: &HeaderMap, name: header::HeaderName) -> HyperHmacResult<&str> {
  Ok(headers.get(name).map(|v| v.to_str()).transpose()?.unwrap_or_default())
}

/* --------------------------------------- */
#[cfg(test)]
#[path = "hyper_http_tests.rs"]
mod tests;
