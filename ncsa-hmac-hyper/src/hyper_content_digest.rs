use super::CONTENT_DIGEST_HEADER;
use crate::error::{HyperDigestError, HyperDigestResult};
use bytes::{Buf, Bytes};
use http::{HeaderValue, Request};
use http_body::Body;
use http_body_util::{BodyExt, Full};
use ncsa_hmac::prelude::content_digest;
use std::future::Future;

// hyper's http specific extension to set and verify the content-digest header

/* --------------------------------------- */
pub trait ContentDigest: http_body::Body {
  /// Returns the bytes object of the body
  fn into_bytes(self) -> impl Future<Output = Result<Bytes, Self::Error>> + Send
  where
    Self: Sized + Send,
    Self::Data: Send,
  {
    async {
      let mut body_buf = self.collect().await?.aggregate();
      Ok(body_buf.copy_to_bytes(body_buf.remaining()))
    }
  }

  /// Returns the body bytes and their hex encoded MD5, which is empty for an empty body
  fn into_bytes_with_digest(self) -> impl Future<Output = Result<(Bytes, String), Self::Error>> + Send
  where
    Self: Sized + Send,
    Self::Data: Send,
  {
    async move {
      let body_bytes = self.into_bytes().await?;
      let digest = content_digest(&body_bytes);
      Ok((body_bytes, digest))
    }
  }
}

impl<T: ?Sized> ContentDigest for T where T: http_body::Body {}

/* --------------------------------------- */
/// A trait to set and verify the hex MD5 content-digest header of a request
pub trait RequestContentDigest {
  type Error;
  fn set_content_digest(self) -> impl Future<Output = Result<Request<Full<Bytes>>, Self::Error>> + Send
  where
    Self: Sized;
  fn verify_content_digest(self) -> impl Future<Output = Result<bool, Self::Error>> + Send
  where
    Self: Sized;
}

impl<B> RequestContentDigest for Request<B>
where
  B: Body + Send,
  <B as Body>::Data: Send,
{
  type Error = HyperDigestError;

  /// Set the content-digest header, or remove it when the body is empty
  async fn set_content_digest(self) -> HyperDigestResult<Request<Full<Bytes>>>
  where
    Self: Sized,
  {
    let (mut parts, body) = self.into_parts();
    let (body_bytes, digest) = body
      .into_bytes_with_digest()
      .await
      .map_err(|_e| HyperDigestError::HttpBodyError("Failed to generate digest".to_string()))?;

    if digest.is_empty() {
      parts.headers.remove(CONTENT_DIGEST_HEADER);
    } else {
      parts.headers.insert(CONTENT_DIGEST_HEADER, HeaderValue::from_str(&digest)?);
    }

    Ok(Request::from_parts(parts, Full::new(body_bytes)))
  }

  /// Check that the content-digest header matches the body
  async fn verify_content_digest(self) -> HyperDigestResult<bool>
  where
    Self: Sized,
  {
    let expected = self
      .headers()
      .get(CONTENT_DIGEST_HEADER)
      .ok_or_else(|| HyperDigestError::NoDigestHeader("Content-Digest header not found".to_string()))?
      .to_str()?
      .to_string();
    let (_, body) = self.into_parts();
    let (_, digest) = body
      .into_bytes_with_digest()
      .await
      .map_err(|_e| HyperDigestError::HttpBodyError("Failed to verify digest".to_string()))?;
    Ok(digest == expected.trim())
  }
}

/* --------------------------------------- */
