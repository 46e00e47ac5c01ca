use crate::{
  crypto::Signature,
  error::{HmacAuthError, HmacAuthResult},
};

/// Scheme token of the authorization header
pub const NCSA_HMAC_SCHEME: &str = "NCSA.HMAC";

/* ---------------------------------------- */
#[derive(Debug, Clone, PartialEq, Eq)]
/// Parsed authorization header, `<scheme> <publicId>:<signature>`
pub struct AuthorizationHeader {
  scheme: String,
  public_id: String,
  signature: Signature,
}

impl AuthorizationHeader {
  /// Create a new authorization header value with the `NCSA.HMAC` scheme
  pub fn new(public_id: impl Into<String>, signature: Signature) -> Self {
    Self {
      scheme: NCSA_HMAC_SCHEME.to_string(),
      public_id: public_id.into(),
      signature,
    }
  }

  /// Parse a header value that must use the given scheme token
  pub fn parse_with_scheme(value: &str, scheme: &str) -> HmacAuthResult<Self> {
    let malformed = |reason: &str| HmacAuthError::MalformedAuthHeader(reason.to_string());

    let (found_scheme, credentials) = value.trim().split_once(' ').ok_or_else(|| malformed("missing scheme"))?;
    if found_scheme != scheme {
      return Err(malformed(&format!("unexpected scheme {:?}", found_scheme)));
    }
    let (public_id, signature) = credentials
      .trim_start()
      .split_once(':')
      .ok_or_else(|| malformed("missing `:` separator"))?;
    if public_id.is_empty() {
      return Err(malformed("empty public id"));
    }
    if signature.is_empty() {
      return Err(malformed("empty signature"));
    }

    Ok(Self {
      scheme: found_scheme.to_string(),
      public_id: public_id.to_string(),
      signature: Signature::new(signature),
    })
  }

  pub fn scheme(&self) -> &str {
    &self.scheme
  }

  pub fn public_id(&self) -> &str {
    &self.public_id
  }

  pub fn signature(&self) -> &Signature {
    &self.signature
  }
}

impl std::fmt::Display for AuthorizationHeader {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{} {}:{}", self.scheme, self.public_id, self.signature)
  }
}

impl std::str::FromStr for AuthorizationHeader {
  type Err = HmacAuthError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse_with_scheme(s, NCSA_HMAC_SCHEME)
  }
}
