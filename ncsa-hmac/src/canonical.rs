use crate::{
  error::{HmacAuthError, HmacAuthResult},
  request::SignableRequest,
};

/* ---------------------------------------- */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Version of the canonical string layout
pub enum CanonicalizationVersion {
  /// `method`, `content-type`, `content-digest`, `date`, `path`, joined by `\n`
  #[default]
  V1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Whether the content digest takes part in the canonical string
pub enum ContentDigestPolicy {
  /// The digest line holds the body digest, or stays empty when there is no body
  #[default]
  IncludedIfBodyPresent,
  /// The digest line is always empty
  Excluded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Configuration of the canonicalizer
pub struct CanonicalizerConfig {
  pub version: CanonicalizationVersion,
  pub content_digest: ContentDigestPolicy,
}

/* ---------------------------------------- */
#[derive(Debug, Clone, PartialEq, Eq)]
/// String to sign, built from a signable request
pub struct CanonicalString(String);

impl CanonicalString {
  /// Returns the canonical string as bytes to be signed
  pub fn as_bytes(&self) -> &[u8] {
    self.0.as_bytes()
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl std::fmt::Display for CanonicalString {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

/* ---------------------------------------- */
#[derive(Debug, Clone, Default)]
/// Builds canonical strings with a fixed configuration
pub struct Canonicalizer {
  config: CanonicalizerConfig,
}

impl Canonicalizer {
  pub fn new(config: CanonicalizerConfig) -> Self {
    Self { config }
  }

  /// Build the canonical string of the request
  pub fn canonicalize(&self, request: &SignableRequest) -> HmacAuthResult<CanonicalString> {
    let method = request.method();
    if method.is_empty() || !method.bytes().all(is_tchar) {
      return Err(HmacAuthError::InvalidRequestFields(format!("Invalid method: {:?}", method)));
    }
    let path = request.path();
    if !path.starts_with('/') {
      return Err(HmacAuthError::InvalidRequestFields(format!("Path must be absolute: {:?}", path)));
    }
    let content_digest = match self.config.content_digest {
      ContentDigestPolicy::IncludedIfBodyPresent => request.content_digest(),
      ContentDigestPolicy::Excluded => "",
    };
    if !content_digest.is_empty() && !is_md5_hex(content_digest) {
      return Err(HmacAuthError::InvalidRequestFields(format!(
        "Content digest must be a hex encoded MD5: {:?}",
        content_digest
      )));
    }
    for (name, value) in [
      ("path", path),
      ("content type", request.content_type()),
      ("date", request.date()),
    ] {
      if value.contains(['\r', '\n']) {
        return Err(HmacAuthError::InvalidRequestFields(format!("Line break in {name}")));
      }
    }

    let canonical = match self.config.version {
      CanonicalizationVersion::V1 => [
        method.to_ascii_uppercase().as_str(),
        request.content_type(),
        content_digest,
        request.date(),
        path,
      ]
      .join("\n"),
    };
    Ok(CanonicalString(canonical))
  }
}

/// Build the canonical string of the request with the default configuration
pub fn canonicalize(request: &SignableRequest) -> HmacAuthResult<CanonicalString> {
  Canonicalizer::default().canonicalize(request)
}

/// RFC 9110 token characters
fn is_tchar(c: u8) -> bool {
  c.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&c)
}

fn is_md5_hex(value: &str) -> bool {
  value.len() == 32 && value.bytes().all(|c| matches!(c, b'0'..=b'9' | b'a'..=b'f'))
}

#[cfg(test)]
mod tests {
  use super::*;
  use bytes::Bytes;

  const DATE: &str = "Tue, 01 Jan 2024 00:00:00 GMT";

  fn build_request(method: &str, path: &str, body: Option<&'static [u8]>) -> SignableRequest {
    SignableRequest::new(method, path, "application/json", DATE, body.map(Bytes::from_static))
  }

  #[test]
  fn canonical_string_with_body() {
    let req = build_request("post", "/widgets?id=1", Some(b"foo"));
    let canonical = canonicalize(&req).unwrap();
    assert_eq!(
      canonical.to_string(),
      "POST\napplication/json\nacbd18db4cc2f85cedef654fccc4a4d8\nTue, 01 Jan 2024 00:00:00 GMT\n/widgets?id=1"
    );
    assert_eq!(canonical.as_bytes(), canonical.as_str().as_bytes());
  }

  #[test]
  fn canonical_string_without_body_has_empty_digest_line() {
    let req = build_request("GET", "/widgets", None);
    let canonical = canonicalize(&req).unwrap();
    assert_eq!(canonical.as_str(), "GET\napplication/json\n\nTue, 01 Jan 2024 00:00:00 GMT\n/widgets");
  }

  #[test]
  fn digest_excluded_by_policy() {
    let canonicalizer = Canonicalizer::new(CanonicalizerConfig {
      content_digest: ContentDigestPolicy::Excluded,
      ..Default::default()
    });
    let with_body = canonicalizer.canonicalize(&build_request("POST", "/widgets", Some(b"foo"))).unwrap();
    let without_body = canonicalizer.canonicalize(&build_request("POST", "/widgets", None)).unwrap();
    assert_eq!(with_body, without_body);
  }

  #[test]
  fn precomputed_digest() {
    let req = SignableRequest::from_digest("PUT", "/", "text/plain", DATE, "acbd18db4cc2f85cedef654fccc4a4d8");
    let from_body = SignableRequest::new("PUT", "/", "text/plain", DATE, Some(Bytes::from_static(b"foo")));
    assert_eq!(canonicalize(&req).unwrap(), canonicalize(&from_body).unwrap());

    let req = SignableRequest::from_digest("PUT", "/", "text/plain", DATE, "not-a-digest");
    assert!(matches!(canonicalize(&req), Err(HmacAuthError::InvalidRequestFields(_))));
  }

  #[test]
  fn invalid_fields_are_rejected() {
    let invalid = [
      build_request("", "/widgets", None),
      build_request("GE T", "/widgets", None),
      build_request("GET", "", None),
      build_request("GET", "widgets", None),
      build_request("GET", "/widgets\nGET", None),
      SignableRequest::new("GET", "/", "text/plain\r\nx-injected: 1", DATE, None),
      SignableRequest::new("GET", "/", "", "Tue, 01 Jan 2024\n00:00:00 GMT", None),
    ];
    for req in invalid {
      assert!(
        matches!(canonicalize(&req), Err(HmacAuthError::InvalidRequestFields(_))),
        "{:?}",
        req
      );
    }
  }
}
