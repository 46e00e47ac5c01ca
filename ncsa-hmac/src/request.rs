use bytes::Bytes;
use chrono::{DateTime, NaiveDateTime, Utc};
use md5::{Digest, Md5};

/// Format of the `Date` header, RFC 7231 IMF-fixdate
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";
/// Obsolete HTTP-date formats a recipient must still accept: RFC 850 and asctime
const OBSOLETE_HTTP_DATE_FORMATS: [&str; 2] = ["%A, %d-%b-%y %H:%M:%S GMT", "%a %b %e %H:%M:%S %Y"];

/* ---------------------------------------- */
#[derive(Debug, Clone, PartialEq, Eq)]
/// Request attributes covered by an NCSA.HMAC signature
///
/// Fields are set once at construction. When a non-empty body is given, the content digest is the hex encoded MD5 of
/// that body. Otherwise the content digest is empty, which means "no digest" rather than the digest of an empty body.
pub struct SignableRequest {
  method: String,
  path: String,
  content_type: String,
  date: String,
  body: Option<Bytes>,
  content_digest: String,
}

impl SignableRequest {
  /// Create a new signable request. The `date` is taken verbatim and never reformatted.
  pub fn new(
    method: impl Into<String>,
    path: impl Into<String>,
    content_type: impl Into<String>,
    date: impl Into<String>,
    body: Option<Bytes>,
  ) -> Self {
    let body = body.filter(|b| !b.is_empty());
    let content_digest = body.as_ref().map(|b| content_digest(b)).unwrap_or_default();
    Self {
      method: method.into(),
      path: path.into(),
      content_type: content_type.into(),
      date: date.into(),
      body,
      content_digest,
    }
  }

  /// Create a new signable request carrying only a precomputed content digest, e.g., when the body was hashed while
  /// streaming. The digest is validated when the request is canonicalized.
  pub fn from_digest(
    method: impl Into<String>,
    path: impl Into<String>,
    content_type: impl Into<String>,
    date: impl Into<String>,
    content_digest: impl Into<String>,
  ) -> Self {
    Self {
      method: method.into(),
      path: path.into(),
      content_type: content_type.into(),
      date: date.into(),
      body: None,
      content_digest: content_digest.into(),
    }
  }

  pub fn method(&self) -> &str {
    &self.method
  }

  pub fn path(&self) -> &str {
    &self.path
  }

  pub fn content_type(&self) -> &str {
    &self.content_type
  }

  pub fn date(&self) -> &str {
    &self.date
  }

  pub fn body(&self) -> Option<&Bytes> {
    self.body.as_ref()
  }

  /// Hex encoded MD5 of the body, empty when there is no body
  pub fn content_digest(&self) -> &str {
    &self.content_digest
  }
}

/* ---------------------------------------- */
/// Returns the hex encoded MD5 digest of the body, or the empty string for an empty body
pub fn content_digest(body: &[u8]) -> String {
  if body.is_empty() {
    return String::new();
  }
  hex::encode(Md5::digest(body))
}

/// Format a timestamp as an HTTP-date, e.g., `Tue, 01 Jan 2024 00:00:00 GMT`
pub fn http_date(at: DateTime<Utc>) -> String {
  at.format(HTTP_DATE_FORMAT).to_string()
}

/// Current time as an HTTP-date
pub fn http_date_now() -> String {
  http_date(Utc::now())
}

/// Parse an HTTP-date in any of its three forms, returning None if it is not one.
/// All of them are UTC, so numeric offsets are not accepted.
pub(crate) fn parse_http_date(date: &str) -> Option<DateTime<Utc>> {
  std::iter::once(HTTP_DATE_FORMAT)
    .chain(OBSOLETE_HTTP_DATE_FORMATS)
    .find_map(|format| NaiveDateTime::parse_from_str(date, format).ok())
    .map(|d| d.and_utc())
}
