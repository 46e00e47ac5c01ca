use thiserror::Error;

/// Result type for NCSA.HMAC signing and verification
pub type HmacAuthResult<T> = std::result::Result<T, HmacAuthError>;

/// Error type for NCSA.HMAC signing and verification
///
/// An unknown identity or a signature mismatch is not an error: verification reports both as `false`.
#[derive(Error, Debug)]
pub enum HmacAuthError {
  /// Request fields that cannot be placed in a canonical string
  #[error("Invalid request fields: {0}")]
  InvalidRequestFields(String),

  /// Hash algorithm name outside of the supported set
  #[error("Unsupported hash algorithm: {0}")]
  UnsupportedHashAlgorithm(String),

  /// Private key is empty
  #[error("Private key is empty")]
  EmptyKey,

  /// Authorization header does not follow `<scheme> <publicId>:<signature>`
  #[error("Malformed authorization header: {0}")]
  MalformedAuthHeader(String),

  /// The key resolver failed, as opposed to not knowing the identity
  #[error("Key resolver unavailable: {0}")]
  ResolverUnavailable(#[from] ResolverError),
}

/* ----------------------------------------------------------------- */
/// Error raised by a key resolver when its backing store cannot answer
#[derive(Error, Debug)]
#[error("{message}")]
pub struct ResolverError {
  message: String,
  #[source]
  source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl ResolverError {
  /// Create a new resolver error from a message
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
      source: None,
    }
  }

  /// Create a new resolver error wrapping the underlying cause
  pub fn with_source<E>(message: impl Into<String>, source: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self {
      message: message.into(),
      source: Some(Box::new(source)),
    }
  }
}
