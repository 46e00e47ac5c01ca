use ncsa_hmac::prelude::HmacAuthError;
use thiserror::Error;

/// Result type for NCSA.HMAC over hyper's http types
pub type HyperHmacResult<T> = std::result::Result<T, HyperHmacError>;

/// Error type for NCSA.HMAC over hyper's http types
#[derive(Error, Debug)]
pub enum HyperHmacError {
  /// Failed to read header value as a string
  #[error("Failed to stringify header: {0}")]
  FailedToStrHeader(#[from] http::header::ToStrError),

  /// Failed to build header value
  #[error("Failed to parse header value: {0}")]
  InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

  /// Http body error
  #[error("Http body error: {0}")]
  HttpBodyError(String),

  /// Inherited from HmacAuthError
  #[error("HmacAuthError: {0}")]
  HmacAuthError(#[from] HmacAuthError),
}

/// Result type for content-digest handling
pub type HyperDigestResult<T> = std::result::Result<T, HyperDigestError>;

/// Error type for content-digest handling
#[derive(Error, Debug)]
pub enum HyperDigestError {
  /// Http body error
  #[error("Http body error: {0}")]
  HttpBodyError(String),

  /// No content-digest header found
  #[error("No content-digest header found: {0}")]
  NoDigestHeader(String),

  /// Failed to build header value
  #[error("Failed to parse header value: {0}")]
  InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

  /// Failed to read content-digest header
  #[error("Failed to stringify content-digest header: {0}")]
  FailedToStrDigestHeader(#[from] http::header::ToStrError),
}
