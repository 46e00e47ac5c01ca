mod symmetric;

use crate::error::{HmacAuthError, HmacAuthResult};

pub use symmetric::Signature;
pub(crate) use symmetric::compute_signature;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// Hash functions usable with HMAC for request signatures
pub enum SigningHash {
  Sha256,
  Sha384,
  #[default]
  Sha512,
}

impl SigningHash {
  pub fn as_str(&self) -> &'static str {
    match self {
      SigningHash::Sha256 => "sha256",
      SigningHash::Sha384 => "sha384",
      SigningHash::Sha512 => "sha512",
    }
  }
}

impl std::fmt::Display for SigningHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl core::str::FromStr for SigningHash {
  type Err = HmacAuthError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "sha256" | "sha-256" => Ok(Self::Sha256),
      "sha384" | "sha-384" => Ok(Self::Sha384),
      "sha512" | "sha-512" => Ok(Self::Sha512),
      _ => Err(HmacAuthError::UnsupportedHashAlgorithm(s.to_string())),
    }
  }
}

/* -------------------------------- */
#[derive(Clone, PartialEq, Eq)]
/// Public identity and shared secret of a signer
pub struct KeyPair {
  public_id: String,
  private_key: String,
}

impl KeyPair {
  /// Create a new key pair. The private key must not be empty.
  pub fn new(public_id: impl Into<String>, private_key: impl Into<String>) -> HmacAuthResult<Self> {
    let private_key = private_key.into();
    if private_key.is_empty() {
      return Err(HmacAuthError::EmptyKey);
    }
    Ok(Self {
      public_id: public_id.into(),
      private_key,
    })
  }

  /// Public identity placed in the authorization header
  pub fn public_id(&self) -> &str {
    &self.public_id
  }

  /// Shared secret used as the HMAC key
  pub fn private_key(&self) -> &str {
    &self.private_key
  }
}

impl std::fmt::Debug for KeyPair {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("KeyPair")
      .field("public_id", &self.public_id)
      .field("private_key", &"[redacted]")
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::str::FromStr;

  #[test]
  fn signing_hash_from_str() {
    assert_eq!(SigningHash::from_str("sha256").unwrap(), SigningHash::Sha256);
    assert_eq!(SigningHash::from_str("SHA-384").unwrap(), SigningHash::Sha384);
    assert_eq!(SigningHash::from_str("sha512").unwrap(), SigningHash::Sha512);
    assert_eq!(SigningHash::default(), SigningHash::Sha512);

    let res = SigningHash::from_str("md5");
    assert!(matches!(res, Err(HmacAuthError::UnsupportedHashAlgorithm(name)) if name == "md5"));
  }

  #[test]
  fn key_pair_rejects_empty_key() {
    assert!(matches!(KeyPair::new("client", ""), Err(HmacAuthError::EmptyKey)));
  }

  #[test]
  fn key_pair_debug_is_redacted() {
    let key_pair = KeyPair::new("client", "secret123").unwrap();
    let debug = format!("{:?}", key_pair);
    assert!(debug.contains("client"));
    assert!(!debug.contains("secret123"));
  }
}
