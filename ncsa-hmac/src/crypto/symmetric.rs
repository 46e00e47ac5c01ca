use super::SigningHash;
use crate::error::{HmacAuthError, HmacAuthResult};
use base64::{engine::general_purpose, Engine as _};
use hmac::{digest::KeyInit, Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};
use subtle::{Choice, ConstantTimeEq};

type HmacSha256 = Hmac<Sha256>;
type HmacSha384 = Hmac<Sha384>;
type HmacSha512 = Hmac<Sha512>;

/* -------------------------------- */
#[derive(Clone)]
/// Base64 encoded HMAC digest, always a single line. Equality is evaluated in constant time.
pub struct Signature(String);

impl Signature {
  /// Wrap a signature presented by a peer, e.g., taken from an authorization header
  pub fn new(value: impl Into<String>) -> Self {
    Self(value.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl ConstantTimeEq for Signature {
  /// Compare with another signature without leaking the position of the first differing byte
  fn ct_eq(&self, other: &Self) -> Choice {
    self.0.as_bytes().ct_eq(other.0.as_bytes())
  }
}

impl PartialEq for Signature {
  fn eq(&self, other: &Self) -> bool {
    self.ct_eq(other).into()
  }
}

impl Eq for Signature {}

impl std::fmt::Display for Signature {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl std::fmt::Debug for Signature {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_tuple("Signature").field(&self.0).finish()
  }
}

/* -------------------------------- */
/// Compute the signature of `data` keyed by `private_key`
pub(crate) fn compute_signature(private_key: &[u8], data: &[u8], hash: SigningHash) -> HmacAuthResult<Signature> {
  if private_key.is_empty() {
    return Err(HmacAuthError::EmptyKey);
  }
  let digest = match hash {
    SigningHash::Sha256 => mac_digest::<HmacSha256>(private_key, data)?,
    SigningHash::Sha384 => mac_digest::<HmacSha384>(private_key, data)?,
    SigningHash::Sha512 => mac_digest::<HmacSha512>(private_key, data)?,
  };
  // the signature must be a single line whatever the encoder does
  let encoded = general_purpose::STANDARD
    .encode(digest)
    .chars()
    .filter(|c| *c != '\n' && *c != '\r')
    .collect::<String>();
  Ok(Signature(encoded))
}

fn mac_digest<M>(key: &[u8], data: &[u8]) -> HmacAuthResult<Vec<u8>>
where
  M: Mac + KeyInit,
{
  let mut mac = <M as KeyInit>::new_from_slice(key).map_err(|_| HmacAuthError::EmptyKey)?;
  Mac::update(&mut mac, data);
  Ok(mac.finalize().into_bytes().to_vec())
}
