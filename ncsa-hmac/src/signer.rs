use crate::{
  authorization::AuthorizationHeader,
  canonical::Canonicalizer,
  crypto::{compute_signature, KeyPair, Signature, SigningHash},
  error::HmacAuthResult,
  request::SignableRequest,
  trace::*,
};

#[derive(Debug, Clone, Default)]
/// Signs requests with a fixed canonicalizer configuration
pub struct Signer {
  canonicalizer: Canonicalizer,
}

impl Signer {
  pub fn new(canonicalizer: Canonicalizer) -> Self {
    Self { canonicalizer }
  }

  /// Compute the signature of the request
  pub fn sign(&self, request: &SignableRequest, key_pair: &KeyPair, hash: SigningHash) -> HmacAuthResult<Signature> {
    let canonical = self.canonicalizer.canonicalize(request)?;
    debug!(public_id = %key_pair.public_id(), %hash, canonical = ?canonical.as_str(), "Signing request");
    compute_signature(key_pair.private_key().as_bytes(), canonical.as_bytes(), hash)
  }

  /// Compute the value of the authorization header, `NCSA.HMAC <publicId>:<signature>`
  pub fn authorization_header(
    &self,
    request: &SignableRequest,
    key_pair: &KeyPair,
    hash: SigningHash,
  ) -> HmacAuthResult<String> {
    let signature = self.sign(request, key_pair, hash)?;
    Ok(AuthorizationHeader::new(key_pair.public_id(), signature).to_string())
  }
}

/// Compute the signature of the request with the default canonicalizer
pub fn sign(request: &SignableRequest, key_pair: &KeyPair, hash: SigningHash) -> HmacAuthResult<Signature> {
  Signer::default().sign(request, key_pair, hash)
}

/// Compute the value of the authorization header with the default canonicalizer
pub fn authorization_header(request: &SignableRequest, key_pair: &KeyPair, hash: SigningHash) -> HmacAuthResult<String> {
  Signer::default().authorization_header(request, key_pair, hash)
}
