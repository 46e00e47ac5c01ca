use crate::{
  authorization::{AuthorizationHeader, NCSA_HMAC_SCHEME},
  canonical::{CanonicalString, Canonicalizer, CanonicalizerConfig},
  crypto::{compute_signature, SigningHash},
  error::{HmacAuthError, HmacAuthResult},
  request::{parse_http_date, SignableRequest},
  resolver::{AsyncKeyResolver, KeyResolver},
  trace::*,
};
use chrono::{DateTime, Utc};
use std::time::Duration;
use subtle::{Choice, ConstantTimeEq};

/* ---------------------------------------- */
#[derive(Debug, Clone)]
/// Configuration of the verifier
pub struct VerifierConfig {
  /// Scheme token expected in the authorization header
  pub scheme: String,
  /// Hash functions a presented signature may have been computed with
  pub accepted_hashes: Vec<SigningHash>,
  /// Maximum distance between the request date and now. Dates are not checked when None.
  pub ttl: Option<Duration>,
  pub canonicalizer: CanonicalizerConfig,
}

impl Default for VerifierConfig {
  fn default() -> Self {
    Self {
      scheme: NCSA_HMAC_SCHEME.to_string(),
      accepted_hashes: vec![SigningHash::default()],
      ttl: None,
      canonicalizer: CanonicalizerConfig::default(),
    }
  }
}

impl VerifierConfig {
  /// Set the accepted hash functions, dropping duplicates
  pub fn set_accepted_hashes(&mut self, hashes: &[SigningHash]) {
    self.accepted_hashes = hashes.iter().fold(Vec::new(), |mut acc, h| {
      if !acc.contains(h) {
        acc.push(*h);
      }
      acc
    });
  }

  /// Set the maximum age of the request date
  pub fn set_ttl(&mut self, ttl: Duration) {
    self.ttl = Some(ttl);
  }
}

/* ---------------------------------------- */
#[derive(Debug, Clone, PartialEq, Eq)]
/// Why an authentic request could not be established
pub enum Rejection {
  /// The resolver does not know the claimed identity
  UnknownIdentity(String),
  /// No accepted hash reproduces the presented signature
  SignatureMismatch,
  /// A ttl is configured but the request has no date
  MissingDate,
  /// A ttl is configured but the date is not an HTTP-date
  InvalidDate,
  /// The date is farther from now than the ttl
  Expired,
}

impl std::fmt::Display for Rejection {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Rejection::UnknownIdentity(public_id) => write!(f, "unknown identity {public_id:?}"),
      Rejection::SignatureMismatch => write!(f, "signature mismatch"),
      Rejection::MissingDate => write!(f, "missing date"),
      Rejection::InvalidDate => write!(f, "invalid date"),
      Rejection::Expired => write!(f, "expired"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Outcome of a verification
pub enum Authentication {
  Authenticated { public_id: String, hash: SigningHash },
  Rejected(Rejection),
}

impl Authentication {
  pub fn is_authenticated(&self) -> bool {
    matches!(self, Authentication::Authenticated { .. })
  }
}

/* ---------------------------------------- */
#[derive(Debug, Clone, Default)]
/// Verifies authorization headers of incoming requests
pub struct Verifier {
  config: VerifierConfig,
}

impl Verifier {
  pub fn new(config: VerifierConfig) -> Self {
    Self { config }
  }

  /// Returns true if the authorization header carries a valid signature of the request.
  /// Malformed headers and resolver faults are errors, unknown identities and mismatches are `false`.
  pub fn verify<R>(&self, request: &SignableRequest, authorization: &str, resolver: &R) -> HmacAuthResult<bool>
  where
    R: KeyResolver + ?Sized,
  {
    self
      .authenticate(request, authorization, resolver)
      .map(|auth| auth.is_authenticated())
  }

  /// Verify the request and report the reason of a rejection
  pub fn authenticate<R>(&self, request: &SignableRequest, authorization: &str, resolver: &R) -> HmacAuthResult<Authentication>
  where
    R: KeyResolver + ?Sized,
  {
    let header = self.extract(authorization)?;
    let private_key = resolver.resolve(header.public_id())?;
    self.decide(request, &header, private_key, Utc::now())
  }

  /// Asynchronous counterpart of [`Verifier::verify`]
  pub async fn verify_async<R>(&self, request: &SignableRequest, authorization: &str, resolver: &R) -> HmacAuthResult<bool>
  where
    R: AsyncKeyResolver + Sync + ?Sized,
  {
    self
      .authenticate_async(request, authorization, resolver)
      .await
      .map(|auth| auth.is_authenticated())
  }

  /// Asynchronous counterpart of [`Verifier::authenticate`]
  pub async fn authenticate_async<R>(
    &self,
    request: &SignableRequest,
    authorization: &str,
    resolver: &R,
  ) -> HmacAuthResult<Authentication>
  where
    R: AsyncKeyResolver + Sync + ?Sized,
  {
    let header = self.extract(authorization)?;
    let private_key = resolver.resolve_async(header.public_id()).await?;
    self.decide(request, &header, private_key, Utc::now())
  }

  fn extract(&self, authorization: &str) -> HmacAuthResult<AuthorizationHeader> {
    AuthorizationHeader::parse_with_scheme(authorization, &self.config.scheme).map_err(|e| {
      debug!("{e}");
      e
    })
  }

  /// Decide on a parsed header and the outcome of key resolution
  fn decide(
    &self,
    request: &SignableRequest,
    header: &AuthorizationHeader,
    private_key: Option<String>,
    now: DateTime<Utc>,
  ) -> HmacAuthResult<Authentication> {
    let public_id = header.public_id();
    let Some(private_key) = private_key else {
      debug!(public_id, "Unknown identity");
      return Ok(Authentication::Rejected(Rejection::UnknownIdentity(public_id.to_string())));
    };

    if let Some(rejection) = self.check_freshness(request.date(), now) {
      debug!(public_id, date = request.date(), %rejection, "Stale request");
      return Ok(Authentication::Rejected(rejection));
    }

    let canonical = Canonicalizer::new(self.config.canonicalizer).canonicalize(request)?;
    let matched = self.match_signature(&canonical, private_key.as_bytes(), header)?;

    match matched {
      Some(hash) => {
        debug!(public_id, %hash, "Request authenticated");
        Ok(Authentication::Authenticated {
          public_id: public_id.to_string(),
          hash,
        })
      }
      None => {
        debug!(public_id, canonical = ?canonical.as_str(), "Signature mismatch");
        Ok(Authentication::Rejected(Rejection::SignatureMismatch))
      }
    }
  }

  /// Recompute the signature for every accepted hash and compare each of them in constant time
  fn match_signature(
    &self,
    canonical: &CanonicalString,
    private_key: &[u8],
    header: &AuthorizationHeader,
  ) -> HmacAuthResult<Option<SigningHash>> {
    let presented = header.signature();
    let mut matched = None;
    let mut any = Choice::from(0);
    for hash in &self.config.accepted_hashes {
      let expected = compute_signature(private_key, canonical.as_bytes(), *hash)?;
      let eq = expected.ct_eq(presented);
      if bool::from(eq & !any) {
        matched = Some(*hash);
      }
      any |= eq;
    }
    Ok(matched)
  }

  fn check_freshness(&self, date: &str, now: DateTime<Utc>) -> Option<Rejection> {
    let ttl = self.config.ttl?;
    if date.is_empty() {
      return Some(Rejection::MissingDate);
    }
    let Some(date) = parse_http_date(date) else {
      return Some(Rejection::InvalidDate);
    };
    let distance = (now - date).abs().to_std().ok()?;
    (distance > ttl).then_some(Rejection::Expired)
  }
}

/// Verify the authorization header of the request with the default configuration
pub fn verify<R>(request: &SignableRequest, authorization: &str, resolver: &R) -> HmacAuthResult<bool>
where
  R: KeyResolver + ?Sized,
{
  Verifier::default().verify(request, authorization, resolver)
}
