use super::{
  super::{error::HyperDigestError, hyper_content_digest::RequestContentDigest},
  *,
};
use http_body_util::BodyExt;
use ncsa_hmac::prelude::{Rejection, ResolverError, StaticKeyResolver, VerifierConfig};

type BoxBody = http_body_util::combinators::BoxBody<Bytes, HyperDigestError>;

const PUBLIC_ID: &str = "client-1";
const PRIVATE_KEY: &str = "secret123";
const DATE: &str = "Tue, 01 Jan 2024 00:00:00 GMT";

fn key_pair() -> KeyPair {
  KeyPair::new(PUBLIC_ID, PRIVATE_KEY).unwrap()
}

fn resolver() -> StaticKeyResolver {
  StaticKeyResolver::new([(PUBLIC_ID, PRIVATE_KEY)])
}

fn build_request() -> Request<BoxBody> {
  let body = Full::new(Bytes::from_static(br#"{"a":1}"#))
    .map_err(|never| match never {})
    .boxed();
  Request::builder()
    .method("POST")
    .uri("https://example.com/widgets?color=blue")
    .header("date", DATE)
    .header("content-type", "application/json")
    .body(body)
    .unwrap()
}

fn build_get_request() -> Request<BoxBody> {
  let body = Full::new(Bytes::new()).map_err(|never| match never {}).boxed();
  Request::builder()
    .method("GET")
    .uri("https://example.com/widgets")
    .body(body)
    .unwrap()
}

// ---- Header extraction ----

#[test]
fn test_signable_request_from_headers() {
  let req = build_request();
  let signable = req.signable_request(Some(Bytes::from_static(br#"{"a":1}"#))).unwrap();
  assert_eq!(signable.method(), "POST");
  assert_eq!(signable.path(), "/widgets?color=blue");
  assert_eq!(signable.content_type(), "application/json");
  assert_eq!(signable.date(), DATE);
  assert_eq!(signable.content_digest(), ncsa_hmac::prelude::content_digest(br#"{"a":1}"#));

  let req = build_get_request();
  let signable = req.signable_request(None).unwrap();
  assert_eq!(signable.content_type(), "");
  assert_eq!(signable.date(), "");
  assert_eq!(signable.content_digest(), "");
}

#[test]
fn test_public_id_extraction() {
  let req = build_get_request();
  assert!(!req.has_hmac_authorization());
  assert_eq!(req.hmac_public_id().unwrap(), None);

  let mut req = build_get_request();
  req
    .headers_mut()
    .insert(header::AUTHORIZATION, HeaderValue::from_static("NCSA.HMAC client-1:c2ln"));
  assert!(req.has_hmac_authorization());
  assert_eq!(req.hmac_public_id().unwrap(), Some(PUBLIC_ID.to_string()));

  let mut req = build_get_request();
  req
    .headers_mut()
    .insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer token"));
  assert!(!req.has_hmac_authorization());
  assert!(matches!(
    req.hmac_public_id(),
    Err(HyperHmacError::HmacAuthError(HmacAuthError::MalformedAuthHeader(_)))
  ));
}

// ---- Signing ----

#[tokio::test]
async fn test_set_hmac_authorization() {
  let req = build_request().set_hmac_authorization(&key_pair(), SigningHash::Sha512).await.unwrap();

  let headers = req.headers();
  assert_eq!(
    headers.get(CONTENT_DIGEST_HEADER).unwrap().to_str().unwrap(),
    ncsa_hmac::prelude::content_digest(br#"{"a":1}"#)
  );
  assert_eq!(headers.get(header::DATE).unwrap().to_str().unwrap(), DATE);

  // same value as the core signer over the same fields
  let signable = SignableRequest::new(
    "POST",
    "/widgets?color=blue",
    "application/json",
    DATE,
    Some(Bytes::from_static(br#"{"a":1}"#)),
  );
  let expected = authorization_header(&signable, &key_pair(), SigningHash::Sha512).unwrap();
  assert_eq!(headers.get(header::AUTHORIZATION).unwrap().to_str().unwrap(), expected);

  // body is preserved
  let body = req.into_body().collect().await.unwrap().to_bytes();
  assert_eq!(body.as_ref(), br#"{"a":1}"#);
}

#[tokio::test]
async fn test_set_hmac_authorization_without_body_and_date() {
  let req = build_get_request()
    .set_hmac_authorization(&key_pair(), SigningHash::Sha256)
    .await
    .unwrap();
  assert!(!req.headers().contains_key(CONTENT_DIGEST_HEADER));
  assert!(req.headers().contains_key(header::DATE));
  assert!(req.has_hmac_authorization());
}

// ---- Verification ----

#[tokio::test]
async fn test_set_verify_request() {
  let req = build_request().set_hmac_authorization(&key_pair(), SigningHash::Sha512).await.unwrap();
  let verified = req.verify_hmac_authorization(&Verifier::default(), &resolver()).await.unwrap();
  assert!(verified);
}

#[tokio::test]
async fn test_verify_with_ttl_and_generated_date() {
  let mut config = VerifierConfig::default();
  config.set_ttl(std::time::Duration::from_secs(300));
  config.set_accepted_hashes(&[SigningHash::Sha256, SigningHash::Sha512]);
  let verifier = Verifier::new(config);

  let req = build_get_request()
    .set_hmac_authorization(&key_pair(), SigningHash::Sha256)
    .await
    .unwrap();
  let (authentication, req) = req.authenticate_hmac(&verifier, &resolver()).await.unwrap();
  assert_eq!(
    authentication,
    Authentication::Authenticated {
      public_id: PUBLIC_ID.to_string(),
      hash: SigningHash::Sha256
    }
  );
  assert!(req.headers().contains_key(header::AUTHORIZATION));
}

#[tokio::test]
async fn test_tampered_body_fails() {
  let req = build_request().set_hmac_authorization(&key_pair(), SigningHash::Sha512).await.unwrap();
  let (parts, _) = req.into_parts();
  let tampered = Request::from_parts(parts, Full::new(Bytes::from_static(br#"{"a":2}"#)));

  let (authentication, tampered) = tampered.authenticate_hmac(&Verifier::default(), &resolver()).await.unwrap();
  assert_eq!(authentication, Authentication::Rejected(Rejection::SignatureMismatch));

  // the stale content-digest header reveals the tampering as well
  assert!(!tampered.verify_content_digest().await.unwrap());
}

#[tokio::test]
async fn test_tampered_path_fails() {
  let req = build_request().set_hmac_authorization(&key_pair(), SigningHash::Sha512).await.unwrap();
  let (mut parts, body) = req.into_parts();
  parts.uri = "https://example.com/widgets?color=red".parse().unwrap();
  let tampered = Request::from_parts(parts, body);

  let verified = tampered.verify_hmac_authorization(&Verifier::default(), &resolver()).await.unwrap();
  assert!(!verified);
}

#[tokio::test]
async fn test_unknown_identity_and_resolver_fault() {
  let req = build_request().set_hmac_authorization(&key_pair(), SigningHash::Sha512).await.unwrap();
  let copy = build_request().set_hmac_authorization(&key_pair(), SigningHash::Sha512).await.unwrap();

  let empty = StaticKeyResolver::default();
  let (authentication, _) = req.authenticate_hmac(&Verifier::default(), &empty).await.unwrap();
  assert_eq!(
    authentication,
    Authentication::Rejected(Rejection::UnknownIdentity(PUBLIC_ID.to_string()))
  );

  let offline = |_: &str| -> Result<Option<String>, ResolverError> { Err(ResolverError::new("key store offline")) };
  let res = copy.verify_hmac_authorization(&Verifier::default(), &offline).await;
  assert!(matches!(
    res,
    Err(HyperHmacError::HmacAuthError(HmacAuthError::ResolverUnavailable(_)))
  ));
}

#[tokio::test]
async fn test_missing_authorization_is_malformed() {
  let res = build_request().verify_hmac_authorization(&Verifier::default(), &resolver()).await;
  assert!(matches!(
    res,
    Err(HyperHmacError::HmacAuthError(HmacAuthError::MalformedAuthHeader(_)))
  ));
}

#[cfg(feature = "blocking")]
#[test]
fn test_set_verify_request_sync() {
  let req = build_request().set_hmac_authorization_sync(&key_pair(), SigningHash::Sha512).unwrap();
  let verified = req.verify_hmac_authorization_sync(&Verifier::default(), &resolver()).unwrap();
  assert!(verified);
}
