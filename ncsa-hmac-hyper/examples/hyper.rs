use bytes::Bytes;
use http::Request;
use http_body_util::Full;
use ncsa_hmac_hyper::{prelude::*, *};

type BoxBody = http_body_util::combinators::BoxBody<Bytes, anyhow::Error>;

const PUBLIC_ID: &str = "client-1";
const PRIVATE_KEY: &str = "secret123";

fn build_request() -> anyhow::Result<Request<BoxBody>> {
  use http_body_util::BodyExt;
  let body = Full::new(Bytes::from_static(br#"{"a":1}"#))
    .map_err(|never| match never {})
    .boxed();
  let req = Request::builder()
    .method("POST")
    .uri("https://example.com/widgets")
    .header("content-type", "application/json")
    .body(body)?;
  Ok(req)
}

fn duplicate(req: &Request<Full<Bytes>>) -> anyhow::Result<Request<Full<Bytes>>> {
  let mut builder = Request::builder().method(req.method().clone()).uri(req.uri().clone());
  for (name, value) in req.headers() {
    builder = builder.header(name, value);
  }
  Ok(builder.body(req.body().clone())?)
}

/// Sender function that generates a request with an NCSA.HMAC authorization header
async fn sender() -> anyhow::Result<Request<Full<Bytes>>> {
  let key_pair = KeyPair::new(PUBLIC_ID, PRIVATE_KEY)?;
  // content-digest and date headers are set along with the authorization header
  let req = build_request()?.set_hmac_authorization(&key_pair, SigningHash::Sha512).await?;
  Ok(req)
}

/// Receiver function that verifies a request against its key store
async fn receiver(req: Request<Full<Bytes>>) -> anyhow::Result<bool> {
  let key_store = StaticKeyResolver::new([(PUBLIC_ID, PRIVATE_KEY)]);

  // reject requests older than five minutes
  let mut config = VerifierConfig::default();
  config.set_ttl(std::time::Duration::from_secs(300));
  let verifier = Verifier::new(config);

  let (authentication, _req) = req.authenticate_hmac(&verifier, &key_store).await?;
  if let Authentication::Rejected(rejection) = &authentication {
    println!("rejected: {rejection}");
  }
  Ok(authentication.is_authenticated())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // sender generates a request with an authorization header
  let request_from_sender = sender().await?;
  let authorization = request_from_sender
    .headers()
    .get("authorization")
    .ok_or_else(|| anyhow::anyhow!("authorization header missing"))?
    .to_str()?;
  println!("authorization: {authorization}");
  assert!(authorization.starts_with("NCSA.HMAC client-1:"));

  // if needed, content-digest can be verified separately
  let digest_checked = duplicate(&request_from_sender)?.verify_content_digest().await?;
  assert!(digest_checked);

  // receiver verifies the request
  let verified = receiver(request_from_sender).await?;
  assert!(verified);
  Ok(())
}
