use crate::error::ResolverError;
use rustc_hash::FxHashMap;
use std::future::Future;

/// Capability mapping a claimed public identity to its private key
///
/// `Ok(None)` means the identity is unknown, which verification reports as `false`.
/// `Err` means the backing store could not answer.
pub trait KeyResolver {
  fn resolve(&self, public_id: &str) -> Result<Option<String>, ResolverError>;
}

impl<F> KeyResolver for F
where
  F: Fn(&str) -> Result<Option<String>, ResolverError>,
{
  fn resolve(&self, public_id: &str) -> Result<Option<String>, ResolverError> {
    self(public_id)
  }
}

/// Asynchronous counterpart of [`KeyResolver`] for stores reached over I/O.
/// Timeouts and cancellation of the lookup belong to the implementation.
pub trait AsyncKeyResolver {
  fn resolve_async(&self, public_id: &str) -> impl Future<Output = Result<Option<String>, ResolverError>> + Send;
}

impl<T> AsyncKeyResolver for T
where
  T: KeyResolver + Sync,
{
  fn resolve_async(&self, public_id: &str) -> impl Future<Output = Result<Option<String>, ResolverError>> + Send {
    std::future::ready(self.resolve(public_id))
  }
}

/* ---------------------------------------- */
#[derive(Clone, Default)]
/// In-memory resolver over a fixed set of keys
pub struct StaticKeyResolver {
  keys: FxHashMap<String, String>,
}

impl StaticKeyResolver {
  /// Create a new resolver from (public id, private key) pairs
  pub fn new<I, K, V>(keys: I) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    Self {
      keys: keys.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
    }
  }

  pub fn insert(&mut self, public_id: impl Into<String>, private_key: impl Into<String>) {
    self.keys.insert(public_id.into(), private_key.into());
  }

  pub fn len(&self) -> usize {
    self.keys.len()
  }

  pub fn is_empty(&self) -> bool {
    self.keys.is_empty()
  }
}

impl KeyResolver for StaticKeyResolver {
  fn resolve(&self, public_id: &str) -> Result<Option<String>, ResolverError> {
    Ok(self.keys.get(public_id).cloned())
  }
}

impl std::fmt::Debug for StaticKeyResolver {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StaticKeyResolver")
      .field("public_ids", &self.keys.keys().collect::<Vec<_>>())
      .finish()
  }
}
