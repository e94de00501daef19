//! In-process response cache with per-entry expiry.

use std::future::Future;

use serde::{Serialize, de::DeserializeOwned};
use tokio::time::Instant;

use crate::prelude::*;

#[derive(Debug, Clone)]
struct Entry {
  value: json::Value,
  expires: Instant,
}

#[derive(Debug, Default)]
pub struct Cache {
  entries: DashMap<String, Entry>,
}

impl Cache {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, key: &str) -> Option<json::Value> {
    let entry = self.entries.get(key)?;
    (entry.expires > Instant::now()).then(|| entry.value.clone())
  }

  pub fn insert(&self, key: impl Into<String>, value: json::Value, ttl: Duration) {
    let expires = Instant::now() + ttl;
    self.entries.insert(key.into(), Entry { value, expires });
  }

  /// Returns the cached value for `key`, computing and storing it on a miss.
  /// Errors are never cached.
  pub async fn use_or<F>(
    &self,
    key: &str,
    ttl: Duration,
    compute: F,
  ) -> Result<json::Value>
  where
    F: Future<Output = Result<json::Value>>,
  {
    if let Some(value) = self.get(key) {
      debug!("Cache hit for `{key}`");
      return Ok(value);
    }

    let value = compute.await?;
    self.insert(key, value.clone(), ttl);
    Ok(value)
  }

  /// Typed [`Cache::use_or`]: values go through their JSON form.
  pub async fn use_as<T, F>(&self, key: &str, ttl: Duration, compute: F) -> Result<T>
  where
    T: Serialize + DeserializeOwned,
    F: Future<Output = Result<T>>,
  {
    if let Some(value) = self.get(key) {
      match json::from_value(value) {
        Ok(value) => return Ok(value),
        Err(err) => warn!("Dropping unreadable cache entry `{key}`: {err}"),
      }
    }

    let value = compute.await?;
    let json =
      json::to_value(&value).map_err(|err| Error::Internal(err.to_string()))?;
    self.insert(key, json, ttl);
    Ok(value)
  }

  pub fn gc(&self) -> usize {
    let now = Instant::now();
    let before = self.entries.len();
    self.entries.retain(|_, entry| entry.expires > now);
    before - self.entries.len()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }
}
