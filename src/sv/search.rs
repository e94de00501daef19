//! Structured build search: request descriptors and the typed filters they
//! validate into.

use sea_orm::sea_query::SimpleExpr;
use serde::{Deserialize, Deserializer};

use crate::{
  entity::{
    Algorithm, ServerType, build,
    build_hash::{self, is_lower_hex},
  },
  prelude::*,
};

pub const MAX_BATCH: usize = 10;
const MAX_VERSION_LEN: usize = 31;

/// One equality predicate over a build (or its hash row).
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
  Id(i32),
  Type(ServerType),
  VersionId(Option<String>),
  ProjectVersionId(Option<String>),
  BuildNumber(i32),
  Experimental(bool),
  JarUrl(Option<String>),
  JarSize(Option<i64>),
  ZipUrl(Option<String>),
  ZipSize(Option<i64>),
  HashPrimary(bool),
  Hash(Algorithm, String),
}

impl Filter {
  pub fn needs_hashes(&self) -> bool {
    matches!(self, Self::HashPrimary(_) | Self::Hash(..))
  }

  pub fn condition(&self) -> SimpleExpr {
    use build::Column as B;

    match self {
      Self::Id(id) => B::Id.eq(*id),
      Self::Type(kind) => B::Kind.eq(*kind),
      Self::VersionId(value) => eq_or_null(B::VersionId, value.clone()),
      Self::ProjectVersionId(value) => {
        eq_or_null(B::ProjectVersionId, value.clone())
      }
      Self::BuildNumber(number) => B::BuildNumber.eq(*number),
      Self::Experimental(experimental) => B::Experimental.eq(*experimental),
      Self::JarUrl(value) => eq_or_null(B::JarUrl, value.clone()),
      Self::JarSize(value) => eq_or_null(B::JarSize, *value),
      Self::ZipUrl(value) => eq_or_null(B::ZipUrl, value.clone()),
      Self::ZipSize(value) => eq_or_null(B::ZipSize, *value),
      Self::HashPrimary(primary) => build_hash::Column::Primary.eq(*primary),
      Self::Hash(algo, hash) => algo.column().eq(hash.as_str()),
    }
  }
}

fn eq_or_null<V>(column: build::Column, value: Option<V>) -> SimpleExpr
where
  V: Into<sea_orm::Value>,
{
  match value {
    Some(value) => column.eq(value),
    None => column.is_null(),
  }
}

/// Distinguishes an absent key (`None`) from an explicit `null`
/// (`Some(None)`).
fn nullable<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Option::<T>::deserialize(de).map(Some)
}

#[derive(Debug, Default, Deserialize)]
pub struct HashSearch {
  pub primary: Option<bool>,
  pub sha1: Option<String>,
  pub sha224: Option<String>,
  pub sha256: Option<String>,
  pub sha384: Option<String>,
  pub sha512: Option<String>,
  pub md5: Option<String>,
}

impl HashSearch {
  fn digests(&self) -> [(Algorithm, &Option<String>); 6] {
    [
      (Algorithm::Sha1, &self.sha1),
      (Algorithm::Sha224, &self.sha224),
      (Algorithm::Sha256, &self.sha256),
      (Algorithm::Sha384, &self.sha384),
      (Algorithm::Sha512, &self.sha512),
      (Algorithm::Md5, &self.md5),
    ]
  }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSearch {
  pub id: Option<i32>,
  #[serde(rename = "type")]
  pub kind: Option<String>,
  #[serde(default, deserialize_with = "nullable")]
  pub version_id: Option<Option<String>>,
  #[serde(default, deserialize_with = "nullable")]
  pub project_version_id: Option<Option<String>>,
  pub build_number: Option<i32>,
  pub experimental: Option<bool>,
  pub hash: Option<HashSearch>,
  #[serde(default, deserialize_with = "nullable")]
  pub jar_url: Option<Option<String>>,
  #[serde(default, deserialize_with = "nullable")]
  pub jar_size: Option<Option<i64>>,
  #[serde(default, deserialize_with = "nullable")]
  pub zip_url: Option<Option<String>>,
  #[serde(default, deserialize_with = "nullable")]
  pub zip_size: Option<Option<i64>>,
}

/// Validation failure at a dotted path inside the request body.
#[derive(Debug, PartialEq)]
struct Issue {
  path: String,
  message: String,
}

impl Issue {
  fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
    Self { path: path.into(), message: message.into() }
  }

  fn nested(self, parent: usize) -> Self {
    let path = if self.path.is_empty() {
      parent.to_string()
    } else {
      format!("{parent}.{}", self.path)
    };
    Self { path, ..self }
  }

  fn render(&self) -> String {
    if self.path.is_empty() {
      self.message.clone()
    } else {
      format!("{}: {}", self.path, self.message)
    }
  }
}

fn version(
  path: &str,
  value: Option<String>,
) -> Result<Option<String>, Issue> {
  match value {
    Some(value) if value.len() > MAX_VERSION_LEN => Err(Issue::new(
      path,
      format!("String must contain at most {MAX_VERSION_LEN} character(s)"),
    )),
    value => Ok(value),
  }
}

impl BuildSearch {
  /// Validates the descriptor into its filter list, reporting every problem
  /// at once.
  fn filters(self) -> Result<Vec<Filter>, Vec<Issue>> {
    let mut issues = Vec::new();
    let mut filters = Vec::new();

    if let Some(id) = self.id {
      filters.push(Filter::Id(id));
    }
    if let Some(kind) = self.kind {
      match kind.parse::<ServerType>() {
        Ok(kind) => filters.push(Filter::Type(kind)),
        Err(_) => issues.push(Issue::new("type", "Invalid type")),
      }
    }
    if let Some(value) = self.version_id {
      match version("versionId", value) {
        Ok(value) => filters.push(Filter::VersionId(value)),
        Err(issue) => issues.push(issue),
      }
    }
    if let Some(value) = self.project_version_id {
      match version("projectVersionId", value) {
        Ok(value) => filters.push(Filter::ProjectVersionId(value)),
        Err(issue) => issues.push(issue),
      }
    }
    if let Some(number) = self.build_number {
      filters.push(Filter::BuildNumber(number));
    }
    if let Some(experimental) = self.experimental {
      filters.push(Filter::Experimental(experimental));
    }
    if let Some(url) = self.jar_url {
      filters.push(Filter::JarUrl(url));
    }
    if let Some(size) = self.jar_size {
      filters.push(Filter::JarSize(size));
    }
    if let Some(url) = self.zip_url {
      filters.push(Filter::ZipUrl(url));
    }
    if let Some(size) = self.zip_size {
      filters.push(Filter::ZipSize(size));
    }

    if let Some(hash) = &self.hash {
      if let Some(primary) = hash.primary {
        filters.push(Filter::HashPrimary(primary));
      }
      for (algo, digest) in hash.digests() {
        let Some(digest) = digest else { continue };
        let path = format!("hash.{}", algo.name());
        if digest.len() != algo.hex_len() {
          issues.push(Issue::new(
            path,
            format!("String must contain exactly {} character(s)", algo.hex_len()),
          ));
        } else if !is_lower_hex(digest) {
          issues.push(Issue::new(path, "Invalid hash"));
        } else {
          filters.push(Filter::Hash(algo, digest.clone()));
        }
      }
    }

    if issues.is_empty() && filters.is_empty() {
      issues.push(Issue::new("", "At least one search field is required"));
    }

    if issues.is_empty() { Ok(filters) } else { Err(issues) }
  }
}

/// A validated `POST /build` body.
#[derive(Debug, PartialEq)]
pub enum Search {
  One(Vec<Filter>),
  Many(Vec<Vec<Filter>>),
}

impl Search {
  pub fn parse(body: &[u8]) -> Result<Self> {
    let value: json::Value = json::from_slice(body)
      .map_err(|_| Error::invalid("Invalid JSON body"))?;

    let issues = match value {
      json::Value::Array(items) => {
        if items.is_empty() || items.len() > MAX_BATCH {
          return Err(Error::invalid(format!(
            "Array must contain between 1 and {MAX_BATCH} element(s)"
          )));
        }

        let mut issues = Vec::new();
        let mut searches = Vec::with_capacity(items.len());
        for (idx, item) in items.into_iter().enumerate() {
          match descriptor(item) {
            Ok(filters) => searches.push(filters),
            Err(errs) => {
              issues.extend(errs.into_iter().map(|issue| issue.nested(idx)))
            }
          }
        }
        if issues.is_empty() {
          return Ok(Self::Many(searches));
        }
        issues
      }
      value => match descriptor(value) {
        Ok(filters) => return Ok(Self::One(filters)),
        Err(issues) => issues,
      },
    };

    Err(Error::Invalid(issues.iter().map(Issue::render).collect()))
  }
}

fn descriptor(value: json::Value) -> Result<Vec<Filter>, Vec<Issue>> {
  if !value.is_object() {
    return Err(vec![Issue::new("", "Expected object")]);
  }
  json::from_value::<BuildSearch>(value)
    .map_err(|err| vec![Issue::new("", err.to_string())])?
    .filters()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn one(body: &str) -> Vec<Filter> {
    match Search::parse(body.as_bytes()).unwrap() {
      Search::One(filters) => filters,
      other => panic!("expected a single search, got {other:?}"),
    }
  }

  fn errors(body: &str) -> Vec<String> {
    match Search::parse(body.as_bytes()) {
      Err(Error::Invalid(errors)) => errors,
      other => panic!("expected validation errors, got {other:?}"),
    }
  }

  #[test]
  fn null_and_absent_are_different() {
    let filters = one(r#"{"type":"paper","versionId":null}"#);
    assert_eq!(
      filters,
      vec![Filter::Type(ServerType::Paper), Filter::VersionId(None)]
    );

    let filters = one(r#"{"buildNumber":196}"#);
    assert_eq!(filters, vec![Filter::BuildNumber(196)]);
  }

  #[test]
  fn hash_fields_join_hashes() {
    let sha1 = "f".repeat(40);
    let filters = one(&format!(r#"{{"hash":{{"sha1":"{sha1}","primary":true}}}}"#));

    assert!(filters.iter().all(Filter::needs_hashes));
    assert!(filters.contains(&Filter::Hash(Algorithm::Sha1, sha1)));
  }

  #[test]
  fn invalid_fields_are_collected() {
    let long = "1".repeat(32);
    let errors = errors(&format!(
      r#"{{"type":"bukkit","versionId":"{long}","hash":{{"md5":"abc"}}}}"#
    ));

    assert_eq!(errors.len(), 3);
    assert!(errors.contains(&"type: Invalid type".to_string()));
    assert!(errors.iter().any(|e| e.starts_with("versionId:")));
    assert!(errors.iter().any(|e| e.starts_with("hash.md5:")));
  }

  #[test]
  fn uppercase_hashes_are_rejected() {
    let errors = errors(&format!(r#"{{"hash":{{"md5":"{}"}}}}"#, "A".repeat(32)));
    assert_eq!(errors, vec!["hash.md5: Invalid hash".to_string()]);
  }

  #[test]
  fn batch_bounds_and_paths() {
    assert!(matches!(Search::parse(b"[]"), Err(Error::Invalid(_))));

    let eleven = format!("[{}]", vec![r#"{"id":1}"#; 11].join(","));
    assert!(matches!(Search::parse(eleven.as_bytes()), Err(Error::Invalid(_))));

    let errors = errors(r#"[{"id":1},{"type":"nope"}]"#);
    assert_eq!(errors, vec!["1.type: Invalid type".to_string()]);

    let many = Search::parse(br#"[{"id":1},{"id":2}]"#).unwrap();
    assert_eq!(
      many,
      Search::Many(vec![vec![Filter::Id(1)], vec![Filter::Id(2)]])
    );
  }

  #[test]
  fn malformed_bodies_are_invalid() {
    assert!(matches!(Search::parse(b"{"), Err(Error::Invalid(_))));
    assert!(matches!(Search::parse(b"{}"), Err(Error::Invalid(_))));
    assert!(matches!(Search::parse(b"42"), Err(Error::Invalid(_))));
    assert!(matches!(
      Search::parse(br#"{"id":"seven"}"#),
      Err(Error::Invalid(_))
    ));
  }
}
