use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::build;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "build_hashes")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  pub build_id: i32,
  pub primary: bool,
  pub sha1: String,
  pub sha224: String,
  pub sha256: String,
  pub sha384: String,
  pub sha512: String,
  pub md5: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "build::Entity",
    from = "Column::BuildId",
    to = "build::Column::Id"
  )]
  Build,
}

impl Related<build::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Build.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}

/// Digest algorithms a build can be looked up by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
  Md5,
  Sha1,
  Sha224,
  Sha256,
  Sha384,
  Sha512,
}

impl Algorithm {
  pub const ALL: [Algorithm; 6] = [
    Self::Md5,
    Self::Sha1,
    Self::Sha224,
    Self::Sha256,
    Self::Sha384,
    Self::Sha512,
  ];

  /// Hex digest length, the only thing that tells the algorithms apart.
  pub fn hex_len(self) -> usize {
    match self {
      Self::Md5 => 32,
      Self::Sha1 => 40,
      Self::Sha224 => 56,
      Self::Sha256 => 64,
      Self::Sha384 => 96,
      Self::Sha512 => 128,
    }
  }

  pub fn from_len(len: usize) -> Option<Self> {
    Self::ALL.into_iter().find(|algo| algo.hex_len() == len)
  }

  /// Strict detection: the length must select an algorithm and every
  /// character must be lowercase hex.
  pub fn detect(hash: &str) -> Option<Self> {
    let algo = Self::from_len(hash.len())?;
    is_lower_hex(hash).then_some(algo)
  }

  pub fn column(self) -> Column {
    match self {
      Self::Md5 => Column::Md5,
      Self::Sha1 => Column::Sha1,
      Self::Sha224 => Column::Sha224,
      Self::Sha256 => Column::Sha256,
      Self::Sha384 => Column::Sha384,
      Self::Sha512 => Column::Sha512,
    }
  }

  pub fn name(self) -> &'static str {
    match self {
      Self::Md5 => "md5",
      Self::Sha1 => "sha1",
      Self::Sha224 => "sha224",
      Self::Sha256 => "sha256",
      Self::Sha384 => "sha384",
      Self::Sha512 => "sha512",
    }
  }
}

pub fn is_lower_hex(s: &str) -> bool {
  !s.is_empty() && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn length_selects_algorithm() {
    for algo in Algorithm::ALL {
      let hash = "a".repeat(algo.hex_len());
      assert_eq!(Algorithm::detect(&hash), Some(algo), "{}", algo.name());
    }
  }

  #[test]
  fn other_lengths_never_detect() {
    for len in (0..=130).filter(|len| Algorithm::from_len(*len).is_none()) {
      assert_eq!(Algorithm::detect(&"a".repeat(len)), None, "len {len}");
    }
  }

  #[test]
  fn charset_is_strict() {
    assert_eq!(Algorithm::detect(&"A".repeat(64)), None);
    assert_eq!(Algorithm::detect(&"g".repeat(40)), None);
    assert_eq!(Algorithm::detect(&"0".repeat(32)), Some(Algorithm::Md5));
  }
}
