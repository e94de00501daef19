//! Build entity - one downloadable artifact of a server type at a version

use json as serde_json;
use sea_orm::{FromJsonQueryResult, entity::prelude::*};
use serde::{Deserialize, Serialize};

use super::{ServerType, build_hash, minecraft_version};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InstallStep {
  Download { file: String, url: String, size: i64 },
  Unzip { file: String, location: String },
  Remove { location: String },
}

/// Groups run one after another, steps inside a group may run concurrently.
#[derive(
  Clone,
  Debug,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  FromJsonQueryResult,
)]
pub struct Installation(pub Vec<Vec<InstallStep>>);

#[derive(
  Clone,
  Debug,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  FromJsonQueryResult,
)]
pub struct Changes(pub Vec<String>);

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "builds")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  pub version_id: Option<String>,
  pub project_version_id: Option<String>,
  #[sea_orm(column_name = "type")]
  pub kind: ServerType,
  pub experimental: bool,
  pub build_number: i32,
  pub jar_url: Option<String>,
  pub jar_size: Option<i64>,
  pub jar_location: Option<String>,
  pub zip_url: Option<String>,
  pub zip_size: Option<i64>,
  #[sea_orm(column_type = "Json")]
  pub installation: Installation,
  #[sea_orm(column_type = "Json")]
  pub changes: Changes,
  pub created: Option<DateTime>,
}

impl Model {
  /// The identity shared by every build of the same family:
  /// `COALESCE(version_id, project_version_id)`.
  pub fn family_key(&self) -> Option<&str> {
    self.version_id.as_deref().or(self.project_version_id.as_deref())
  }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "minecraft_version::Entity",
    from = "Column::VersionId",
    to = "minecraft_version::Column::Id"
  )]
  MinecraftVersion,
  #[sea_orm(has_many = "build_hash::Entity")]
  Hashes,
}

impl Related<minecraft_version::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::MinecraftVersion.def()
  }
}

impl Related<build_hash::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Hashes.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
