use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::build;

#[derive(
  Clone,
  Copy,
  Debug,
  PartialEq,
  Eq,
  EnumIter,
  DeriveActiveEnum,
  Serialize,
  Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "UPPERCASE")]
pub enum VersionType {
  #[sea_orm(string_value = "RELEASE")]
  Release,
  #[sea_orm(string_value = "SNAPSHOT")]
  Snapshot,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "minecraft_versions")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub id: String,
  #[sea_orm(column_name = "type")]
  pub kind: VersionType,
  pub supported: bool,
  pub java: i32,
  pub created: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(has_many = "build::Entity")]
  Builds,
}

impl Related<build::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Builds.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
