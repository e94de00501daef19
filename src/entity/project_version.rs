use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::ServerType;

/// Versions of software that is not tied to a minecraft release, keyed by
/// `(type, id)`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "project_versions")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false, column_name = "type")]
  pub kind: ServerType,
  #[sea_orm(primary_key, auto_increment = false)]
  pub id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
