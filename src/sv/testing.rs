//! Catalog fixtures shared by the service and router tests.

use chrono::NaiveDate;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, Database, Set};

use crate::{
  entity::{
    Algorithm, ServerType, VersionType,
    build::{self, Changes, InstallStep, Installation},
    build_hash, minecraft_version, project_version,
  },
  prelude::*,
};

pub async fn setup_db() -> DatabaseConnection {
  let db = Database::connect("sqlite::memory:").await.unwrap();
  Migrator::up(&db, None).await.unwrap();
  db
}

pub fn date(year: i32, month: u32, day: u32) -> DateTime {
  NaiveDate::from_ymd_opt(year, month, day)
    .unwrap()
    .and_hms_opt(0, 0, 0)
    .unwrap()
}

pub async fn minecraft(
  db: &DatabaseConnection,
  id: &str,
  kind: VersionType,
  java: i32,
  supported: bool,
  created: DateTime,
) -> minecraft_version::Model {
  minecraft_version::ActiveModel {
    id: Set(id.to_string()),
    kind: Set(kind),
    supported: Set(supported),
    java: Set(java),
    created: Set(created),
  }
  .insert(db)
  .await
  .unwrap()
}

pub async fn project(db: &DatabaseConnection, kind: ServerType, id: &str) {
  let exists = project_version::Entity::find_by_id((kind, id.to_string()))
    .one(db)
    .await
    .unwrap()
    .is_some();

  if !exists {
    project_version::ActiveModel { kind: Set(kind), id: Set(id.to_string()) }
      .insert(db)
      .await
      .unwrap();
  }
}

pub struct Seed {
  id: Option<i32>,
  kind: ServerType,
  version: Option<String>,
  project: Option<String>,
  build_number: i32,
  jar_size: Option<i64>,
  zip_size: Option<i64>,
  installation: Installation,
  changes: Vec<String>,
  created: Option<DateTime>,
}

impl Seed {
  pub fn new(kind: ServerType) -> Self {
    Self {
      id: None,
      kind,
      version: None,
      project: None,
      build_number: 1,
      jar_size: None,
      zip_size: None,
      installation: Installation(vec![vec![InstallStep::Download {
        file: "server.jar".into(),
        url: "https://example.com/server.jar".into(),
        size: 1024,
      }]]),
      changes: Vec::new(),
      created: None,
    }
  }

  pub fn paper(version: &str, build_number: i32) -> Self {
    Self::new(ServerType::Paper).version(version).number(build_number)
  }

  pub fn id(mut self, id: i32) -> Self {
    self.id = Some(id);
    self
  }

  pub fn version(mut self, version: &str) -> Self {
    self.version = Some(version.to_string());
    self
  }

  pub fn project(mut self, project: &str) -> Self {
    self.project = Some(project.to_string());
    self
  }

  pub fn number(mut self, build_number: i32) -> Self {
    self.build_number = build_number;
    self
  }

  pub fn jar(mut self, size: i64) -> Self {
    self.jar_size = Some(size);
    self
  }

  pub fn zip(mut self, size: i64) -> Self {
    self.zip_size = Some(size);
    self
  }

  pub fn installation(mut self, installation: Vec<Vec<InstallStep>>) -> Self {
    self.installation = Installation(installation);
    self
  }

  pub fn changes(mut self, changes: &[&str]) -> Self {
    self.changes = changes.iter().map(|c| c.to_string()).collect();
    self
  }

  pub fn created(mut self, created: DateTime) -> Self {
    self.created = Some(created);
    self
  }

  pub async fn insert(self, db: &DatabaseConnection) -> build::Model {
    if let Some(version) = &self.version {
      let exists = minecraft_version::Entity::find_by_id(version.as_str())
        .one(db)
        .await
        .unwrap()
        .is_some();
      if !exists {
        minecraft(db, version, VersionType::Release, 21, true, date(2024, 1, 1))
          .await;
      }
    }
    if let Some(id) = &self.project {
      project(db, self.kind, id).await;
    }

    build::ActiveModel {
      id: self.id.map(Set).unwrap_or(NotSet),
      version_id: Set(self.version),
      project_version_id: Set(self.project),
      kind: Set(self.kind),
      experimental: Set(false),
      build_number: Set(self.build_number),
      jar_url: Set(
        self.jar_size.map(|_| "https://example.com/server.jar".to_string()),
      ),
      jar_size: Set(self.jar_size),
      jar_location: Set(None),
      zip_url: Set(
        self.zip_size.map(|_| "https://example.com/server.zip".to_string()),
      ),
      zip_size: Set(self.zip_size),
      installation: Set(self.installation),
      changes: Set(Changes(self.changes)),
      created: Set(self.created),
    }
    .insert(db)
    .await
    .unwrap()
  }
}

/// Inserts a hash row whose digests are `fill` repeated to each length.
pub async fn insert_hashes(
  db: &DatabaseConnection,
  build_id: i32,
  fill: &str,
) -> build_hash::Model {
  let hash = |algo: Algorithm| fill.repeat(algo.hex_len());

  build_hash::ActiveModel {
    id: NotSet,
    build_id: Set(build_id),
    primary: Set(true),
    sha1: Set(hash(Algorithm::Sha1)),
    sha224: Set(hash(Algorithm::Sha224)),
    sha256: Set(hash(Algorithm::Sha256)),
    sha384: Set(hash(Algorithm::Sha384)),
    sha512: Set(hash(Algorithm::Sha512)),
    md5: Set(hash(Algorithm::Md5)),
  }
  .insert(db)
  .await
  .unwrap()
}

pub fn hash_of(hashes: &build_hash::Model, algo: Algorithm) -> String {
  match algo {
    Algorithm::Md5 => hashes.md5.clone(),
    Algorithm::Sha1 => hashes.sha1.clone(),
    Algorithm::Sha224 => hashes.sha224.clone(),
    Algorithm::Sha256 => hashes.sha256.clone(),
    Algorithm::Sha384 => hashes.sha384.clone(),
    Algorithm::Sha512 => hashes.sha512.clone(),
  }
}
