use sea_orm::FromQueryResult;

use crate::{
  entity::{Algorithm, ServerType, build, build_hash, minecraft_version},
  prelude::*,
  sv::{search::Filter, version::Location},
};

/// A single opaque build identifier, as it arrives in a path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildRef {
  Id(i64),
  Hash(Algorithm, String),
}

impl BuildRef {
  /// Hash-shaped tokens win over numbers: a 32 digit string is an md5.
  pub fn parse(token: &str) -> Result<Self> {
    let token = token.trim();
    if let Some(algo) = Algorithm::detect(token) {
      return Ok(Self::Hash(algo, token.to_string()));
    }
    token.parse().map(Self::Id).map_err(|_| Error::InvalidBuild)
  }

  pub fn cache_key(&self) -> String {
    match self {
      Self::Id(id) => id.to_string(),
      Self::Hash(algo, hash) => format!("{}:{hash}", algo.name()),
    }
  }
}

/// Row of a candidate family, just enough to pick the latest member.
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct Candidate {
  pub id: i32,
  pub project_version_id: Option<String>,
  pub created: Option<DateTime>,
}

pub struct Build<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Build<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn by_id(&self, id: i64) -> Result<Option<build::Model>> {
    let Ok(id) = i32::try_from(id) else { return Ok(None) };
    if id <= 0 || id == i32::MAX {
      return Ok(None);
    }

    Ok(build::Entity::find_by_id(id).one(self.db).await?)
  }

  pub async fn by_hash(
    &self,
    algo: Algorithm,
    hash: &str,
  ) -> Result<Option<build::Model>> {
    let build = build::Entity::find()
      .inner_join(build_hash::Entity)
      .filter(algo.column().eq(hash))
      .one(self.db)
      .await?;
    Ok(build)
  }

  pub async fn by_ref(&self, build: &BuildRef) -> Result<Option<build::Model>> {
    match build {
      BuildRef::Id(id) => self.by_id(*id).await,
      BuildRef::Hash(algo, hash) => self.by_hash(*algo, hash).await,
    }
  }

  /// Build plus the java version of its minecraft version, if any.
  pub async fn with_java(
    &self,
    build: &BuildRef,
  ) -> Result<Option<(build::Model, Option<i32>)>> {
    let Some(build) = self.by_ref(build).await? else { return Ok(None) };

    let java = match &build.version_id {
      Some(version) => minecraft_version::Entity::find_by_id(version.as_str())
        .one(self.db)
        .await?
        .map(|version| version.java),
      None => None,
    };

    Ok(Some((build, java)))
  }

  /// Every build of `kind` whose `COALESCE(version_id, project_version_id)`
  /// equals `key`, newest first.
  pub async fn family_candidates(
    &self,
    kind: ServerType,
    key: &str,
  ) -> Result<Vec<Candidate>> {
    let candidates = build::Entity::find()
      .select_only()
      .columns([
        build::Column::Id,
        build::Column::ProjectVersionId,
        build::Column::Created,
      ])
      .filter(build::Column::Kind.eq(kind))
      .filter(
        Condition::any().add(build::Column::VersionId.eq(key)).add(
          Condition::all()
            .add(build::Column::VersionId.is_null())
            .add(build::Column::ProjectVersionId.eq(key)),
        ),
      )
      .order_by_desc(build::Column::Id)
      .into_model::<Candidate>()
      .all(self.db)
      .await?;
    Ok(candidates)
  }

  pub async fn list(
    &self,
    kind: ServerType,
    version: &str,
    location: Location,
  ) -> Result<Vec<build::Model>> {
    let column = match location {
      Location::Minecraft => build::Column::VersionId,
      Location::Project => build::Column::ProjectVersionId,
    };

    let builds = build::Entity::find()
      .filter(build::Column::Kind.eq(kind))
      .filter(column.eq(version))
      .order_by_desc(build::Column::Id)
      .all(self.db)
      .await?;
    Ok(builds)
  }

  /// First build (lowest id) matching every filter.
  pub async fn search(&self, filters: &[Filter]) -> Result<Option<build::Model>> {
    let mut query = build::Entity::find();
    if filters.iter().any(Filter::needs_hashes) {
      query = query.inner_join(build_hash::Entity);
    }

    let condition = filters
      .iter()
      .fold(Condition::all(), |cond, filter| cond.add(filter.condition()));

    let build = query
      .filter(condition)
      .order_by_asc(build::Column::Id)
      .one(self.db)
      .await?;
    Ok(build)
  }

  pub async fn by_ids(&self, ids: Vec<i32>) -> Result<HashMap<i32, build::Model>> {
    let builds = build::Entity::find()
      .filter(build::Column::Id.is_in(ids))
      .all(self.db)
      .await?;
    Ok(builds.into_iter().map(|build| (build.id, build)).collect())
  }
}
