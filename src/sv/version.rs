use std::cmp::Ordering;

use sea_orm::{FromQueryResult, Iterable, sea_query::Expr};
use serde::Serialize;

use crate::{
  entity::{
    ServerType, VersionType, build, minecraft_version, project_version,
    server_type::TypeInfo,
  },
  model::{BuildView, FamilySummary, Ordered},
  prelude::*,
  sv,
};

/// Java release assumed for versions that carry no minecraft metadata.
pub const DEFAULT_JAVA: i32 = 21;

/// Which column of a build a version identifier lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
  Minecraft,
  Project,
}

/// Numeric ordering over the digit runs of a version, `3.10.0 > 3.9.1`.
/// Equal runs fall back to plain string comparison.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
  fn runs(version: &str) -> Vec<u64> {
    version
      .split(|c: char| !c.is_ascii_digit())
      .filter(|run| !run.is_empty())
      .map(|run| run.parse().unwrap_or(u64::MAX))
      .collect()
  }

  runs(a).cmp(&runs(b)).then_with(|| a.cmp(b))
}

pub fn newest<'a>(versions: &'a [String]) -> Option<&'a str> {
  versions
    .iter()
    .max_by(|a, b| compare_versions(a, b))
    .map(String::as_str)
}

pub fn is_newest(version: &str, versions: &[String]) -> bool {
  newest(versions) == Some(version)
}

#[derive(Debug, Serialize)]
pub struct VersionSummary {
  #[serde(rename = "type")]
  pub kind: VersionType,
  pub supported: bool,
  pub java: i32,
  pub created: Option<DateTime>,
  pub builds: i64,
  pub latest: BuildView,
}

#[derive(Debug, Serialize)]
pub struct TypeVersions {
  pub minecraft: i64,
  pub project: i64,
}

#[derive(Debug, Serialize)]
pub struct TypeSummary {
  #[serde(flatten)]
  pub info: &'static TypeInfo,
  pub icon: String,
  pub builds: i64,
  pub versions: TypeVersions,
}

#[derive(Debug, FromQueryResult)]
struct FamilyRow {
  key: String,
  builds: i64,
  latest: i32,
  oldest: Option<DateTime>,
}

#[derive(Debug, FromQueryResult)]
struct TypeRow {
  kind: ServerType,
  builds: i64,
  minecraft: i64,
  project: i64,
}

pub struct Version<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Version<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn minecraft(
    &self,
    id: &str,
  ) -> Result<Option<minecraft_version::Model>> {
    Ok(minecraft_version::Entity::find_by_id(id).one(self.db).await?)
  }

  /// Minecraft versions take precedence over project versions of the same
  /// name.
  pub async fn location(
    &self,
    kind: ServerType,
    version: &str,
  ) -> Result<Option<Location>> {
    if self.minecraft(version).await?.is_some() {
      return Ok(Some(Location::Minecraft));
    }

    let project = project_version::Entity::find_by_id((kind, version.to_string()))
      .one(self.db)
      .await?;
    Ok(project.map(|_| Location::Project))
  }

  /// Every project version of `kind`, oldest first.
  pub async fn project_versions(&self, kind: ServerType) -> Result<Vec<String>> {
    let mut versions: Vec<String> = project_version::Entity::find()
      .filter(project_version::Column::Kind.eq(kind))
      .all(self.db)
      .await?
      .into_iter()
      .map(|version| version.id)
      .collect();

    versions.sort_by(|a, b| compare_versions(a, b));
    Ok(versions)
  }

  /// Metadata of the family keyed by `key`. Minecraft rows win; project
  /// versions get synthesized release metadata.
  pub async fn summary(
    &self,
    kind: ServerType,
    key: Option<&str>,
    builds: u64,
    oldest: Option<DateTime>,
  ) -> Result<FamilySummary> {
    let mut summary = FamilySummary {
      id: key.map(str::to_string),
      kind: None,
      java: None,
      supported: None,
      created: None,
      builds,
    };
    let Some(key) = key else { return Ok(summary) };

    if let Some(version) = self.minecraft(key).await? {
      summary.kind = Some(version.kind);
      summary.java = Some(version.java);
      summary.supported = Some(version.supported);
      summary.created = Some(version.created);
      return Ok(summary);
    }

    let versions = self.project_versions(kind).await?;
    if versions.iter().any(|version| version == key) {
      summary.kind = Some(VersionType::Release);
      summary.java = Some(DEFAULT_JAVA);
      summary.supported = Some(is_newest(key, &versions));
      summary.created = oldest;
    }
    Ok(summary)
  }

  /// One summary per version of `kind` that has builds, each with its
  /// latest build.
  pub async fn summaries(
    &self,
    kind: ServerType,
  ) -> Result<Ordered<VersionSummary>> {
    let column = if kind.uses_project_versions() {
      build::Column::ProjectVersionId
    } else {
      build::Column::VersionId
    };

    let families = build::Entity::find()
      .select_only()
      .column_as(column, "key")
      .column_as(Expr::col(build::Column::Id).count(), "builds")
      .column_as(Expr::col(build::Column::Id).max(), "latest")
      .column_as(Expr::col(build::Column::Created).min(), "oldest")
      .filter(build::Column::Kind.eq(kind))
      .filter(column.is_not_null())
      .group_by(column)
      .into_model::<FamilyRow>()
      .all(self.db)
      .await?;

    let mut latest = sv::Build::new(self.db)
      .by_ids(families.iter().map(|family| family.latest).collect())
      .await?;

    let mut summaries = Vec::with_capacity(families.len());
    if kind.uses_project_versions() {
      let mut families = families;
      families.sort_by(|a, b| compare_versions(&a.key, &b.key));
      let newest = families.len().saturating_sub(1);

      for (idx, family) in families.into_iter().enumerate() {
        let Some(build) = latest.remove(&family.latest) else { continue };
        summaries.push((family.key, VersionSummary {
          kind: VersionType::Release,
          supported: idx == newest,
          java: DEFAULT_JAVA,
          created: family.oldest,
          builds: family.builds,
          latest: build.into(),
        }));
      }
    } else {
      let mut versions: HashMap<String, minecraft_version::Model> =
        minecraft_version::Entity::find()
          .filter(
            minecraft_version::Column::Id
              .is_in(families.iter().map(|family| family.key.clone())),
          )
          .all(self.db)
          .await?
          .into_iter()
          .map(|version| (version.id.clone(), version))
          .collect();

      let mut families: Vec<_> = families
        .into_iter()
        .filter_map(|family| {
          let version = versions.remove(&family.key)?;
          Some((family, version))
        })
        .collect();
      families.sort_by(|(_, a), (_, b)| {
        a.created.cmp(&b.created).then_with(|| compare_versions(&a.id, &b.id))
      });

      for (family, version) in families {
        let Some(build) = latest.remove(&family.latest) else { continue };
        summaries.push((family.key, VersionSummary {
          kind: version.kind,
          supported: version.supported,
          java: version.java,
          created: Some(version.created),
          builds: family.builds,
          latest: build.into(),
        }));
      }
    }

    Ok(Ordered(summaries))
  }

  /// Static metadata of every type with its build and version counts.
  pub async fn types(&self, icon_url: &str) -> Result<Ordered<TypeSummary>> {
    let counts: HashMap<ServerType, TypeRow> = build::Entity::find()
      .select_only()
      .column_as(build::Column::Kind, "kind")
      .column_as(Expr::col(build::Column::Id).count(), "builds")
      .column_as(
        Expr::col(build::Column::VersionId).count_distinct(),
        "minecraft",
      )
      .column_as(
        Expr::col(build::Column::ProjectVersionId).count_distinct(),
        "project",
      )
      .group_by(build::Column::Kind)
      .into_model::<TypeRow>()
      .all(self.db)
      .await?
      .into_iter()
      .map(|row| (row.kind, row))
      .collect();

    let icon_url = icon_url.trim_end_matches('/');
    let types = ServerType::iter()
      .map(|kind| {
        let count = counts.get(&kind);
        (kind.to_string(), TypeSummary {
          info: kind.info(),
          icon: format!(
            "{icon_url}/icons/{}.png",
            kind.as_str().to_lowercase()
          ),
          builds: count.map_or(0, |c| c.builds),
          versions: TypeVersions {
            minecraft: count.map_or(0, |c| c.minecraft),
            project: count.map_or(0, |c| c.project),
          },
        })
      })
      .collect();

    Ok(Ordered(types))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sv::testing::{self, Seed, date};

  #[test]
  fn versions_compare_numerically() {
    assert_eq!(compare_versions("3.10.0", "3.9.1"), Ordering::Greater);
    assert_eq!(compare_versions("3.3.0", "3.3.0"), Ordering::Equal);
    assert_eq!(compare_versions("1.20", "1.20.1"), Ordering::Less);
    assert_eq!(
      compare_versions("1.20.1-fabric", "1.20.1-forge"),
      Ordering::Less
    );

    let versions: Vec<String> =
      ["3.1.0", "3.10.0", "3.9.9"].map(String::from).into();
    assert_eq!(newest(&versions), Some("3.10.0"));
    assert!(is_newest("3.10.0", &versions));
    assert!(!is_newest("3.9.9", &versions));
    assert_eq!(newest(&[]), None);
  }

  #[tokio::test]
  async fn minecraft_location_wins() {
    let db = testing::setup_db().await;
    Seed::paper("1.20.1", 1).insert(&db).await;
    Seed::new(ServerType::Velocity).project("3.3.0").insert(&db).await;
    testing::project(&db, ServerType::Arclight, "1.20.1").await;
    let sv = Version::new(&db);

    assert_eq!(
      sv.location(ServerType::Arclight, "1.20.1").await.unwrap(),
      Some(Location::Minecraft)
    );
    assert_eq!(
      sv.location(ServerType::Velocity, "3.3.0").await.unwrap(),
      Some(Location::Project)
    );
    assert_eq!(sv.location(ServerType::Paper, "3.3.0").await.unwrap(), None);
    assert_eq!(sv.location(ServerType::Paper, "9.9").await.unwrap(), None);
  }

  #[tokio::test]
  async fn project_summary_is_synthesized() {
    let db = testing::setup_db().await;
    for version in ["3.2.0", "3.10.0", "3.3.0"] {
      testing::project(&db, ServerType::Velocity, version).await;
    }
    let sv = Version::new(&db);

    let summary = sv
      .summary(ServerType::Velocity, Some("3.10.0"), 2, Some(date(2024, 5, 1)))
      .await
      .unwrap();
    assert_eq!(summary.kind, Some(VersionType::Release));
    assert_eq!(summary.java, Some(DEFAULT_JAVA));
    assert_eq!(summary.supported, Some(true));
    assert_eq!(summary.created, Some(date(2024, 5, 1)));

    let summary = sv
      .summary(ServerType::Velocity, Some("3.3.0"), 1, None)
      .await
      .unwrap();
    assert_eq!(summary.supported, Some(false));

    let bare = sv.summary(ServerType::Paper, None, 1, None).await.unwrap();
    assert_eq!(bare.id, None);
    assert_eq!(bare.kind, None);
    assert_eq!(bare.builds, 1);
  }

  #[tokio::test]
  async fn summaries_follow_version_order() {
    let db = testing::setup_db().await;
    testing::minecraft(&db, "1.21", VersionType::Release, 21, true, date(2024, 6, 13))
      .await;
    testing::minecraft(&db, "1.8.8", VersionType::Release, 8, false, date(2015, 7, 28))
      .await;
    Seed::paper("1.21", 1).insert(&db).await;
    let latest = Seed::paper("1.21", 2).insert(&db).await;
    Seed::paper("1.8.8", 1).insert(&db).await;

    let summaries = Version::new(&db).summaries(ServerType::Paper).await.unwrap();
    let keys: Vec<_> = summaries.0.iter().map(|(key, _)| key.as_str()).collect();
    assert_eq!(keys, ["1.8.8", "1.21"]);

    let (_, summary) = &summaries.0[1];
    assert_eq!(summary.builds, 2);
    assert_eq!(summary.java, 21);
    assert_eq!(summary.latest.id, latest.id);
  }

  #[tokio::test]
  async fn velocity_summaries_mark_newest_supported() {
    let db = testing::setup_db().await;
    Seed::new(ServerType::Velocity).project("3.10.0").insert(&db).await;
    Seed::new(ServerType::Velocity).project("3.9.0").insert(&db).await;

    let summaries =
      Version::new(&db).summaries(ServerType::Velocity).await.unwrap();
    let flags: Vec<_> = summaries
      .0
      .iter()
      .map(|(key, summary)| (key.as_str(), summary.supported))
      .collect();
    assert_eq!(flags, [("3.9.0", false), ("3.10.0", true)]);
  }

  #[tokio::test]
  async fn types_count_builds_and_versions() {
    let db = testing::setup_db().await;
    Seed::paper("1.20.1", 1).insert(&db).await;
    Seed::paper("1.20.1", 2).insert(&db).await;
    Seed::paper("1.20.2", 1).insert(&db).await;

    let types = Version::new(&db).types("https://cdn.test/").await.unwrap();
    assert_eq!(types.0.len(), ServerType::iter().count());

    let (_, paper) = types.0.iter().find(|(key, _)| key == "PAPER").unwrap();
    assert_eq!(paper.builds, 3);
    assert_eq!(paper.versions.minecraft, 2);
    assert_eq!(paper.versions.project, 0);
    assert_eq!(paper.icon, "https://cdn.test/icons/paper.png");

    let value = json::to_value(&types).unwrap();
    assert_eq!(value["PAPER"]["name"], "Paper");
    assert_eq!(value["VANILLA"]["builds"], 0);
  }
}
