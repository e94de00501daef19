//! Build resolution: find a build, then the latest member of its family.

use futures::future;

use crate::{
  entity::{ServerType, build},
  model::Resolution,
  prelude::*,
  sv::{
    self,
    build::{BuildRef, Candidate},
    search::Filter,
  },
};

/// Mod loader an Arclight project version is built for, taken from the
/// suffix after its last `-`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Loader {
  Fabric,
  Forge,
  NeoForge,
}

impl Loader {
  pub fn of(project_version: Option<&str>) -> Option<Self> {
    let (_, suffix) = project_version?.rsplit_once('-')?;
    match suffix {
      "fabric" => Some(Self::Fabric),
      "forge" => Some(Self::Forge),
      "neoforge" => Some(Self::NeoForge),
      _ => None,
    }
  }
}

/// Arclight builds only share a family with builds of the same loader.
/// A resolved build without a known loader accepts every candidate.
pub fn shares_loader(
  kind: ServerType,
  resolved: Option<&str>,
  candidate: Option<&str>,
) -> bool {
  if kind != ServerType::Arclight {
    return true;
  }
  match Loader::of(resolved) {
    Some(loader) => Loader::of(candidate) == Some(loader),
    None => true,
  }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Family {
  pub latest: i32,
  pub builds: u64,
  pub oldest: Option<DateTime>,
}

impl Family {
  /// Reduces the candidates of `build` to its family. The build itself is
  /// always a member, whether or not it is among the candidates.
  pub fn collect(build: &build::Model, candidates: &[Candidate]) -> Self {
    let mut family =
      Self { latest: build.id, builds: 1, oldest: build.created };

    let resolved = build.project_version_id.as_deref();
    candidates
      .iter()
      .filter(|candidate| candidate.id != build.id)
      .filter(|candidate| {
        shares_loader(
          build.kind,
          resolved,
          candidate.project_version_id.as_deref(),
        )
      })
      .for_each(|candidate| family.absorb(candidate.id, candidate.created));

    family
  }

  fn absorb(&mut self, id: i32, created: Option<DateTime>) {
    self.latest = self.latest.max(id);
    self.builds += 1;
    self.oldest = match (self.oldest, created) {
      (Some(a), Some(b)) => Some(a.min(b)),
      (a, b) => a.or(b),
    };
  }
}

pub struct Resolve<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Resolve<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn token(&self, build: &BuildRef) -> Result<Option<Resolution>> {
    let Some(build) = sv::Build::new(self.db).by_ref(build).await? else {
      return Ok(None);
    };
    self.family(build).await.map(Some)
  }

  pub async fn search(&self, filters: &[Filter]) -> Result<Option<Resolution>> {
    let Some(build) = sv::Build::new(self.db).search(filters).await? else {
      return Ok(None);
    };
    self.family(build).await.map(Some)
  }

  /// Resolves every search concurrently. Results keep the input order and a
  /// failed entry becomes `None`.
  pub async fn batch(&self, searches: &[Vec<Filter>]) -> Vec<Option<Resolution>> {
    let lookups = searches.iter().enumerate().map(|(idx, filters)| async move {
      match self.search(filters).await {
        Ok(resolution) => resolution,
        Err(err) => {
          warn!("Batch lookup {idx} failed: {err}");
          None
        }
      }
    });
    future::join_all(lookups).await
  }

  pub async fn family(&self, build: build::Model) -> Result<Resolution> {
    let store = sv::Build::new(self.db);

    let family = match build.family_key() {
      Some(key) => {
        let candidates = store.family_candidates(build.kind, key).await?;
        Family::collect(&build, &candidates)
      }
      None => Family::collect(&build, &[]),
    };
    debug!(
      "Build {} resolves to {} of {} in its family",
      build.id, family.latest, family.builds
    );

    let latest = if family.latest == build.id {
      build.clone()
    } else {
      store.by_id(family.latest.into()).await?.ok_or_else(|| {
        Error::Internal(format!("latest build {} disappeared", family.latest))
      })?
    };

    let version = sv::Version::new(self.db)
      .summary(build.kind, build.family_key(), family.builds, family.oldest)
      .await?;

    Ok(Resolution { build: build.into(), latest: latest.into(), version })
  }
}
