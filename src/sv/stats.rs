use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
  entity::{ServerType, build},
  prelude::*,
  sv::version::Location,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Sizes<T> {
  pub jar: T,
  pub zip: T,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SizeSummary {
  pub total: Sizes<i64>,
  pub average: Sizes<f64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SizeStats {
  pub builds: u64,
  pub size: SizeSummary,
}

impl SizeStats {
  /// Aggregates `(jar, zip)` sizes. With `distinct_jars` the jar total
  /// counts each distinct size once. Averages skip missing sizes.
  pub fn aggregate(
    rows: &[(Option<i64>, Option<i64>)],
    distinct_jars: bool,
  ) -> Self {
    let jars: Vec<i64> = rows.iter().filter_map(|(jar, _)| *jar).collect();
    let zips: Vec<i64> = rows.iter().filter_map(|(_, zip)| *zip).collect();

    let jar_total = if distinct_jars {
      jars.iter().collect::<HashSet<_>>().into_iter().sum()
    } else {
      jars.iter().sum()
    };

    Self {
      builds: rows.len() as u64,
      size: SizeSummary {
        total: Sizes { jar: jar_total, zip: zips.iter().sum() },
        average: Sizes { jar: average(&jars), zip: average(&zips) },
      },
    }
  }
}

fn average(values: &[i64]) -> f64 {
  if values.is_empty() {
    return 0.0;
  }
  values.iter().map(|v| *v as f64).sum::<f64>() / values.len() as f64
}

pub struct Stats<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Stats<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  async fn sizes(
    &self,
    condition: Condition,
  ) -> Result<Vec<(Option<i64>, Option<i64>)>> {
    let rows = build::Entity::find()
      .select_only()
      .columns([build::Column::JarSize, build::Column::ZipSize])
      .filter(condition)
      .into_tuple()
      .all(self.db)
      .await?;
    Ok(rows)
  }

  /// Jar sizes are deduplicated for every type except Fabric.
  pub async fn by_type(&self, kind: ServerType) -> Result<SizeStats> {
    let rows = self
      .sizes(Condition::all().add(build::Column::Kind.eq(kind)))
      .await?;
    Ok(SizeStats::aggregate(&rows, kind != ServerType::Fabric))
  }

  /// Builds of `kind` at `version`, matched on the column `location` names.
  pub async fn by_type_version(
    &self,
    kind: ServerType,
    version: &str,
    location: Location,
  ) -> Result<SizeStats> {
    let column = match location {
      Location::Minecraft => build::Column::VersionId,
      Location::Project => build::Column::ProjectVersionId,
    };

    let rows = self
      .sizes(
        Condition::all()
          .add(build::Column::Kind.eq(kind))
          .add(column.eq(version)),
      )
      .await?;
    Ok(SizeStats::aggregate(&rows, kind != ServerType::Fabric))
  }

  /// `None` when no build targets the minecraft version.
  pub async fn by_version(&self, version: &str) -> Result<Option<SizeStats>> {
    let rows = self
      .sizes(Condition::all().add(build::Column::VersionId.eq(version)))
      .await?;
    if rows.is_empty() {
      return Ok(None);
    }
    Ok(Some(SizeStats::aggregate(&rows, true)))
  }
}
