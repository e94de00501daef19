pub use sea_orm_migration::prelude::*;

mod m20261017_000001_create_minecraft_versions;
mod m20261017_000002_create_project_versions;
mod m20261017_000003_create_builds;
mod m20261017_000004_create_build_hashes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
  fn migrations() -> Vec<Box<dyn MigrationTrait>> {
    vec![
      Box::new(m20261017_000001_create_minecraft_versions::Migration),
      Box::new(m20261017_000002_create_project_versions::Migration),
      Box::new(m20261017_000003_create_builds::Migration),
      Box::new(m20261017_000004_create_build_hashes::Migration),
    ]
  }
}
