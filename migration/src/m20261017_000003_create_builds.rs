use sea_orm_migration::prelude::*;

use super::{
  m20261017_000001_create_minecraft_versions::MinecraftVersions,
  m20261017_000002_create_project_versions::ProjectVersions,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Builds::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Builds::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(Builds::VersionId).string_len(31).null())
          .col(ColumnDef::new(Builds::ProjectVersionId).string_len(31).null())
          .col(ColumnDef::new(Builds::Type).string().not_null())
          .col(
            ColumnDef::new(Builds::Experimental)
              .boolean()
              .not_null()
              .default(false),
          )
          .col(ColumnDef::new(Builds::BuildNumber).integer().not_null())
          .col(ColumnDef::new(Builds::JarUrl).string_len(255).null())
          .col(ColumnDef::new(Builds::JarSize).big_integer().null())
          .col(ColumnDef::new(Builds::JarLocation).string_len(51).null())
          .col(ColumnDef::new(Builds::ZipUrl).string_len(255).null())
          .col(ColumnDef::new(Builds::ZipSize).big_integer().null())
          .col(ColumnDef::new(Builds::Installation).json().not_null())
          .col(ColumnDef::new(Builds::Changes).json().not_null())
          .col(ColumnDef::new(Builds::Created).date_time().null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_builds_minecraft_version")
              .from(Builds::Table, Builds::VersionId)
              .to(MinecraftVersions::Table, MinecraftVersions::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_builds_project_version")
              .from(Builds::Table, (Builds::Type, Builds::ProjectVersionId))
              .to(
                ProjectVersions::Table,
                (ProjectVersions::Type, ProjectVersions::Id),
              )
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_builds_type_version")
          .table(Builds::Table)
          .col(Builds::Type)
          .col(Builds::VersionId)
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_builds_type_project_version")
          .table(Builds::Table)
          .col(Builds::Type)
          .col(Builds::ProjectVersionId)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Builds::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Builds {
  Table,
  Id,
  VersionId,
  ProjectVersionId,
  Type,
  Experimental,
  BuildNumber,
  JarUrl,
  JarSize,
  JarLocation,
  ZipUrl,
  ZipSize,
  Installation,
  Changes,
  Created,
}
