use sea_orm_migration::prelude::*;

use super::m20261017_000003_create_builds::Builds;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(BuildHashes::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(BuildHashes::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(BuildHashes::BuildId).integer().not_null())
          .col(ColumnDef::new(BuildHashes::Primary).boolean().not_null())
          .col(ColumnDef::new(BuildHashes::Sha1).string_len(40).not_null())
          .col(ColumnDef::new(BuildHashes::Sha224).string_len(56).not_null())
          .col(ColumnDef::new(BuildHashes::Sha256).string_len(64).not_null())
          .col(ColumnDef::new(BuildHashes::Sha384).string_len(96).not_null())
          .col(ColumnDef::new(BuildHashes::Sha512).string_len(128).not_null())
          .col(ColumnDef::new(BuildHashes::Md5).string_len(32).not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_build_hashes_build")
              .from(BuildHashes::Table, BuildHashes::BuildId)
              .to(Builds::Table, Builds::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_build_hashes_build")
          .table(BuildHashes::Table)
          .col(BuildHashes::BuildId)
          .to_owned(),
      )
      .await?;

    for (name, column) in [
      ("idx_build_hashes_sha1", BuildHashes::Sha1),
      ("idx_build_hashes_sha224", BuildHashes::Sha224),
      ("idx_build_hashes_sha256", BuildHashes::Sha256),
      ("idx_build_hashes_sha384", BuildHashes::Sha384),
      ("idx_build_hashes_sha512", BuildHashes::Sha512),
      ("idx_build_hashes_md5", BuildHashes::Md5),
    ] {
      manager
        .create_index(
          Index::create()
            .name(name)
            .table(BuildHashes::Table)
            .col(column)
            .to_owned(),
        )
        .await?;
    }

    Ok(())
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(BuildHashes::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum BuildHashes {
  Table,
  Id,
  BuildId,
  Primary,
  Sha1,
  Sha224,
  Sha256,
  Sha384,
  Sha512,
  Md5,
}
