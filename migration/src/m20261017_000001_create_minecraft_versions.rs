use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(MinecraftVersions::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(MinecraftVersions::Id)
              .string_len(31)
              .not_null()
              .primary_key(),
          )
          .col(ColumnDef::new(MinecraftVersions::Type).string().not_null())
          .col(ColumnDef::new(MinecraftVersions::Supported).boolean().not_null())
          .col(
            ColumnDef::new(MinecraftVersions::Java)
              .integer()
              .not_null()
              .default(21),
          )
          .col(ColumnDef::new(MinecraftVersions::Created).date_time().not_null())
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_minecraft_versions_type")
          .table(MinecraftVersions::Table)
          .col(MinecraftVersions::Type)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(MinecraftVersions::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum MinecraftVersions {
  Table,
  Id,
  Type,
  Supported,
  Java,
  Created,
}
