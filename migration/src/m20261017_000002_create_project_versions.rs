use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(ProjectVersions::Table)
          .if_not_exists()
          .col(ColumnDef::new(ProjectVersions::Type).string().not_null())
          .col(ColumnDef::new(ProjectVersions::Id).string_len(31).not_null())
          .primary_key(
            Index::create()
              .col(ProjectVersions::Type)
              .col(ProjectVersions::Id),
          )
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(ProjectVersions::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum ProjectVersions {
  Table,
  Type,
  Id,
}
