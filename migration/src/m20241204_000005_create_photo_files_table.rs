use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PhotoFiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PhotoFiles::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PhotoFiles::PhotoId).uuid().not_null())
                    .col(ColumnDef::new(PhotoFiles::FilePath).string().not_null())
                    .col(ColumnDef::new(PhotoFiles::Size).string().not_null())
                    .col(ColumnDef::new(PhotoFiles::Width).integer().not_null())
                    .col(ColumnDef::new(PhotoFiles::Height).integer().not_null())
                    .col(ColumnDef::new(PhotoFiles::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(PhotoFiles::UpdatedAt).timestamp().not_null())
                    .col(ColumnDef::new(PhotoFiles::UpdatedBy).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_photo_files_photo_id")
                            .from(PhotoFiles::Table, PhotoFiles::PhotoId)
                            .to(Photos::Table, Photos::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_photo_files_photo_size")
                    .table(PhotoFiles::Table)
                    .col(PhotoFiles::PhotoId)
                    .col(PhotoFiles::Size)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PhotoFiles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PhotoFiles {
    Table,
    Id,
    PhotoId,
    FilePath,
    Size,
    Width,
    Height,
    CreatedAt,
    UpdatedAt,
    UpdatedBy,
}

#[derive(DeriveIden)]
enum Photos {
    Table,
    Id,
}
