use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Photo::Photos)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Photo::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Photo::OwnerId).integer().not_null())
                    .col(ColumnDef::new(Photo::Title).string().not_null().default(""))
                    .col(ColumnDef::new(Photo::Description).text().not_null().default(""))
                    .col(ColumnDef::new(Photo::Deleted).boolean().not_null().default(false))
                    .col(ColumnDef::new(Photo::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Photo::UpdatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Photo::UpdatedBy).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_photo_owner")
                            .from(Photo::Photos, Photo::OwnerId)
                            .to(User::Users, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_photos_owner_id")
                    .table(Photo::Photos)
                    .col(Photo::OwnerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Photo::Photos).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Photo {
    Photos,
    Id,
    OwnerId,
    Title,
    Description,
    Deleted,
    CreatedAt,
    UpdatedAt,
    UpdatedBy,
}

#[derive(DeriveIden)]
enum User {
    Users,
    Id,
}
