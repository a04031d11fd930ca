use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContestEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContestEntries::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ContestEntries::ContestId).integer().not_null())
                    .col(ColumnDef::new(ContestEntries::PhotoId).uuid().not_null().unique_key())
                    .col(ColumnDef::new(ContestEntries::SubjectName).string().not_null())
                    .col(ColumnDef::new(ContestEntries::SubjectAge).integer().not_null())
                    .col(ColumnDef::new(ContestEntries::SubjectCountry).string().not_null())
                    .col(ColumnDef::new(ContestEntries::SubjectOrigin).string().not_null())
                    .col(ColumnDef::new(ContestEntries::Location).string().not_null())
                    .col(ColumnDef::new(ContestEntries::SubjectBiography).text().not_null())
                    .col(ColumnDef::new(ContestEntries::ReleaseMimeType).string().not_null())
                    .col(ColumnDef::new(ContestEntries::Status).string().not_null().default("active"))
                    .col(ColumnDef::new(ContestEntries::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(ContestEntries::UpdatedAt).timestamp().not_null())
                    .col(ColumnDef::new(ContestEntries::UpdatedBy).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contest_entries_contest_id")
                            .from(ContestEntries::Table, ContestEntries::ContestId)
                            .to(Contests::Table, Contests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contest_entries_photo_id")
                            .from(ContestEntries::Table, ContestEntries::PhotoId)
                            .to(Photos::Table, Photos::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ContestEntries::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ContestEntries {
    Table,
    Id,
    ContestId,
    PhotoId,
    SubjectName,
    SubjectAge,
    SubjectCountry,
    SubjectOrigin,
    Location,
    SubjectBiography,
    ReleaseMimeType,
    Status,
    CreatedAt,
    UpdatedAt,
    UpdatedBy,
}

#[derive(DeriveIden)]
enum Contests {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Photos {
    Table,
    Id,
}
