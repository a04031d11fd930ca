use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContestPhotoVotes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContestPhotoVotes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ContestPhotoVotes::EntryId).integer().not_null())
                    .col(ColumnDef::new(ContestPhotoVotes::VoterId).integer().not_null())
                    .col(ColumnDef::new(ContestPhotoVotes::Score).integer().not_null())
                    .col(ColumnDef::new(ContestPhotoVotes::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(ContestPhotoVotes::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_votes_entry_id")
                            .from(ContestPhotoVotes::Table, ContestPhotoVotes::EntryId)
                            .to(ContestEntries::Table, ContestEntries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_votes_voter_id")
                            .from(ContestPhotoVotes::Table, ContestPhotoVotes::VoterId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_votes_entry_voter")
                    .table(ContestPhotoVotes::Table)
                    .col(ContestPhotoVotes::EntryId)
                    .col(ContestPhotoVotes::VoterId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ContestPhotoVotes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ContestPhotoVotes {
    Table,
    Id,
    EntryId,
    VoterId,
    Score,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ContestEntries {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
