use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Contest::Contests)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contest::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Contest::Slug).string().not_null().unique_key())
                    .col(ColumnDef::new(Contest::Title).string().not_null())
                    .col(ColumnDef::new(Contest::Description).text().not_null())
                    .col(ColumnDef::new(Contest::StartDate).timestamp().not_null())
                    .col(ColumnDef::new(Contest::EndDate).timestamp().not_null())
                    .col(ColumnDef::new(Contest::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Contest::UpdatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Contest::UpdatedBy).string().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Contest::Contests).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Contest {
    Contests,
    Id,
    Slug,
    Title,
    Description,
    StartDate,
    EndDate,
    CreatedAt,
    UpdatedAt,
    UpdatedBy,
}
