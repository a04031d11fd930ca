use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Users)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(User::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(User::Name).string().not_null())
                    .col(ColumnDef::new(User::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(User::Password).string().not_null())
                    .col(ColumnDef::new(User::Role).string().not_null().default("user"))
                    .col(ColumnDef::new(User::Street).string().not_null())
                    .col(ColumnDef::new(User::City).string().not_null())
                    .col(ColumnDef::new(User::State).string_len(2).not_null())
                    .col(ColumnDef::new(User::Zip).string().not_null())
                    .col(ColumnDef::new(User::Phone).string().not_null())
                    .col(ColumnDef::new(User::Age).integer().not_null())
                    .col(ColumnDef::new(User::Gender).string_len(1).not_null())
                    .col(ColumnDef::new(User::Ethnicity).string_len(2).not_null())
                    .col(ColumnDef::new(User::OtherEthnicity).string())
                    .col(ColumnDef::new(User::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(User::Users).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum User {
    Users,
    Id,
    Name,
    Email,
    Password,
    Role,
    Street,
    City,
    State,
    Zip,
    Phone,
    Age,
    Gender,
    Ethnicity,
    OtherEthnicity,
    CreatedAt,
}
