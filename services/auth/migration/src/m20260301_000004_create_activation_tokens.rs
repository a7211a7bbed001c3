use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ActivationTokens::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ActivationTokens::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ActivationTokens::UserId).uuid().not_null())
                    .col(ColumnDef::new(ActivationTokens::Code).string().not_null())
                    .col(
                        ColumnDef::new(ActivationTokens::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ActivationTokens::ExpiredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ActivationTokens::ValidatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .from(ActivationTokens::Table, ActivationTokens::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(ActivationTokens::Table)
                    .col(ActivationTokens::Code)
                    .name("idx_activation_tokens_code")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(ActivationTokens::Table)
                    .col(ActivationTokens::UserId)
                    .name("idx_activation_tokens_user_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ActivationTokens::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ActivationTokens {
    Table,
    Id,
    UserId,
    Code,
    CreatedAt,
    ExpiredAt,
    ValidatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
