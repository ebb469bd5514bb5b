use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Owner lookups (list + total cost by user)
        manager
            .create_index(
                Index::create()
                    .name("idx_subscriptions_user_id")
                    .table(Subscriptions::Table)
                    .col(Subscriptions::UserId)
                    .to_owned(),
            )
            .await?;

        // Total cost by service over a window
        manager
            .create_index(
                Index::create()
                    .name("idx_subscriptions_service_start")
                    .table(Subscriptions::Table)
                    .col(Subscriptions::ServiceName)
                    .col(Subscriptions::StartDate)
                    .to_owned(),
            )
            .await?;

        // Listing order
        manager
            .create_index(
                Index::create()
                    .name("idx_subscriptions_created_at")
                    .table(Subscriptions::Table)
                    .col(Subscriptions::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_subscriptions_user_id").table(Subscriptions::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_subscriptions_service_start").table(Subscriptions::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_subscriptions_created_at").table(Subscriptions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Subscriptions { Table, UserId, ServiceName, StartDate, CreatedAt }
