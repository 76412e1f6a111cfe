//! Initial migration to create the pagesync database schema.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        self.create_accounts(manager).await?;
        self.create_pages(manager).await?;
        self.create_posts(manager).await?;
        self.create_comments(manager).await?;
        self.create_reactions(manager).await?;
        self.create_reaction_summaries(manager).await?;
        self.create_insights(manager).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            Insights::Table.into_iden(),
            ReactionSummaries::Table.into_iden(),
            Reactions::Table.into_iden(),
            Comments::Table.into_iden(),
            Posts::Table.into_iden(),
            Pages::Table.into_iden(),
            Accounts::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }
        Ok(())
    }
}

impl Migration {
    async fn create_accounts(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Accounts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Accounts::AccessToken).text().not_null())
                    .col(
                        ColumnDef::new(Accounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn create_pages(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Pages::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Pages::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Pages::AccountId).uuid().not_null())
                    .col(ColumnDef::new(Pages::RemotePageId).string().not_null())
                    .col(
                        ColumnDef::new(Pages::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pages_account")
                            .from(Pages::Table, Pages::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pages_account_remote")
                    .table(Pages::Table)
                    .col(Pages::AccountId)
                    .col(Pages::RemotePageId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn create_posts(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Posts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Posts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Posts::PageId).uuid().not_null())
                    .col(ColumnDef::new(Posts::RemotePostId).string().not_null())
                    .col(ColumnDef::new(Posts::Message).text().null())
                    .col(
                        ColumnDef::new(Posts::CreatedTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Posts::SyncedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_posts_page")
                            .from(Posts::Table, Posts::PageId)
                            .to(Pages::Table, Pages::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Natural key: a remote post id is unique within its page.
        manager
            .create_index(
                Index::create()
                    .name("idx_posts_page_remote")
                    .table(Posts::Table)
                    .col(Posts::PageId)
                    .col(Posts::RemotePostId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn create_comments(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Comments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Comments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Comments::PostId).uuid().not_null())
                    .col(
                        ColumnDef::new(Comments::RemoteCommentId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Comments::AuthorRemoteId).string().null())
                    .col(ColumnDef::new(Comments::AuthorName).string().null())
                    .col(ColumnDef::new(Comments::Message).text().null())
                    .col(
                        ColumnDef::new(Comments::CreatedTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Comments::Sentiment).string().not_null())
                    .col(
                        ColumnDef::new(Comments::SyncedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_post")
                            .from(Comments::Table, Comments::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Natural key: a remote comment id is unique within its post.
        manager
            .create_index(
                Index::create()
                    .name("idx_comments_post_remote")
                    .table(Comments::Table)
                    .col(Comments::PostId)
                    .col(Comments::RemoteCommentId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn create_reactions(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reactions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reactions::PostId).uuid().not_null())
                    .col(ColumnDef::new(Reactions::UserRemoteId).string().not_null())
                    .col(ColumnDef::new(Reactions::UserName).string().null())
                    .col(ColumnDef::new(Reactions::ReactionType).string().not_null())
                    .col(ColumnDef::new(Reactions::ProfileType).string().null())
                    .col(
                        ColumnDef::new(Reactions::CreatedTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reactions_post")
                            .from(Reactions::Table, Reactions::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Dedup key lookup; intentionally not unique, the rows are
        // append-only.
        manager
            .create_index(
                Index::create()
                    .name("idx_reactions_post_user_type")
                    .table(Reactions::Table)
                    .col(Reactions::PostId)
                    .col(Reactions::UserRemoteId)
                    .col(Reactions::ReactionType)
                    .to_owned(),
            )
            .await
    }

    async fn create_reaction_summaries(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReactionSummaries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReactionSummaries::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ReactionSummaries::PostId).uuid().not_null())
                    .col(
                        ColumnDef::new(ReactionSummaries::ReactionType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReactionSummaries::ReactionCount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReactionSummaries::CollectedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reaction_summaries_post")
                            .from(ReactionSummaries::Table, ReactionSummaries::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reaction_summaries_post")
                    .table(ReactionSummaries::Table)
                    .col(ReactionSummaries::PostId)
                    .col(ReactionSummaries::CollectedAt)
                    .to_owned(),
            )
            .await
    }

    async fn create_insights(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Insights::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Insights::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Insights::PageId).uuid().not_null())
                    .col(ColumnDef::new(Insights::MetricName).string().not_null())
                    .col(ColumnDef::new(Insights::Period).string().not_null())
                    .col(ColumnDef::new(Insights::Value).big_integer().not_null())
                    .col(
                        ColumnDef::new(Insights::EndTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_insights_page")
                            .from(Insights::Table, Insights::PageId)
                            .to(Pages::Table, Pages::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Query path: per-page metric lookups ordered by end time.
        manager
            .create_index(
                Index::create()
                    .name("idx_insights_page_metric_end")
                    .table(Insights::Table)
                    .col(Insights::PageId)
                    .col(Insights::MetricName)
                    .col(Insights::EndTime)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Id,
    AccessToken,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Pages {
    Table,
    Id,
    AccountId,
    RemotePageId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Posts {
    Table,
    Id,
    PageId,
    RemotePostId,
    Message,
    CreatedTime,
    SyncedAt,
}

#[derive(DeriveIden)]
enum Comments {
    Table,
    Id,
    PostId,
    RemoteCommentId,
    AuthorRemoteId,
    AuthorName,
    Message,
    CreatedTime,
    Sentiment,
    SyncedAt,
}

#[derive(DeriveIden)]
enum Reactions {
    Table,
    Id,
    PostId,
    UserRemoteId,
    UserName,
    ReactionType,
    ProfileType,
    CreatedTime,
}

#[derive(DeriveIden)]
enum ReactionSummaries {
    Table,
    Id,
    PostId,
    ReactionType,
    ReactionCount,
    CollectedAt,
}

#[derive(DeriveIden)]
enum Insights {
    Table,
    Id,
    PageId,
    MetricName,
    Period,
    Value,
    EndTime,
}
