use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .text()
                            .not_null()
                            .default("regular"),
                    )
                    .col(timestamp(Users::CreatedAt))
                    .col(timestamp(Users::UpdatedAt))
                    .col(ColumnDef::new(Users::DeletedAt).timestamp_with_time_zone().null())
                    .to_owned(),
            )
            .await?;

        manager.create_table(blogs_table()).await?;

        manager.create_table(blog_posts_table()).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_blogs_author_id")
                    .table(Blogs::Table)
                    .col(Blogs::AuthorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_blog_posts_blog_id")
                    .table(BlogPosts::Table)
                    .col(BlogPosts::BlogId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BlogPosts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Blogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

/// A user who still owns blogs cannot be hard-deleted.
fn blogs_table() -> TableCreateStatement {
    Table::create()
        .table(Blogs::Table)
        .if_not_exists()
        .col(ColumnDef::new(Blogs::Id).uuid().not_null().primary_key())
        .col(ColumnDef::new(Blogs::AuthorId).uuid().not_null())
        .col(ColumnDef::new(Blogs::Title).string().not_null())
        .col(ColumnDef::new(Blogs::Description).text().null())
        .col(timestamp(Blogs::CreatedAt))
        .col(timestamp(Blogs::UpdatedAt))
        .col(ColumnDef::new(Blogs::DeletedAt).timestamp_with_time_zone().null())
        .foreign_key(
            ForeignKey::create()
                .name("fk_blogs_author")
                .from(Blogs::Table, Blogs::AuthorId)
                .to(Users::Table, Users::Id)
                .on_update(ForeignKeyAction::Cascade)
                .on_delete(ForeignKeyAction::Restrict),
        )
        .to_owned()
}

fn blog_posts_table() -> TableCreateStatement {
    Table::create()
        .table(BlogPosts::Table)
        .if_not_exists()
        .col(ColumnDef::new(BlogPosts::Id).uuid().not_null().primary_key())
        .col(ColumnDef::new(BlogPosts::BlogId).uuid().not_null())
        .col(ColumnDef::new(BlogPosts::Title).string().not_null())
        .col(ColumnDef::new(BlogPosts::Body).text().not_null())
        .col(
            ColumnDef::new(BlogPosts::IsPublish)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(
            ColumnDef::new(BlogPosts::Tags)
                .array(ColumnType::Text)
                .not_null()
                .default(Expr::cust("'{}'")),
        )
        .col(timestamp(BlogPosts::CreatedAt))
        .col(timestamp(BlogPosts::UpdatedAt))
        .col(
            ColumnDef::new(BlogPosts::DeletedAt)
                .timestamp_with_time_zone()
                .null(),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_blog_posts_blog")
                .from(BlogPosts::Table, BlogPosts::BlogId)
                .to(Blogs::Table, Blogs::Id)
                .on_update(ForeignKeyAction::Cascade)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

fn timestamp<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    Name,
    Role,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Blogs {
    Table,
    Id,
    AuthorId,
    Title,
    Description,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum BlogPosts {
    Table,
    Id,
    BlogId,
    Title,
    Body,
    IsPublish,
    Tags,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
