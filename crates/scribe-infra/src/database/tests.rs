use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, QueryTrait};
use uuid::Uuid;

use scribe_core::domain::{BlogPost, BlogPostField, User};
use scribe_core::error::RepoError;
use scribe_core::ports::BaseRepository;
use scribe_core::query::{FindOptions, Predicate, SortOrder, Value, by_id};

use crate::database::entity::{blog, blog_post};
use crate::database::postgres_base::PostgresBaseRepository;
use crate::database::postgres_repo::{PostgresBlogPostRepository, PostgresUserRepository};

fn post_model(id: Uuid, blog_id: Uuid) -> blog_post::Model {
    let now = Utc::now();
    blog_post::Model {
        id,
        blog_id,
        title: "Test Post".to_owned(),
        body: "Content".to_owned(),
        is_publish: true,
        tags: vec!["rust".to_owned()],
        created_at: now.into(),
        updated_at: now.into(),
        deleted_at: None,
    }
}

fn blog_model(id: Uuid, author_id: Uuid) -> blog::Model {
    let now = Utc::now();
    blog::Model {
        id,
        author_id,
        title: "Test Blog".to_owned(),
        description: None,
        created_at: now.into(),
        updated_at: now.into(),
        deleted_at: None,
    }
}

fn post_sql(options: &FindOptions<BlogPostField>) -> String {
    type Repo = PostgresBaseRepository<blog_post::Entity>;
    Repo::paged(Repo::select(options), options)
        .build(DatabaseBackend::Postgres)
        .to_string()
}

#[tokio::test]
async fn test_find_post_by_id() {
    let post_id = Uuid::new_v4();
    let blog_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(post_id, blog_id)]])
        .into_connection();

    let repo = PostgresBlogPostRepository::new(db);

    let result: Option<BlogPost> = repo.find_one(&by_id::<BlogPost>(post_id)).await.unwrap();

    let post = result.unwrap();
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.id, post_id);
    assert_eq!(post.tags, vec!["rust".to_string()]);
    assert!(post.blog.is_none());
}

#[tokio::test]
async fn test_find_post_with_relations_attaches_blog() {
    let post_id = Uuid::new_v4();
    let blog_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(post_id, blog_id)]])
        .append_query_results(vec![vec![blog_model(blog_id, author_id)]])
        .into_connection();

    let repo = PostgresBlogPostRepository::new(db);
    let post = repo
        .find_one(&by_id::<BlogPost>(post_id).with_relations())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(post.author_id(), Some(author_id));
}

#[tokio::test]
async fn test_find_missing_user_returns_none() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<crate::database::entity::user::Model>::new()])
        .into_connection();

    let repo = PostgresUserRepository::new(db);
    let result = repo.find_one(&by_id::<User>(Uuid::new_v4())).await.unwrap();

    assert!(result.is_none());
}

#[tokio::test]
async fn test_hard_delete_reports_rows_affected() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();

    let repo = PostgresBlogPostRepository::new(db);
    let affected = repo
        .hard_delete(&by_id::<BlogPost>(Uuid::new_v4()).filter)
        .await
        .unwrap();

    assert_eq!(affected, 1);
}

#[tokio::test]
async fn test_update_missing_row_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<blog_post::Model>::new()])
        .into_connection();

    let repo = PostgresBlogPostRepository::new(db);
    let post = BlogPost::new(Uuid::new_v4(), "t".into(), "b".into(), false, vec![]);

    let result = repo.update(post).await;
    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[test]
fn test_select_hides_soft_deleted_rows() {
    let sql = post_sql(&FindOptions::new());
    assert!(sql.contains(r#""deleted_at" IS NULL"#), "{sql}");

    let sql = post_sql(&FindOptions::new().with_deleted());
    assert!(!sql.contains("IS NULL"), "{sql}");
}

#[test]
fn test_select_translates_filters() {
    let options = FindOptions::new()
        .and(Predicate::Eq(BlogPostField::IsPublish, Value::Bool(true)))
        .and(Predicate::ILike(BlogPostField::Title, "rust".to_string()))
        .and(Predicate::Has(BlogPostField::Tags, "async".to_string()));
    let sql = post_sql(&options);

    assert!(sql.contains(r#""is_publish" = TRUE"#), "{sql}");
    assert!(sql.contains(r#""blog_posts"."title" ILIKE '%rust%'"#), "{sql}");
    assert!(sql.contains(r#"'async' = ANY("blog_posts"."tags")"#), "{sql}");
}

#[test]
fn test_select_orders_and_paginates() {
    let sql = post_sql(&FindOptions::new());
    assert!(
        sql.contains(r#"ORDER BY "blog_posts"."created_at" ASC, "blog_posts"."id" ASC"#),
        "{sql}"
    );

    let options = FindOptions::new()
        .order_by(BlogPostField::Title, SortOrder::Desc)
        .skip(Some(20))
        .take(Some(10));
    let sql = post_sql(&options);
    assert!(
        sql.contains(r#"ORDER BY "blog_posts"."title" DESC, "blog_posts"."id" ASC"#),
        "{sql}"
    );
    assert!(sql.contains("LIMIT 10"), "{sql}");
    assert!(sql.contains("OFFSET 20"), "{sql}");
}

#[test]
fn test_like_pattern_escapes_wildcards() {
    use crate::database::postgres_base::like_pattern;

    assert_eq!(like_pattern("rust"), "%rust%");
    assert_eq!(like_pattern("50%_off"), r"%50\%\_off%");
}
