//! GraphQL schema: the single public API surface for blogs and posts.

mod blog;
mod blog_post;
pub mod gate;
mod loaders;
mod types;
mod user;

use async_graphql::dataloader::DataLoader;
use async_graphql::{EmptySubscription, MergedObject, Schema};

use crate::state::AppState;

pub use loaders::AuthorLoader;

#[derive(MergedObject, Default)]
pub struct QueryRoot(blog::BlogQueries, blog_post::BlogPostQueries, user::UserQueries);

#[derive(MergedObject, Default)]
pub struct MutationRoot(
    blog::BlogMutations,
    blog_post::BlogPostMutations,
    user::UserMutations,
);

pub type ScribeSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the schema with the services every resolver reads from context.
pub fn build_schema(state: &AppState) -> ScribeSchema {
    Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .data(state.users.clone())
        .data(state.blogs.clone())
        .data(state.posts.clone())
        .data(DataLoader::new(
            AuthorLoader::new(state.users.clone()),
            tokio::spawn,
        ))
        .finish()
}
