use async_graphql::{Context, Object, Result};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use scribe_core::domain::User;
use scribe_core::services::UserService;

use super::gate::Gate;
use super::types::RoleType;
use crate::middleware::error::GraphqlResultExt;

pub struct UserObject(pub User);

#[Object(name = "User")]
impl UserObject {
    async fn id(&self) -> Uuid {
        self.0.id
    }

    async fn email(&self) -> &str {
        &self.0.email
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn role(&self) -> RoleType {
        self.0.role.into()
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }
}

#[derive(Default)]
pub struct UserQueries;

#[Object]
impl UserQueries {
    /// The user named by the bearer token.
    async fn me(&self, ctx: &Context<'_>) -> Result<UserObject> {
        Gate::user(ctx, "me").await.map(UserObject).gql()
    }
}

#[derive(Default)]
pub struct UserMutations;

#[Object]
impl UserMutations {
    async fn update_user_role(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        role: RoleType,
    ) -> Result<UserObject> {
        Gate::admit(ctx, "updateUserRole").await.gql()?;
        let users = ctx.data_unchecked::<UserService>();

        users.update_role(id, role.into()).await.map(UserObject).gql()
    }
}
