use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Role, User, UserField};
use crate::error::DomainError;
use crate::ports::UserRepository;
use crate::query::{FindOptions, Predicate, Value, by_id};
use crate::services::BaseService;

/// Request to create a user account.
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
    pub role: Role,
}

#[derive(Clone)]
pub struct UserService {
    users: BaseService<User>,
}

impl UserService {
    pub fn new(repo: Arc<UserRepository>) -> Self {
        Self {
            users: BaseService::new(repo),
        }
    }

    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        let email = request.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::Validation("Invalid email address".to_string()));
        }

        let existing = FindOptions::new()
            .and(Predicate::Eq(UserField::Email, Value::Text(email.clone())))
            .with_deleted();
        if self.users.find_one(&existing).await?.is_some() {
            return Err(DomainError::Duplicate("Email already registered".to_string()));
        }

        let user = self
            .users
            .create(User::new(email, request.name, request.role))
            .await?;
        tracing::info!(user_id = %user.id, role = %user.role, "User created");
        Ok(user)
    }

    /// Self-service sign-up. The first account becomes a moderator; every
    /// later one starts as a regular user.
    pub async fn register(&self, email: String, name: String) -> Result<User, DomainError> {
        let moderators = FindOptions::new().and(Predicate::Eq(
            UserField::Role,
            Value::Text(Role::Moderator.as_str().to_string()),
        ));
        let role = match self.users.find_one(&moderators).await? {
            Some(_) => Role::Regular,
            None => {
                tracing::info!("No moderator yet, first account gets the role");
                Role::Moderator
            }
        };

        self.create_user(CreateUserRequest { email, name, role }).await
    }

    pub async fn update_role(&self, id: Uuid, role: Role) -> Result<User, DomainError> {
        let mut user = self.get_user(id).await?;
        user.role = role;
        self.users.update(user).await?;
        tracing::info!(user_id = %id, role = %role, "User role changed");
        self.get_user(id).await
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, DomainError> {
        self.users.find_one_or_fail(&by_id::<User>(id)).await
    }

    /// Batch lookup; missing ids are simply absent from the result.
    pub async fn get_users(&self, ids: &[Uuid]) -> Result<Vec<User>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let options = FindOptions::new().and(Predicate::In(
            UserField::Id,
            ids.iter().copied().map(Value::Uuid).collect(),
        ));
        let (users, _) = self.users.find_and_count(&options).await?;
        Ok(users)
    }
}
