use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::query::{FieldValue, Record};

/// User role. Determines authorization outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Regular,
    Writer,
    Moderator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Regular => "regular",
            Role::Writer => "writer",
            Role::Moderator => "moderator",
        }
    }

    /// Whether this role meets `required`. Moderators meet every requirement.
    pub fn satisfies(&self, required: Role) -> bool {
        match (self, required) {
            (Role::Moderator, _) => true,
            (Role::Writer, Role::Writer | Role::Regular) => true,
            (Role::Regular, Role::Regular) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "regular" | "user" => Ok(Role::Regular),
            "writer" => Ok(Role::Writer),
            "moderator" => Ok(Role::Moderator),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// User entity - represents an account in the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(email: String, name: String, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            name,
            role,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_moderator(&self) -> bool {
        self.role == Role::Moderator
    }

    /// Ownership check: moderators may modify anything, everyone else only
    /// what they own.
    pub fn may_modify(&self, owner_id: Uuid) -> bool {
        self.is_moderator() || self.id == owner_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserField {
    Id,
    Email,
    Name,
    Role,
    CreatedAt,
    UpdatedAt,
}

impl fmt::Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UserField::Id => "id",
            UserField::Email => "email",
            UserField::Name => "name",
            UserField::Role => "role",
            UserField::CreatedAt => "created_at",
            UserField::UpdatedAt => "updated_at",
        })
    }
}

impl Record for User {
    type Field = UserField;

    const ENTITY: &'static str = "User";
    const ID: UserField = UserField::Id;
    const CREATED_AT: UserField = UserField::CreatedAt;

    fn id(&self) -> Uuid {
        self.id
    }

    fn field(&self, field: UserField) -> FieldValue {
        match field {
            UserField::Id => FieldValue::Uuid(self.id),
            UserField::Email => FieldValue::Text(self.email.clone()),
            UserField::Name => FieldValue::Text(self.name.clone()),
            UserField::Role => FieldValue::Text(self.role.as_str().to_string()),
            UserField::CreatedAt => FieldValue::Timestamp(self.created_at),
            UserField::UpdatedAt => FieldValue::Timestamp(self.updated_at),
        }
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    fn set_deleted_at(&mut self, at: Option<DateTime<Utc>>) {
        self.deleted_at = at;
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moderator_satisfies_every_role() {
        assert!(Role::Moderator.satisfies(Role::Writer));
        assert!(Role::Moderator.satisfies(Role::Regular));
        assert!(Role::Writer.satisfies(Role::Writer));
        assert!(!Role::Regular.satisfies(Role::Writer));
        assert!(!Role::Writer.satisfies(Role::Moderator));
    }

    #[test]
    fn test_may_modify() {
        let owner = User::new("a@x.io".into(), "A".into(), Role::Writer);
        let other = User::new("b@x.io".into(), "B".into(), Role::Writer);
        let moderator = User::new("m@x.io".into(), "M".into(), Role::Moderator);

        assert!(owner.may_modify(owner.id));
        assert!(!other.may_modify(owner.id));
        assert!(moderator.may_modify(owner.id));
    }

    #[test]
    fn test_role_parses_case_insensitively() {
        assert_eq!("WRITER".parse::<Role>().unwrap(), Role::Writer);
        assert_eq!("Moderator".parse::<Role>().unwrap(), Role::Moderator);
        assert!("admin".parse::<Role>().is_err());
    }
}
