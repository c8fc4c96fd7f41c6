use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::query::{FieldValue, Record};

/// Blog entity - a collection of posts owned by exactly one author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blog {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Blog {
    /// Create a new blog owned by `author_id`.
    pub fn new(author_id: Uuid, title: String, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            description,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlogField {
    Id,
    AuthorId,
    Title,
    Description,
    CreatedAt,
    UpdatedAt,
}

impl fmt::Display for BlogField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BlogField::Id => "id",
            BlogField::AuthorId => "author_id",
            BlogField::Title => "title",
            BlogField::Description => "description",
            BlogField::CreatedAt => "created_at",
            BlogField::UpdatedAt => "updated_at",
        })
    }
}

impl Record for Blog {
    type Field = BlogField;

    const ENTITY: &'static str = "Blog";
    const ID: BlogField = BlogField::Id;
    const CREATED_AT: BlogField = BlogField::CreatedAt;

    fn id(&self) -> Uuid {
        self.id
    }

    fn field(&self, field: BlogField) -> FieldValue {
        match field {
            BlogField::Id => FieldValue::Uuid(self.id),
            BlogField::AuthorId => FieldValue::Uuid(self.author_id),
            BlogField::Title => FieldValue::Text(self.title.clone()),
            BlogField::Description => self.description.clone().into(),
            BlogField::CreatedAt => FieldValue::Timestamp(self.created_at),
            BlogField::UpdatedAt => FieldValue::Timestamp(self.updated_at),
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
