use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Blog;
use crate::query::{FieldValue, Record};

/// Blog post entity - always belongs to exactly one blog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: Uuid,
    pub blog_id: Uuid,
    pub title: String,
    pub body: String,
    pub is_publish: bool,
    pub tags: Vec<String>,
    /// Owning blog, present when the relation was loaded.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub blog: Option<Blog>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl BlogPost {
    /// Create a new post in `blog_id`.
    pub fn new(
        blog_id: Uuid,
        title: String,
        body: String,
        is_publish: bool,
        tags: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            blog_id,
            title,
            body,
            is_publish,
            tags: normalize_tags(tags),
            blog: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Author of the owning blog, if the relation is loaded.
    pub fn author_id(&self) -> Option<Uuid> {
        self.blog.as_ref().map(|b| b.author_id)
    }
}

/// Tags form a set: trim, drop empties and duplicates, keep first-seen order.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlogPostField {
    Id,
    BlogId,
    Title,
    Body,
    IsPublish,
    Tags,
    CreatedAt,
    UpdatedAt,
}

impl fmt::Display for BlogPostField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BlogPostField::Id => "id",
            BlogPostField::BlogId => "blog_id",
            BlogPostField::Title => "title",
            BlogPostField::Body => "body",
            BlogPostField::IsPublish => "is_publish",
            BlogPostField::Tags => "tags",
            BlogPostField::CreatedAt => "created_at",
            BlogPostField::UpdatedAt => "updated_at",
        })
    }
}

impl Record for BlogPost {
    type Field = BlogPostField;

    const ENTITY: &'static str = "BlogPost";
    const ID: BlogPostField = BlogPostField::Id;
    const CREATED_AT: BlogPostField = BlogPostField::CreatedAt;

    fn id(&self) -> Uuid {
        self.id
    }

    fn field(&self, field: BlogPostField) -> FieldValue {
        match field {
            BlogPostField::Id => FieldValue::Uuid(self.id),
            BlogPostField::BlogId => FieldValue::Uuid(self.blog_id),
            BlogPostField::Title => FieldValue::Text(self.title.clone()),
            BlogPostField::Body => FieldValue::Text(self.body.clone()),
            BlogPostField::IsPublish => FieldValue::Bool(self.is_publish),
            BlogPostField::Tags => FieldValue::TextList(self.tags.clone()),
            BlogPostField::CreatedAt => FieldValue::Timestamp(self.created_at),
            BlogPostField::UpdatedAt => FieldValue::Timestamp(self.updated_at),
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
