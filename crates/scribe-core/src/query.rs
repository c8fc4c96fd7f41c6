//! Query model shared by every repository.
//!
//! Services describe *what* they want as [`FindOptions`]; repositories decide
//! how to run it (SQL for Postgres, [`apply`] for the in-memory store). Both
//! paths must agree: predicates are AND-combined, soft-deleted records are
//! excluded unless `with_deleted` is set, and `total` is counted before
//! `skip`/`take` are applied.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// A literal compared against a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Uuid(Uuid),
    Bool(bool),
    Text(String),
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Uuid(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "'{}'", v),
        }
    }
}

/// A field read off a record, used for in-memory evaluation and sorting.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Uuid(Uuid),
    Bool(bool),
    Text(String),
    TextList(Vec<String>),
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    fn equals(&self, value: &Value) -> bool {
        match (self, value) {
            (FieldValue::Uuid(a), Value::Uuid(b)) => a == b,
            (FieldValue::Bool(a), Value::Bool(b)) => a == b,
            (FieldValue::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }

    /// Total order within one variant; NULLs sort last like Postgres does for ASC.
    fn compare(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Null, FieldValue::Null) => Ordering::Equal,
            (FieldValue::Null, _) => Ordering::Greater,
            (_, FieldValue::Null) => Ordering::Less,
            (FieldValue::Uuid(a), FieldValue::Uuid(b)) => a.cmp(b),
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a.cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::TextList(a), FieldValue::TextList(b)) => a.cmp(b),
            (FieldValue::Timestamp(a), FieldValue::Timestamp(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl From<Option<String>> for FieldValue {
    fn from(v: Option<String>) -> Self {
        v.map(FieldValue::Text).unwrap_or(FieldValue::Null)
    }
}

/// A single filter condition over field `F`.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate<F> {
    /// Exact match.
    Eq(F, Value),
    /// Matches any of the listed values.
    In(F, Vec<Value>),
    /// Case-insensitive substring match on a text field.
    ILike(F, String),
    /// A text-list field contains the element.
    Has(F, String),
}

impl<F: Copy> Predicate<F> {
    pub fn field(&self) -> F {
        match self {
            Predicate::Eq(f, _) | Predicate::In(f, _) | Predicate::ILike(f, _) | Predicate::Has(f, _) => *f,
        }
    }

    /// Evaluate against an in-memory record.
    pub fn matches<T: Record<Field = F>>(&self, record: &T) -> bool {
        let actual = record.field(self.field());
        match self {
            Predicate::Eq(_, value) => actual.equals(value),
            Predicate::In(_, values) => values.iter().any(|v| actual.equals(v)),
            Predicate::ILike(_, needle) => match actual {
                FieldValue::Text(text) => text.to_lowercase().contains(&needle.to_lowercase()),
                _ => false,
            },
            Predicate::Has(_, item) => match actual {
                FieldValue::TextList(items) => items.iter().any(|i| i == item),
                _ => false,
            },
        }
    }
}

impl<F: fmt::Display> fmt::Display for Predicate<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Eq(field, value) => write!(f, "{} = {}", field, value),
            Predicate::In(field, values) => {
                let list: Vec<String> = values.iter().map(ToString::to_string).collect();
                write!(f, "{} in ({})", field, list.join(", "))
            }
            Predicate::ILike(field, needle) => write!(f, "{} ilike '%{}%'", field, needle),
            Predicate::Has(field, item) => write!(f, "'{}' in {}", item, field),
        }
    }
}

/// Find options: filter, pagination, ordering, relation loading.
#[derive(Debug, Clone, PartialEq)]
pub struct FindOptions<F> {
    pub filter: Vec<Predicate<F>>,
    pub skip: Option<u64>,
    pub take: Option<u64>,
    pub order: Option<(F, SortOrder)>,
    /// Eagerly hydrate the entity's owning relation.
    pub relations: bool,
    /// Include soft-deleted records.
    pub with_deleted: bool,
}

impl<F> Default for FindOptions<F> {
    fn default() -> Self {
        Self {
            filter: Vec::new(),
            skip: None,
            take: None,
            order: None,
            relations: false,
            with_deleted: false,
        }
    }
}

impl<F> FindOptions<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, predicate: Predicate<F>) -> Self {
        self.filter.push(predicate);
        self
    }

    pub fn and_maybe(mut self, predicate: Option<Predicate<F>>) -> Self {
        self.filter.extend(predicate);
        self
    }

    pub fn skip(mut self, skip: Option<u64>) -> Self {
        self.skip = skip;
        self
    }

    pub fn take(mut self, take: Option<u64>) -> Self {
        self.take = take;
        self
    }

    pub fn order_by(mut self, field: F, order: SortOrder) -> Self {
        self.order = Some((field, order));
        self
    }

    pub fn with_relations(mut self) -> Self {
        self.relations = true;
        self
    }

    pub fn with_deleted(mut self) -> Self {
        self.with_deleted = true;
        self
    }
}

impl<F: fmt::Display> FindOptions<F> {
    /// Human-readable lookup used in not-found errors.
    pub fn describe(&self) -> String {
        if self.filter.is_empty() {
            return "any".to_string();
        }
        self.filter
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" and ")
    }
}

/// Implemented by every persisted domain entity.
pub trait Record: Clone + Send + Sync + 'static {
    type Field: Copy + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static;

    /// Entity name used in errors and logs.
    const ENTITY: &'static str;
    const ID: Self::Field;
    /// Default ordering for listings.
    const CREATED_AT: Self::Field;

    fn id(&self) -> Uuid;
    fn field(&self, field: Self::Field) -> FieldValue;
    fn deleted_at(&self) -> Option<DateTime<Utc>>;
    fn set_deleted_at(&mut self, at: Option<DateTime<Utc>>);
    /// Bump `updated_at`.
    fn touch(&mut self);
}

/// Options matching a single record by primary key.
pub fn by_id<T: Record>(id: Uuid) -> FindOptions<T::Field> {
    FindOptions::new().and(Predicate::Eq(T::ID, Value::Uuid(id)))
}

/// Whether `record` passes every predicate and the soft-delete rule.
pub fn matches_all<T: Record>(
    record: &T,
    filter: &[Predicate<T::Field>],
    with_deleted: bool,
) -> bool {
    (with_deleted || record.deleted_at().is_none()) && filter.iter().all(|p| p.matches(record))
}

/// Run `options` over an in-memory collection, returning the page and the
/// total number of matches before pagination.
pub fn apply<T: Record>(
    records: impl IntoIterator<Item = T>,
    options: &FindOptions<T::Field>,
) -> (Vec<T>, u64) {
    let mut matched: Vec<T> = records
        .into_iter()
        .filter(|r| matches_all(r, &options.filter, options.with_deleted))
        .collect();

    let (field, order) = options.order.unwrap_or((T::CREATED_AT, SortOrder::Asc));
    matched.sort_by(|a, b| {
        let ord = a.field(field).compare(&b.field(field));
        let ord = match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        };
        // Same tiebreak as the SQL path.
        ord.then_with(|| a.id().cmp(&b.id()))
    });

    let total = matched.len() as u64;
    let skip = options.skip.unwrap_or(0) as usize;
    let take = options.take.map(|t| t as usize).unwrap_or(usize::MAX);
    let page = matched.into_iter().skip(skip).take(take).collect();

    (page, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BlogPost, BlogPostField};

    fn post(title: &str, tags: &[&str]) -> BlogPost {
        BlogPost::new(
            Uuid::new_v4(),
            title.to_string(),
            "body".to_string(),
            false,
            tags.iter().map(|t| t.to_string()).collect(),
        )
    }

    #[test]
    fn test_ilike_ignores_case_on_both_sides() {
        let p = Predicate::ILike(BlogPostField::Title, "aBc".to_string());
        assert!(p.matches(&post("xxABCxx", &[])));
        assert!(p.matches(&post("abc", &[])));
        assert!(!p.matches(&post("ab c", &[])));
    }

    #[test]
    fn test_has_matches_tag_membership() {
        let p = Predicate::Has(BlogPostField::Tags, "rust".to_string());
        assert!(p.matches(&post("a", &["go", "rust"])));
        assert!(!p.matches(&post("b", &["rusty"])));
        assert!(!p.matches(&post("c", &[])));
    }

    #[test]
    fn test_apply_counts_total_before_pagination() {
        let posts: Vec<BlogPost> = (0..20).map(|i| post(&format!("post {:02}", i), &[])).collect();
        let options = FindOptions::new()
            .order_by(BlogPostField::Title, SortOrder::Asc)
            .skip(Some(10))
            .take(Some(5));

        let (page, total) = apply(posts, &options);

        assert_eq!(total, 20);
        let titles: Vec<&str> = page.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["post 10", "post 11", "post 12", "post 13", "post 14"]);
    }

    #[test]
    fn test_apply_descending_order() {
        let posts = vec![post("b", &[]), post("c", &[]), post("a", &[])];
        let options = FindOptions::new().order_by(BlogPostField::Title, SortOrder::Desc);

        let (page, _) = apply(posts, &options);

        let titles: Vec<&str> = page.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["c", "b", "a"]);
    }

    #[test]
    fn test_apply_breaks_ties_by_id() {
        let posts: Vec<BlogPost> = (0..12).map(|i| post(&format!("same {}", i % 2), &[])).collect();
        let mut ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        ids.sort();

        let mut seen = Vec::new();
        for offset in [0, 5, 10] {
            let options = FindOptions::new()
                .order_by(BlogPostField::IsPublish, SortOrder::Desc)
                .skip(Some(offset))
                .take(Some(5));
            let (page, total) = apply(posts.iter().rev().cloned(), &options);
            assert_eq!(total, 12);
            seen.extend(page.into_iter().map(|p| p.id));
        }

        assert_eq!(seen, ids);
    }

    #[test]
    fn test_apply_hides_soft_deleted_unless_requested() {
        let mut gone = post("gone", &[]);
        gone.set_deleted_at(Some(Utc::now()));
        let posts = vec![post("kept", &[]), gone];

        let (visible, total) = apply(posts.clone(), &FindOptions::new());
        assert_eq!(total, 1);
        assert_eq!(visible[0].title, "kept");

        let (all, total) = apply(posts, &FindOptions::new().with_deleted());
        assert_eq!(total, 2);
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_describe_joins_predicates() {
        let id = Uuid::nil();
        let options = by_id::<BlogPost>(id).and(Predicate::Eq(BlogPostField::IsPublish, true.into()));
        assert_eq!(
            options.describe(),
            format!("id = {} and is_publish = true", id)
        );
    }
}
