//! Input and echo types shared by the list queries.
//!
//! Filter, pagination and sorting structs double as output types so list
//! responses can echo back exactly what the client asked for.

use async_graphql::{Enum, InputObject, SimpleObject};
use uuid::Uuid;

use scribe_core::domain::{BlogField, BlogPostField};
use scribe_core::services::{
    BlogFilter, BlogPostFilter, BlogPostQuery, BlogQuery, Pagination as PageRequest, Sorting,
};

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(name = "Role", remote = "scribe_core::domain::Role")]
pub enum RoleType {
    Regular,
    Writer,
    Moderator,
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(name = "SortOrder", remote = "scribe_core::query::SortOrder")]
pub enum SortOrderType {
    Asc,
    Desc,
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum BlogSortField {
    Title,
    CreatedAt,
    UpdatedAt,
}

impl From<BlogSortField> for BlogField {
    fn from(field: BlogSortField) -> Self {
        match field {
            BlogSortField::Title => BlogField::Title,
            BlogSortField::CreatedAt => BlogField::CreatedAt,
            BlogSortField::UpdatedAt => BlogField::UpdatedAt,
        }
    }
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum PostSortField {
    Title,
    IsPublish,
    CreatedAt,
    UpdatedAt,
}

impl From<PostSortField> for BlogPostField {
    fn from(field: PostSortField) -> Self {
        match field {
            PostSortField::Title => BlogPostField::Title,
            PostSortField::IsPublish => BlogPostField::IsPublish,
            PostSortField::CreatedAt => BlogPostField::CreatedAt,
            PostSortField::UpdatedAt => BlogPostField::UpdatedAt,
        }
    }
}

#[derive(SimpleObject, InputObject, Clone, Copy, Debug, Default)]
#[graphql(input_name = "PaginationInput")]
pub struct Pagination {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl From<Pagination> for PageRequest {
    fn from(p: Pagination) -> Self {
        PageRequest {
            offset: p.offset,
            limit: p.limit,
        }
    }
}

// Blogs

#[derive(SimpleObject, InputObject, Clone, Debug, Default)]
#[graphql(input_name = "BlogFilterInput")]
pub struct BlogListFilter {
    pub id: Option<Uuid>,
    /// Case-insensitive substring of the title.
    pub title: Option<String>,
    pub author_id: Option<Uuid>,
}

#[derive(SimpleObject, InputObject, Clone, Copy, Debug, Default)]
#[graphql(input_name = "BlogSortingInput")]
pub struct BlogSorting {
    pub field: Option<BlogSortField>,
    pub order: Option<SortOrderType>,
}

#[derive(SimpleObject, InputObject, Clone, Debug, Default)]
#[graphql(input_name = "BlogFilteringPaginationSorting")]
pub struct BlogListOptions {
    pub filter: Option<BlogListFilter>,
    pub pagination: Option<Pagination>,
    pub sorting: Option<BlogSorting>,
}

impl From<BlogListOptions> for BlogQuery {
    fn from(options: BlogListOptions) -> Self {
        BlogQuery {
            filter: options.filter.map(|f| BlogFilter {
                id: f.id,
                title: f.title,
                author_id: f.author_id,
            }),
            pagination: options.pagination.map(Into::into),
            sorting: options.sorting.map(|s| Sorting {
                field: s.field.map(Into::into),
                order: s.order.map(Into::into),
            }),
        }
    }
}

// Blog posts

#[derive(SimpleObject, InputObject, Clone, Debug, Default)]
#[graphql(input_name = "BlogPostFilterInput")]
pub struct PostListFilter {
    pub id: Option<Uuid>,
    pub is_publish: Option<bool>,
    /// Case-insensitive substring of the title.
    pub title: Option<String>,
    /// Posts carrying this tag.
    pub tag: Option<String>,
}

#[derive(SimpleObject, InputObject, Clone, Copy, Debug, Default)]
#[graphql(input_name = "BlogPostSortingInput")]
pub struct PostSorting {
    pub field: Option<PostSortField>,
    pub order: Option<SortOrderType>,
}

#[derive(SimpleObject, InputObject, Clone, Debug, Default)]
#[graphql(input_name = "BlogPostFilteringPaginationSorting")]
pub struct PostListOptions {
    pub filter: Option<PostListFilter>,
    pub pagination: Option<Pagination>,
    pub sorting: Option<PostSorting>,
}

impl From<PostListOptions> for BlogPostQuery {
    fn from(options: PostListOptions) -> Self {
        BlogPostQuery {
            filter: options.filter.map(|f| BlogPostFilter {
                id: f.id,
                is_publish: f.is_publish,
                title: f.title,
                tag: f.tag,
            }),
            pagination: options.pagination.map(Into::into),
            sorting: options.sorting.map(|s| Sorting {
                field: s.field.map(Into::into),
                order: s.order.map(Into::into),
            }),
        }
    }
}
