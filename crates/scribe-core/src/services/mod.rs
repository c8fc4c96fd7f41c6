//! Domain services - ownership rules and query composition on top of the
//! repository ports.

mod base;
mod blog;
mod blog_post;
pub mod listing;
mod user;

#[cfg(test)]
mod testing;

pub use base::BaseService;
pub use blog::{BlogFilter, BlogQuery, BlogService, BlogsResponse, CreateBlogRequest, UpdateBlogRequest};
pub use blog_post::{
    BlogPostFilter, BlogPostQuery, BlogPostService, BlogPostsResponse, CreateBlogPostRequest,
    UpdateBlogPostRequest,
};
pub use listing::{FilteringPaginationSorting, ListResponse, Pagination, Sorting};
pub use user::{CreateUserRequest, UserService};
