//! Filtering, pagination and sorting inputs shared by list operations.

use crate::query::{FindOptions, SortOrder};

/// Offset pagination. Absent fields mean "no constraint".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

/// Single-field sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sorting<F> {
    pub field: Option<F>,
    pub order: Option<SortOrder>,
}

impl<F> Default for Sorting<F> {
    fn default() -> Self {
        Self {
            field: None,
            order: None,
        }
    }
}

/// Filter, pagination and sorting for a list query. Every part is optional.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteringPaginationSorting<Filter, F> {
    pub filter: Option<Filter>,
    pub pagination: Option<Pagination>,
    pub sorting: Option<Sorting<F>>,
}

impl<Filter, F> Default for FilteringPaginationSorting<Filter, F> {
    fn default() -> Self {
        Self {
            filter: None,
            pagination: None,
            sorting: None,
        }
    }
}

impl<Filter, F: Copy> FilteringPaginationSorting<Filter, F> {
    /// Layer pagination and sorting onto filter options.
    ///
    /// A sorting without a field leaves the repository's default order; a
    /// field without an order sorts ascending.
    pub fn paged(&self, options: FindOptions<F>) -> FindOptions<F> {
        let pagination = self.pagination.unwrap_or_default();
        let options = options.skip(pagination.offset).take(pagination.limit);

        match self.sorting.and_then(|s| s.field.map(|f| (f, s.order.unwrap_or_default()))) {
            Some((field, order)) => options.order_by(field, order),
            None => options,
        }
    }
}

/// One page of results, the total ignoring pagination, and an echo of the
/// options that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ListResponse<T, Filter, F> {
    pub results: Vec<T>,
    pub total: u64,
    pub options: FilteringPaginationSorting<Filter, F>,
}

/// Treat empty strings as an absent filter value.
pub(crate) fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.is_empty()).map(str::to_string)
}
