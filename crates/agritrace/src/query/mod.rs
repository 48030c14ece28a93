//! Generic listing helpers shared by every service: page arithmetic,
//! validated sorting and filtering, and response shaping.

pub mod page;
pub mod select;
pub mod shape;

pub use page::{total_pages, PageRequest, PageResult, SortDirection, MAX_PAGE_SIZE};
pub use select::{filter_eq, filter_like, order, page_with_order, paginate, NamedColumns};
pub use shape::{render_datetime, render_datetime_opt, transform, transform_one, DATETIME_FORMAT};

use thiserror::Error;

/// Failures raised while building or executing a listing query.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Unknown sort or filter field '{field}'")]
    UnknownField { field: String },

    #[error("Invalid page request: {message}")]
    InvalidPage { message: String },

    #[error("Query execution failed: {0}")]
    Database(#[from] sea_orm::DbErr),
}
