//! Validated query building over SeaORM selects.
//!
//! Callers address columns by plain field name; every name is checked
//! against the entity's allow-list before it touches SQL, so an unknown
//! name fails fast instead of leaking into the statement.

use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select,
};

use super::page::{PageRequest, PageResult, SortDirection};
use super::shape::transform;
use super::QueryError;

/// Maps caller-facing field names onto entity columns.
///
/// Implemented per entity next to its model definition. Only the names
/// returned here are sortable and filterable from the outside.
pub trait NamedColumns: EntityTrait {
    /// Resolves a field name to a column, or `None` if the entity does
    /// not expose it.
    fn column_for(field: &str) -> Option<Self::Column>;
}

/// Applies `ORDER BY` for a named field, validating the name first.
pub fn order<E: NamedColumns>(
    select: Select<E>,
    field: &str,
    direction: SortDirection,
) -> Result<Select<E>, QueryError> {
    let column = E::column_for(field).ok_or_else(|| QueryError::UnknownField {
        field: field.to_string(),
    })?;
    let applied = match direction {
        SortDirection::Asc => select.order_by(column, Order::Asc),
        SortDirection::Desc => select.order_by(column, Order::Desc),
    };
    Ok(applied)
}

/// Applies `LIMIT`/`OFFSET` for a one-based page.
///
/// Bounds are not checked here; `PageRequest::validate` is the
/// gatekeeper for page arithmetic.
pub fn paginate<E: EntityTrait>(select: Select<E>, page: u64, page_size: u64) -> Select<E> {
    select
        .offset(page.saturating_sub(1) * page_size)
        .limit(page_size)
}

/// Adds equality predicates for named fields, validating every name.
pub fn filter_eq<E: NamedColumns>(
    mut select: Select<E>,
    fields: &[(&str, &str)],
) -> Result<Select<E>, QueryError> {
    for (field, value) in fields {
        let column = E::column_for(field).ok_or_else(|| QueryError::UnknownField {
            field: field.to_string(),
        })?;
        select = select.filter(column.eq(*value));
    }
    Ok(select)
}

/// Adds substring (`LIKE %value%`) predicates for named fields,
/// validating every name.
pub fn filter_like<E: NamedColumns>(
    mut select: Select<E>,
    fields: &[(&str, &str)],
) -> Result<Select<E>, QueryError> {
    for (field, value) in fields {
        let column = E::column_for(field).ok_or_else(|| QueryError::UnknownField {
            field: field.to_string(),
        })?;
        select = select.filter(column.contains(*value));
    }
    Ok(select)
}

/// Runs the standard listing sequence for a prepared select: validate
/// the request, resolve the sort field, count the unfiltered total over
/// the same predicates, fetch one ordered page, and shape the rows.
///
/// The count runs without ordering or limits so `total` reflects every
/// matching row. An invalid page or unknown sort field fails before any
/// statement is executed.
pub async fn page_with_order<E, V, C>(
    db: &C,
    select: Select<E>,
    request: &PageRequest,
) -> Result<PageResult<V>, QueryError>
where
    E: NamedColumns,
    E::Model: Send + Sync + 'static,
    V: From<E::Model>,
    C: ConnectionTrait,
{
    request.validate()?;
    let ordered = order(select.clone(), &request.sort_field, request.direction)?;

    let total = select.count(db).await?;
    let rows = paginate(ordered, request.page, request.page_size)
        .all(db)
        .await?;

    Ok(PageResult::assemble(transform(rows), total, request))
}
