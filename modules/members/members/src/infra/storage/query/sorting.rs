//! Ordering and paging.

use querystudy_db::{FetchExt, PageRequest, QueryResults, Result};
use sea_orm::sea_query::NullOrdering;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, Order, QueryFilter, QueryOrder, QuerySelect,
};

use crate::infra::storage::entity::member;

/// Members of the given age, by age descending then username ascending with
/// unnamed members last.
///
/// # Errors
/// Returns a database error if the query fails.
pub async fn sort_by_age_desc_username_asc_nulls_last<C>(
    conn: &C,
    age: i32,
) -> Result<Vec<member::Model>>
where
    C: ConnectionTrait,
{
    member::Entity::find()
        .filter(member::Column::Age.eq(age))
        .order_by_desc(member::Column::Age)
        .order_by_with_nulls(member::Column::Username, Order::Asc, NullOrdering::Last)
        .fetch(conn)
        .await
}

/// One window of members ordered by username descending, content only.
///
/// # Errors
/// Returns a database error if the query fails.
pub async fn page_by_username_desc<C>(
    conn: &C,
    offset: u64,
    limit: u64,
) -> Result<Vec<member::Model>>
where
    C: ConnectionTrait,
{
    member::Entity::find()
        .order_by_desc(member::Column::Username)
        .offset(offset)
        .limit(limit)
        .fetch(conn)
        .await
}

/// Same window as [`page_by_username_desc`] plus the unpaged total.
///
/// # Errors
/// Returns a database error if either the count or the content query fails.
pub async fn page_results_by_username_desc<C>(
    conn: &C,
    offset: u64,
    limit: u64,
) -> Result<QueryResults<member::Model>>
where
    C: ConnectionTrait,
{
    member::Entity::find()
        .order_by_desc(member::Column::Username)
        .fetch_results(conn, PageRequest::new(offset, limit))
        .await
}
