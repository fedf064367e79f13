//! Bulk `UPDATE` and `DELETE`.
//!
//! These statements run straight against the database. Models loaded before
//! the call keep their old values; read them again to see the change.

use querystudy_db::Result;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use tracing::debug;

use crate::infra::storage::entity::member;

/// Sets `username` for every member younger than `age`. Returns the affected row count.
///
/// # Errors
/// Returns a database error if the statement fails.
pub async fn bulk_rename_younger_than<C>(conn: &C, age: i32, new_name: &str) -> Result<u64>
where
    C: ConnectionTrait,
{
    let res = member::Entity::update_many()
        .col_expr(member::Column::Username, Expr::value(new_name))
        .filter(member::Column::Age.lt(age))
        .exec(conn)
        .await?;
    debug!(rows = res.rows_affected, age, "Bulk rename");
    Ok(res.rows_affected)
}

/// Adds `delta` to every member's age. Returns the affected row count.
///
/// # Errors
/// Returns a database error if the statement fails.
pub async fn bulk_add_age<C>(conn: &C, delta: i32) -> Result<u64>
where
    C: ConnectionTrait,
{
    let res = member::Entity::update_many()
        .col_expr(member::Column::Age, Expr::col(member::Column::Age).add(delta))
        .exec(conn)
        .await?;
    debug!(rows = res.rows_affected, delta, "Bulk age update");
    Ok(res.rows_affected)
}

/// Deletes every member older than `age`. Returns the deleted row count.
///
/// # Errors
/// Returns a database error if the statement fails.
pub async fn bulk_delete_older_than<C>(conn: &C, age: i32) -> Result<u64>
where
    C: ConnectionTrait,
{
    let res = member::Entity::delete_many()
        .filter(member::Column::Age.gt(age))
        .exec(conn)
        .await?;
    debug!(rows = res.rows_affected, age, "Bulk delete");
    Ok(res.rows_affected)
}
