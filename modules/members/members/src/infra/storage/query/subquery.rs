//! Subqueries in `WHERE` and in the select list.
//!
//! The inner query reads `member` under the alias `member_sub` so it never
//! binds to the outer row.

use members_sdk::MemberAverageAge;
use querystudy_db::{FetchExt, Result};
use sea_orm::sea_query::{Alias, Expr, Func, Query, SelectStatement, SimpleExpr};
use sea_orm::{ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use super::avg_as_double;
use super::rows::MemberAverageAgeRow;
use crate::infra::storage::entity::member;

fn member_sub() -> Alias {
    Alias::new("member_sub")
}

fn sub_age() -> Expr {
    Expr::col((member_sub(), member::Column::Age))
}

fn outer_age() -> Expr {
    Expr::col((member::Entity, member::Column::Age))
}

/// `SELECT <expr> FROM member AS member_sub`
fn over_member_sub(expr: impl Into<SimpleExpr>) -> SelectStatement {
    Query::select()
        .expr(expr)
        .from_as(member::Entity, member_sub())
        .to_owned()
}

pub(crate) fn scalar(sel: SelectStatement) -> SimpleExpr {
    SimpleExpr::SubQuery(None, Box::new(sel.into_sub_query_statement()))
}

/// `(SELECT MAX(age) FROM member member_sub)`
pub(crate) fn max_age_subquery() -> SimpleExpr {
    scalar(over_member_sub(Func::max(sub_age())))
}

/// Members whose age equals the maximum age.
///
/// # Errors
/// Returns a database error if the query fails.
pub async fn oldest_members<C>(conn: &C) -> Result<Vec<member::Model>>
where
    C: ConnectionTrait,
{
    member::Entity::find()
        .filter(outer_age().eq(max_age_subquery()))
        .order_by_asc(member::Column::Id)
        .fetch(conn)
        .await
}

/// Members at or above the average age.
///
/// # Errors
/// Returns a database error if the query fails.
pub async fn members_at_least_average_age<C>(conn: &C) -> Result<Vec<member::Model>>
where
    C: ConnectionTrait,
{
    let avg = scalar(over_member_sub(Func::avg(sub_age())));
    member::Entity::find()
        .filter(outer_age().gte(avg))
        .order_by_asc(member::Column::Id)
        .fetch(conn)
        .await
}

/// `age IN (SELECT age FROM member member_sub WHERE age > ?)`
///
/// # Errors
/// Returns a database error if the query fails.
pub async fn members_with_age_in_older_than<C>(conn: &C, age: i32) -> Result<Vec<member::Model>>
where
    C: ConnectionTrait,
{
    let ages = over_member_sub(sub_age())
        .and_where(sub_age().gt(age))
        .to_owned();
    member::Entity::find()
        .filter(outer_age().in_subquery(ages))
        .order_by_asc(member::Column::Id)
        .fetch(conn)
        .await
}

/// Each username next to the overall average age, computed by a scalar
/// subquery in the select list.
///
/// # Errors
/// Returns a database error if the query fails.
pub async fn usernames_with_average_age<C>(conn: &C) -> Result<Vec<MemberAverageAge>>
where
    C: ConnectionTrait,
{
    let avg = scalar(over_member_sub(avg_as_double(sub_age())));
    let rows = member::Entity::find()
        .select_only()
        .column(member::Column::Username)
        .expr_as(avg, "avg_age")
        .order_by_asc(member::Column::Id)
        .into_model::<MemberAverageAgeRow>()
        .all(conn)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}
