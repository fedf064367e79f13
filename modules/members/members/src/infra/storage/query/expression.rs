//! `CASE`, constants, concatenation and native SQL functions.

use members_sdk::MemberConstant;
use querystudy_db::{FetchExt, Result};
use sea_orm::sea_query::{Alias, BinOper, Expr, Func, SimpleExpr};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

use super::rows::MemberConstantRow;
use crate::infra::storage::entity::member;

fn age() -> Expr {
    Expr::col((member::Entity, member::Column::Age))
}

fn username() -> Expr {
    Expr::col((member::Entity, member::Column::Username))
}

fn concat(left: impl Into<SimpleExpr>, right: impl Into<SimpleExpr>) -> SimpleExpr {
    left.into().binary(BinOper::Custom("||"), right)
}

async fn labels<C>(conn: &C, label: SimpleExpr) -> Result<Vec<String>>
where
    C: ConnectionTrait,
{
    Ok(member::Entity::find()
        .select_only()
        .expr(label)
        .order_by_asc(member::Column::Id)
        .into_tuple::<String>()
        .all(conn)
        .await?)
}

/// `ten`, `twenty` or `other` by exact age. sea-query has no operand form of
/// `CASE`, so this renders `CASE WHEN age = 10 ...` rather than `CASE age WHEN 10 ...`.
fn exact_age_label() -> SimpleExpr {
    Expr::case(age().eq(10), "ten")
        .case(age().eq(20), "twenty")
        .finally("other")
        .into()
}

/// One label per member keyed on the exact age: `ten`, `twenty` or `other`.
///
/// Written as a searched `CASE` with one equality per branch; the result is
/// the same as `CASE age WHEN 10 THEN ... END`.
///
/// # Errors
/// Returns a database error if the query fails.
pub async fn age_labels_simple_case<C>(conn: &C) -> Result<Vec<String>>
where
    C: ConnectionTrait,
{
    labels(conn, exact_age_label()).await
}

/// One label per member keyed on an age range: `0-20`, `21-30` or `other`.
///
/// # Errors
/// Returns a database error if the query fails.
pub async fn age_labels_searched_case<C>(conn: &C) -> Result<Vec<String>>
where
    C: ConnectionTrait,
{
    let label = Expr::case(age().between(0, 20), "0-20")
        .case(age().between(21, 30), "21-30")
        .finally("other");
    labels(conn, label.into()).await
}

/// Each username paired with the same literal.
///
/// # Errors
/// Returns a database error if the query fails.
pub async fn usernames_with_constant<C>(conn: &C, constant: &str) -> Result<Vec<MemberConstant>>
where
    C: ConnectionTrait,
{
    let rows = member::Entity::find()
        .select_only()
        .column(member::Column::Username)
        .expr_as(Expr::val(constant), "constant")
        .order_by_asc(member::Column::Id)
        .into_model::<MemberConstantRow>()
        .all(conn)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// `username || '_' || CAST(age AS TEXT)` for the given member, e.g. `member1_10`.
///
/// # Errors
/// Returns a database error if the query fails.
pub async fn username_age_concat<C>(conn: &C, name: &str) -> Result<Vec<String>>
where
    C: ConnectionTrait,
{
    let age_text = Func::cast_as(age(), Alias::new("TEXT"));
    let joined = concat(concat(username(), Expr::val("_")), age_text);
    Ok(member::Entity::find()
        .select_only()
        .expr(joined)
        .filter(member::Column::Username.eq(name))
        .order_by_asc(member::Column::Id)
        .into_tuple::<String>()
        .all(conn)
        .await?)
}

/// Usernames passed through the database's `REPLACE(username, from, to)`.
///
/// # Errors
/// Returns a database error if the query fails.
pub async fn usernames_replaced<C>(conn: &C, from: &str, to: &str) -> Result<Vec<Option<String>>>
where
    C: ConnectionTrait,
{
    let replaced = Func::cust(Alias::new("REPLACE")).args([
        SimpleExpr::from(username()),
        Expr::val(from).into(),
        Expr::val(to).into(),
    ]);
    Ok(member::Entity::find()
        .select_only()
        .expr(replaced)
        .order_by_asc(member::Column::Id)
        .into_tuple::<Option<String>>()
        .all(conn)
        .await?)
}

/// Members whose username is unchanged by `LOWER`.
///
/// # Errors
/// Returns a database error if the query fails.
pub async fn usernames_already_lowercase<C>(conn: &C) -> Result<Vec<member::Model>>
where
    C: ConnectionTrait,
{
    member::Entity::find()
        .filter(username().eq(Func::lower(username())))
        .order_by_asc(member::Column::Id)
        .fetch(conn)
        .await
}
