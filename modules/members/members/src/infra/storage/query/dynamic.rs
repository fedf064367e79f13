//! Queries assembled from optional search fields.
//!
//! Both styles return the same rows: an unset field adds no restriction and
//! an empty condition matches every member.

use members_sdk::MemberSearchCondition;
use querystudy_db::{FetchExt, Result};
use sea_orm::sea_query::{Condition, SimpleExpr};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, QueryTrait};

use crate::infra::storage::entity::member;

/// Accumulates one predicate per set field into an `AND` group.
///
/// # Errors
/// Returns a database error if the query fails.
pub async fn search_with_builder<C>(
    conn: &C,
    cond: &MemberSearchCondition,
) -> Result<Vec<member::Model>>
where
    C: ConnectionTrait,
{
    let mut builder = Condition::all();
    if let Some(username) = &cond.username {
        builder = builder.add(member::Column::Username.eq(username.as_str()));
    }
    if let Some(age) = cond.age {
        builder = builder.add(member::Column::Age.eq(age));
    }
    member::Entity::find()
        .filter(builder)
        .order_by_asc(member::Column::Id)
        .fetch(conn)
        .await
}

#[must_use]
pub fn username_eq(username: Option<&str>) -> Option<SimpleExpr> {
    username.map(|u| member::Column::Username.eq(u))
}

#[must_use]
pub fn age_eq(age: Option<i32>) -> Option<SimpleExpr> {
    age.map(|a| member::Column::Age.eq(a))
}

/// `username_eq AND age_eq`, skipping whichever side is absent.
#[must_use]
pub fn all_eq(username: Option<&str>, age: Option<i32>) -> Option<SimpleExpr> {
    match (username_eq(username), age_eq(age)) {
        (Some(u), Some(a)) => Some(u.and(a)),
        (u, a) => u.or(a),
    }
}

/// Composes the reusable predicates above and filters only when one exists.
///
/// # Errors
/// Returns a database error if the query fails.
pub async fn search_with_predicates<C>(
    conn: &C,
    cond: &MemberSearchCondition,
) -> Result<Vec<member::Model>>
where
    C: ConnectionTrait,
{
    member::Entity::find()
        .apply_if(all_eq(cond.username.as_deref(), cond.age), |query, p| {
            query.filter(p)
        })
        .order_by_asc(member::Column::Id)
        .fetch(conn)
        .await
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QuerySelect};

    fn where_sql(expr: Option<SimpleExpr>) -> String {
        member::Entity::find()
            .select_only()
            .column(member::Column::Id)
            .apply_if(expr, |q, p| q.filter(p))
            .build(DbBackend::Sqlite)
            .to_string()
    }

    #[test]
    fn absent_predicates_add_no_where_clause() {
        assert!(all_eq(None, None).is_none());
        assert!(!where_sql(all_eq(None, None)).contains("WHERE"));
    }

    #[test]
    fn single_predicate_is_kept_alone() {
        let sql = where_sql(all_eq(None, Some(10)));
        assert!(sql.ends_with(r#"WHERE "member"."age" = 10"#), "{sql}");
    }

    #[test]
    fn both_predicates_are_joined_with_and() {
        let sql = where_sql(all_eq(Some("member1"), Some(10)));
        assert!(
            sql.ends_with(r#"WHERE "member"."username" = 'member1' AND "member"."age" = 10"#),
            "{sql}"
        );
    }
}
