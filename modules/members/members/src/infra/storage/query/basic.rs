//! Lookups, filters and the fetch flavours.

use querystudy_db::{DbError, FetchExt, PageRequest, QueryResults, Result};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Statement,
};

use crate::infra::storage::entity::member;

/// Hand-written SQL with a bound parameter. At most one row is expected.
///
/// # Errors
/// `DbError::NonUniqueResult` when several members share the username.
pub async fn find_by_username_sql<C>(conn: &C, username: &str) -> Result<Option<member::Model>>
where
    C: ConnectionTrait,
{
    let stmt = Statement::from_sql_and_values(
        conn.get_database_backend(),
        r#"SELECT "member_id", "username", "age", "team_id" FROM "member" WHERE "username" = $1"#,
        [username.into()],
    );
    let mut rows = member::Entity::find().from_raw_sql(stmt).all(conn).await?;
    if rows.len() > 1 {
        return Err(DbError::NonUniqueResult { found: rows.len() });
    }
    Ok(rows.pop())
}

/// Builder counterpart of [`find_by_username_sql`].
///
/// # Errors
/// `DbError::NonUniqueResult` when several members share the username.
pub async fn find_by_username<C>(conn: &C, username: &str) -> Result<Option<member::Model>>
where
    C: ConnectionTrait,
{
    member::Entity::find()
        .filter(member::Column::Username.eq(username))
        .fetch_one(conn)
        .await
}

/// `username = ? AND age BETWEEN ? AND ?`, combined with an explicit `and`.
///
/// # Errors
/// `DbError::NonUniqueResult` when more than one member matches.
pub async fn search_chained<C>(
    conn: &C,
    username: &str,
    min_age: i32,
    max_age: i32,
) -> Result<Option<member::Model>>
where
    C: ConnectionTrait,
{
    member::Entity::find()
        .filter(
            member::Column::Username
                .eq(username)
                .and(member::Column::Age.between(min_age, max_age)),
        )
        .fetch_one(conn)
        .await
}

/// Same predicate as [`search_chained`], passed as separate filters.
///
/// # Errors
/// `DbError::NonUniqueResult` when more than one member matches.
pub async fn search_params<C>(
    conn: &C,
    username: &str,
    min_age: i32,
    max_age: i32,
) -> Result<Option<member::Model>>
where
    C: ConnectionTrait,
{
    member::Entity::find()
        .filter(member::Column::Username.eq(username))
        .filter(member::Column::Age.between(min_age, max_age))
        .fetch_one(conn)
        .await
}

/// Every member, one page with its total, and the bare count.
#[derive(Debug)]
pub struct ResultFetch {
    pub all: Vec<member::Model>,
    pub results: QueryResults<member::Model>,
    pub count: u64,
}

/// Runs the same member query through `fetch`, `fetch_results` and `fetch_count`.
///
/// # Errors
/// Returns a database error if any of the queries fails.
pub async fn result_fetch<C>(conn: &C, page: PageRequest) -> Result<ResultFetch>
where
    C: ConnectionTrait,
{
    let query = member::Entity::find().order_by_asc(member::Column::Id);
    let all = query.clone().fetch(conn).await?;
    let results = query.clone().fetch_results(conn, page).await?;
    let count = query.fetch_count(conn).await?;
    Ok(ResultFetch {
        all,
        results,
        count,
    })
}

/// First member by id.
///
/// # Errors
/// Returns a database error if the query fails.
pub async fn find_first<C>(conn: &C) -> Result<Option<member::Model>>
where
    C: ConnectionTrait,
{
    member::Entity::find()
        .order_by_asc(member::Column::Id)
        .fetch_first(conn)
        .await
}
