//! Projections: single column, tuples, name-matched rows, positional DTOs,
//! aliases and the compile-checked partial model.

use members_sdk::{MemberDto, UserDto};
use querystudy_db::Result;
use sea_orm::{
    ConnectionTrait, EntityTrait, FromQueryResult, QueryOrder, QuerySelect, Statement,
};

use super::rows::{MemberDtoPartial, MemberDtoRow, UserDtoRow};
use super::subquery::max_age_subquery;
use crate::infra::storage::entity::member;

/// Usernames only.
///
/// # Errors
/// Returns a database error if the query fails.
pub async fn usernames<C>(conn: &C) -> Result<Vec<Option<String>>>
where
    C: ConnectionTrait,
{
    Ok(member::Entity::find()
        .select_only()
        .column(member::Column::Username)
        .order_by_asc(member::Column::Id)
        .into_tuple()
        .all(conn)
        .await?)
}

/// `(username, age)` pairs.
///
/// # Errors
/// Returns a database error if the query fails.
pub async fn username_age_tuples<C>(conn: &C) -> Result<Vec<(Option<String>, i32)>>
where
    C: ConnectionTrait,
{
    Ok(member::Entity::find()
        .select_only()
        .columns([member::Column::Username, member::Column::Age])
        .order_by_asc(member::Column::Id)
        .into_tuple()
        .all(conn)
        .await?)
}

/// Hand-written SQL whose result columns are matched to [`MemberDto`] by name.
///
/// # Errors
/// Returns a database error if the query fails.
pub async fn member_dtos_by_sql<C>(conn: &C) -> Result<Vec<MemberDto>>
where
    C: ConnectionTrait,
{
    let stmt = Statement::from_string(
        conn.get_database_backend(),
        r#"SELECT "username", "age" FROM "member" ORDER BY "member_id""#,
    );
    let rows = MemberDtoRow::find_by_statement(stmt).all(conn).await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Builder counterpart of [`member_dtos_by_sql`]: selected columns filled
/// into the row by name.
///
/// # Errors
/// Returns a database error if the query fails.
pub async fn member_dtos_by_fields<C>(conn: &C) -> Result<Vec<MemberDto>>
where
    C: ConnectionTrait,
{
    let rows = member::Entity::find()
        .select_only()
        .columns([member::Column::Username, member::Column::Age])
        .order_by_asc(member::Column::Id)
        .into_model::<MemberDtoRow>()
        .all(conn)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Positional `(username, age)` handed to the DTO constructor.
///
/// # Errors
/// Returns a database error if the query fails.
pub async fn member_dtos_by_constructor<C>(conn: &C) -> Result<Vec<MemberDto>>
where
    C: ConnectionTrait,
{
    let tuples = username_age_tuples(conn).await?;
    Ok(tuples.into_iter().map(MemberDto::from).collect())
}

/// The same positional pair fits [`UserDto`] despite its different field names.
///
/// # Errors
/// Returns a database error if the query fails.
pub async fn user_dtos_by_constructor<C>(conn: &C) -> Result<Vec<UserDto>>
where
    C: ConnectionTrait,
{
    let tuples = username_age_tuples(conn).await?;
    Ok(tuples.into_iter().map(UserDto::from).collect())
}

/// `username AS name, age`, matched by name.
///
/// # Errors
/// Returns a database error if the query fails.
pub async fn user_dtos_by_alias<C>(conn: &C) -> Result<Vec<UserDto>>
where
    C: ConnectionTrait,
{
    let rows = member::Entity::find()
        .select_only()
        .column_as(member::Column::Username, "name")
        .column(member::Column::Age)
        .order_by_asc(member::Column::Id)
        .into_model::<UserDtoRow>()
        .all(conn)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Every username with the maximum age in place of its own, via an aliased
/// scalar subquery.
///
/// # Errors
/// Returns a database error if the query fails.
pub async fn user_dtos_with_max_age<C>(conn: &C) -> Result<Vec<UserDto>>
where
    C: ConnectionTrait,
{
    let rows = member::Entity::find()
        .select_only()
        .column_as(member::Column::Username, "name")
        .expr_as(max_age_subquery(), "age")
        .order_by_asc(member::Column::Id)
        .into_model::<UserDtoRow>()
        .all(conn)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Projection through a partial model bound to the member entity. The
/// selected columns come from the model's fields, so a field missing from
/// the entity fails to compile.
///
/// # Errors
/// Returns a database error if the query fails.
pub async fn member_dtos_typed<C>(conn: &C) -> Result<Vec<MemberDto>>
where
    C: ConnectionTrait,
{
    let rows = member::Entity::find()
        .order_by_asc(member::Column::Id)
        .into_partial_model::<MemberDtoPartial>()
        .all(conn)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}
