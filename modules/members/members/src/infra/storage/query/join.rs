//! Inner, left, theta and on-clause joins plus fetch joins.

use members_sdk::MemberWithTeam;
use querystudy_db::{DbError, FetchExt, Result};
use sea_orm::sea_query::{Expr, IntoCondition};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, JoinType, ModelTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationDef, RelationTrait,
};

use crate::infra::storage::entity::{member, team};
use crate::infra::storage::mapper::member_with_team;

/// Members of the named team, ordered by id.
///
/// # Errors
/// Returns a database error if the query fails.
pub async fn members_of_team<C>(conn: &C, team_name: &str) -> Result<Vec<member::Model>>
where
    C: ConnectionTrait,
{
    member::Entity::find()
        .join(JoinType::InnerJoin, member::Relation::Team.def())
        .filter(team::Column::Name.eq(team_name))
        .order_by_asc(member::Column::Id)
        .fetch(conn)
        .await
}

/// Members whose username equals some team name, as a cross product filtered
/// in `WHERE`.
///
/// # Errors
/// Returns a database error if the query fails.
pub async fn members_named_like_teams<C>(conn: &C) -> Result<Vec<member::Model>>
where
    C: ConnectionTrait,
{
    let mut select = member::Entity::find();
    QuerySelect::query(&mut select).from(team::Entity);
    select
        .filter(
            Expr::col((member::Entity, member::Column::Username))
                .equals((team::Entity, team::Column::Name)),
        )
        .order_by_asc(member::Column::Id)
        .fetch(conn)
        .await
}

/// Every member with its team, the team kept only when its name matches.
/// The restriction sits in the `ON` clause so unmatched members survive.
///
/// # Errors
/// Returns a database error if the query fails.
pub async fn members_with_team_filtered_on<C>(
    conn: &C,
    team_name: &str,
) -> Result<Vec<(member::Model, Option<team::Model>)>>
where
    C: ConnectionTrait,
{
    let name = team_name.to_owned();
    let on = member::Relation::Team.def().on_condition(move |_left, right| {
        Expr::col((right, team::Column::Name))
            .eq(name.clone())
            .into_condition()
    });
    Ok(member::Entity::find()
        .select_also(team::Entity)
        .join(JoinType::LeftJoin, on)
        .order_by_asc(member::Column::Id)
        .all(conn)
        .await?)
}

/// Left join of `team` on `member.username = team.name`, a pair of columns
/// that carries no declared relation.
///
/// # Errors
/// Returns a database error if the query fails.
pub async fn members_joined_by_name_on<C>(
    conn: &C,
) -> Result<Vec<(member::Model, Option<team::Model>)>>
where
    C: ConnectionTrait,
{
    let by_name: RelationDef = member::Entity::belongs_to(team::Entity)
        .from(member::Column::Username)
        .to(team::Column::Name)
        .into();
    Ok(member::Entity::find()
        .select_also(team::Entity)
        .join(JoinType::LeftJoin, by_name)
        .order_by_asc(member::Column::Id)
        .all(conn)
        .await?)
}

/// The member alone. Only the foreign key is read; the team stays unloaded.
///
/// # Errors
/// `DbError::NonUniqueResult` when several members share the username.
pub async fn find_member_lazy<C>(conn: &C, username: &str) -> Result<Option<MemberWithTeam>>
where
    C: ConnectionTrait,
{
    let found = member::Entity::find()
        .filter(member::Column::Username.eq(username))
        .fetch_one(conn)
        .await?;
    Ok(found.map(|m| MemberWithTeam::lazy(m.into())))
}

/// The member and its team, loaded by one joined query.
///
/// # Errors
/// `DbError::NonUniqueResult` when several members share the username.
pub async fn find_member_fetch_join<C>(
    conn: &C,
    username: &str,
) -> Result<Option<MemberWithTeam>>
where
    C: ConnectionTrait,
{
    let mut found = member::Entity::find()
        .find_also_related(team::Entity)
        .filter(member::Column::Username.eq(username))
        .order_by_asc(member::Column::Id)
        .limit(2)
        .all(conn)
        .await?;
    if found.len() > 1 {
        return Err(DbError::NonUniqueResult { found: found.len() });
    }
    Ok(found.pop().map(member_with_team))
}

/// Members reached from a team through the `has_many` side of the relation.
/// `None` when the team does not exist.
///
/// # Errors
/// Returns a database error if either query fails.
pub async fn team_members<C>(conn: &C, team_id: i64) -> Result<Option<Vec<member::Model>>>
where
    C: ConnectionTrait,
{
    let Some(found) = team::Entity::find_by_id(team_id).one(conn).await? else {
        return Ok(None);
    };
    let members = found
        .find_related(member::Entity)
        .order_by_asc(member::Column::Id)
        .all(conn)
        .await?;
    Ok(Some(members))
}
