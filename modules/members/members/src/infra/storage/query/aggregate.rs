//! Aggregates and grouping.

use members_sdk::{AgeStats, TeamAverageAge};
use querystudy_db::Result;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, JoinType, QueryOrder, QuerySelect, RelationTrait,
};

use super::avg_as_double;
use super::rows::{AgeStatsRow, TeamAverageAgeRow};
use crate::infra::storage::entity::{member, team};

/// `COUNT`, `SUM`, `AVG`, `MAX` and `MIN` of member ages in one row.
///
/// # Errors
/// Returns a database error if the query fails.
pub async fn age_stats<C>(conn: &C) -> Result<AgeStats>
where
    C: ConnectionTrait,
{
    let row = member::Entity::find()
        .select_only()
        .expr_as(member::Column::Id.count(), "count")
        .expr_as(member::Column::Age.sum(), "sum")
        .expr_as(
            avg_as_double(Expr::col((member::Entity, member::Column::Age))),
            "avg",
        )
        .expr_as(member::Column::Age.max(), "max")
        .expr_as(member::Column::Age.min(), "min")
        .into_model::<AgeStatsRow>()
        .one(conn)
        .await?;

    // An aggregate without GROUP BY always yields one row.
    Ok(row.map_or(
        AgeStats {
            count: 0,
            sum: None,
            avg: None,
            max: None,
            min: None,
        },
        Into::into,
    ))
}

/// Average member age per team name, ordered by team name.
///
/// # Errors
/// Returns a database error if the query fails.
pub async fn average_age_per_team<C>(conn: &C) -> Result<Vec<TeamAverageAge>>
where
    C: ConnectionTrait,
{
    let rows = member::Entity::find()
        .select_only()
        .column_as(team::Column::Name, "team_name")
        .expr_as(
            avg_as_double(Expr::col((member::Entity, member::Column::Age))),
            "avg_age",
        )
        .join(JoinType::InnerJoin, member::Relation::Team.def())
        .group_by(team::Column::Name)
        .order_by_asc(team::Column::Name)
        .into_model::<TeamAverageAgeRow>()
        .all(conn)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}
