//! Row shapes for projection queries.

use sea_orm::{DerivePartialModel, FromQueryResult};

use crate::infra::storage::entity::member;

/// `(username, age)` matched by column name.
#[derive(Debug, Clone, FromQueryResult)]
pub struct MemberDtoRow {
    pub username: Option<String>,
    pub age: i32,
}

/// `(username, age)` checked against the `member` entity at compile time.
#[derive(Debug, Clone, FromQueryResult, DerivePartialModel)]
#[sea_orm(entity = "member::Entity")]
pub struct MemberDtoPartial {
    pub username: Option<String>,
    pub age: i32,
}

/// `username AS name, age`.
#[derive(Debug, Clone, FromQueryResult)]
pub struct UserDtoRow {
    pub name: Option<String>,
    pub age: i32,
}

#[derive(Debug, Clone, FromQueryResult)]
pub struct AgeStatsRow {
    pub count: i64,
    pub sum: Option<i64>,
    pub avg: Option<f64>,
    pub max: Option<i32>,
    pub min: Option<i32>,
}

#[derive(Debug, Clone, FromQueryResult)]
pub struct TeamAverageAgeRow {
    pub team_name: String,
    pub avg_age: f64,
}

#[derive(Debug, Clone, FromQueryResult)]
pub struct MemberAverageAgeRow {
    pub username: Option<String>,
    pub avg_age: f64,
}

#[derive(Debug, Clone, FromQueryResult)]
pub struct MemberConstantRow {
    pub username: Option<String>,
    pub constant: String,
}
