//! Public models for the members module.

use serde::Serialize;

/// A member as stored. `team_id` is the raw foreign key; the team itself is
/// only materialized by queries that join it in (see [`MemberWithTeam`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    pub id: i64,
    pub username: Option<String>,
    pub age: i32,
    pub team_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Team {
    pub id: i64,
    pub name: String,
}

/// A member together with its team when the query fetched it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberWithTeam {
    pub member: Member,
    pub team: Option<Team>,
}

impl MemberWithTeam {
    /// A member without a fetched team.
    #[must_use]
    pub fn lazy(member: Member) -> Self {
        Self { member, team: None }
    }

    /// Whether the team was materialized by the query that produced this value.
    #[must_use]
    pub fn is_team_loaded(&self) -> bool {
        self.team.is_some()
    }
}

/// Data for a member to be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewMember {
    pub username: Option<String>,
    pub age: i32,
    pub team_id: Option<i64>,
}

impl NewMember {
    /// Named member with age 0 and no team.
    #[must_use]
    pub fn named(username: impl Into<String>) -> Self {
        Self::new(username, 0)
    }

    #[must_use]
    pub fn new(username: impl Into<String>, age: i32) -> Self {
        Self {
            username: Some(username.into()),
            age,
            team_id: None,
        }
    }

    #[must_use]
    pub fn in_team(username: impl Into<String>, age: i32, team_id: i64) -> Self {
        Self {
            team_id: Some(team_id),
            ..Self::new(username, age)
        }
    }

    /// Member without a username.
    #[must_use]
    pub fn anonymous(age: i32) -> Self {
        Self {
            username: None,
            age,
            team_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTeam {
    pub name: String,
}

impl NewTeam {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Projection of a member onto `(username, age)`, matched by column name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberDto {
    pub username: Option<String>,
    pub age: i32,
}

impl From<(Option<String>, i32)> for MemberDto {
    fn from((username, age): (Option<String>, i32)) -> Self {
        Self { username, age }
    }
}

/// Same data as [`MemberDto`] under different field names; name based
/// projections need an alias for `username`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDto {
    pub name: Option<String>,
    pub age: i32,
}

impl From<(Option<String>, i32)> for UserDto {
    fn from((name, age): (Option<String>, i32)) -> Self {
        Self { name, age }
    }
}

/// Optional search fields. An unset field places no restriction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MemberSearchCondition {
    pub username: Option<String>,
    pub age: Option<i32>,
}

impl MemberSearchCondition {
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    #[must_use]
    pub fn with_age(mut self, age: i32) -> Self {
        self.age = Some(age);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.age.is_none()
    }
}

/// Aggregates over member ages. `sum`, `avg`, `max` and `min` are absent when no member exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeStats {
    pub count: i64,
    pub sum: Option<i64>,
    pub avg: Option<f64>,
    pub max: Option<i32>,
    pub min: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamAverageAge {
    pub team_name: String,
    pub avg_age: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberAverageAge {
    pub username: Option<String>,
    pub avg_age: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberConstant {
    pub username: Option<String>,
    pub constant: String,
}
