//! Conversions from storage rows to SDK models.

use members_sdk::{
    AgeStats, Member, MemberAverageAge, MemberConstant, MemberDto, MemberWithTeam, Team,
    TeamAverageAge, UserDto,
};

use super::entity::{member, team};
use super::query::rows::{
    AgeStatsRow, MemberAverageAgeRow, MemberConstantRow, MemberDtoPartial, MemberDtoRow,
    TeamAverageAgeRow, UserDtoRow,
};

impl From<member::Model> for Member {
    fn from(m: member::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            age: m.age,
            team_id: m.team_id,
        }
    }
}

impl From<team::Model> for Team {
    fn from(t: team::Model) -> Self {
        Self {
            id: t.id,
            name: t.name,
        }
    }
}

/// Build a `MemberWithTeam` from a member/team pair loaded in one query.
#[must_use]
pub fn member_with_team((m, t): (member::Model, Option<team::Model>)) -> MemberWithTeam {
    MemberWithTeam {
        member: m.into(),
        team: t.map(Into::into),
    }
}

impl From<MemberDtoRow> for MemberDto {
    fn from(r: MemberDtoRow) -> Self {
        Self {
            username: r.username,
            age: r.age,
        }
    }
}

impl From<MemberDtoPartial> for MemberDto {
    fn from(r: MemberDtoPartial) -> Self {
        Self {
            username: r.username,
            age: r.age,
        }
    }
}

impl From<UserDtoRow> for UserDto {
    fn from(r: UserDtoRow) -> Self {
        Self {
            name: r.name,
            age: r.age,
        }
    }
}

impl From<AgeStatsRow> for AgeStats {
    fn from(r: AgeStatsRow) -> Self {
        Self {
            count: r.count,
            sum: r.sum,
            avg: r.avg,
            max: r.max,
            min: r.min,
        }
    }
}

impl From<TeamAverageAgeRow> for TeamAverageAge {
    fn from(r: TeamAverageAgeRow) -> Self {
        Self {
            team_name: r.team_name,
            avg_age: r.avg_age,
        }
    }
}

impl From<MemberAverageAgeRow> for MemberAverageAge {
    fn from(r: MemberAverageAgeRow) -> Self {
        Self {
            username: r.username,
            avg_age: r.avg_age,
        }
    }
}

impl From<MemberConstantRow> for MemberConstant {
    fn from(r: MemberConstantRow) -> Self {
        Self {
            username: r.username,
            constant: r.constant,
        }
    }
}
