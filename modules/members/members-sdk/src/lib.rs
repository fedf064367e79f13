//! Members SDK
//!
//! Transport-agnostic contract of the members module:
//! - `Member`, `Team` and `MemberWithTeam` read models
//! - `NewMember` / `NewTeam` creation payloads
//! - `MemberDto` / `UserDto` projection targets
//! - `MemberSearchCondition` for dynamic searches
//! - aggregate result rows
//! - `MembersError`

pub mod error;
pub mod models;

pub use error::MembersError;
pub use models::{
    AgeStats, Member, MemberAverageAge, MemberConstant, MemberDto, MemberSearchCondition,
    MemberWithTeam, NewMember, NewTeam, Team, TeamAverageAge, UserDto,
};
