use async_trait::async_trait;
use members_sdk::{Member, MemberSearchCondition, MemberWithTeam, NewMember, NewTeam, Team};
use sea_orm::ConnectionTrait;

use crate::domain::error::DomainError;

/// Persistence operations for members and teams.
///
/// Every method takes the runner explicitly, so one repository serves a
/// pooled connection and an open transaction alike.
#[async_trait]
pub trait MembersRepository: Send + Sync {
    async fn create_team<C: ConnectionTrait>(
        &self,
        runner: &C,
        new_team: NewTeam,
    ) -> Result<Team, DomainError>;

    /// Insert a member. A `team_id` that names no team is rejected.
    async fn create_member<C: ConnectionTrait>(
        &self,
        runner: &C,
        new_member: NewMember,
    ) -> Result<Member, DomainError>;

    /// Find a member by username with its team fetched in the same query.
    async fn find_member<C: ConnectionTrait>(
        &self,
        runner: &C,
        username: &str,
    ) -> Result<Option<MemberWithTeam>, DomainError>;

    /// All members ordered by id.
    async fn list_members<C: ConnectionTrait>(&self, runner: &C)
        -> Result<Vec<Member>, DomainError>;

    async fn search<C: ConnectionTrait>(
        &self,
        runner: &C,
        cond: &MemberSearchCondition,
    ) -> Result<Vec<Member>, DomainError>;
}
