use async_trait::async_trait;
use members_sdk::{Member, MemberSearchCondition, MemberWithTeam, NewMember, NewTeam, Team};
use querystudy_db::FetchExt;
use sea_orm::{ActiveModelTrait, ActiveValue, ConnectionTrait, EntityTrait, QueryOrder};

use crate::domain::error::DomainError;
use crate::domain::repo::MembersRepository;

use super::db::db_err;
use super::entity::{member, team};
use super::query;

/// `SeaORM` implementation of [`MembersRepository`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OrmMembersRepository;

impl OrmMembersRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MembersRepository for OrmMembersRepository {
    async fn create_team<C: ConnectionTrait>(
        &self,
        runner: &C,
        new_team: NewTeam,
    ) -> Result<Team, DomainError> {
        let model = team::ActiveModel {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(new_team.name),
        }
        .insert(runner)
        .await
        .map_err(db_err)?;
        Ok(model.into())
    }

    async fn create_member<C: ConnectionTrait>(
        &self,
        runner: &C,
        new_member: NewMember,
    ) -> Result<Member, DomainError> {
        if let Some(team_id) = new_member.team_id {
            let exists = team::Entity::find_by_id(team_id)
                .one(runner)
                .await
                .map_err(db_err)?
                .is_some();
            if !exists {
                return Err(DomainError::team_not_found(team_id));
            }
        }

        let model = member::ActiveModel {
            id: ActiveValue::NotSet,
            username: ActiveValue::Set(new_member.username),
            age: ActiveValue::Set(new_member.age),
            team_id: ActiveValue::Set(new_member.team_id),
        }
        .insert(runner)
        .await
        .map_err(db_err)?;
        Ok(model.into())
    }

    async fn find_member<C: ConnectionTrait>(
        &self,
        runner: &C,
        username: &str,
    ) -> Result<Option<MemberWithTeam>, DomainError> {
        query::join::find_member_fetch_join(runner, username)
            .await
            .map_err(db_err)
    }

    async fn list_members<C: ConnectionTrait>(
        &self,
        runner: &C,
    ) -> Result<Vec<Member>, DomainError> {
        let rows = member::Entity::find()
            .order_by_asc(member::Column::Id)
            .fetch(runner)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn search<C: ConnectionTrait>(
        &self,
        runner: &C,
        cond: &MemberSearchCondition,
    ) -> Result<Vec<Member>, DomainError> {
        let rows = query::dynamic::search_with_predicates(runner, cond)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
