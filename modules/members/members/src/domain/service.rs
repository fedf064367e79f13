use std::sync::Arc;

use members_sdk::{Member, MemberSearchCondition, MemberWithTeam, NewMember, NewTeam};
use querystudy_db::{DbError, DbHandle, TxPolicy};
use sea_orm::ConnectionTrait;
use tracing::{debug, info, instrument};

use super::error::DomainError;
use super::repo::MembersRepository;

pub struct ServiceConfig {
    pub max_username_length: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_username_length: 255,
        }
    }
}

/// Fixed sample data: `(team, [(username, age)])`.
pub const SAMPLE_DATA: [(&str, [(&str, i32); 2]); 2] = [
    ("teamA", [("member1", 10), ("member2", 20)]),
    ("teamB", [("member3", 30), ("member4", 40)]),
];

pub struct MembersService<R: MembersRepository> {
    db: Arc<DbHandle>,
    repo: Arc<R>,
    config: ServiceConfig,
}

impl<R: MembersRepository + 'static> MembersService<R> {
    #[must_use]
    pub fn new(db: Arc<DbHandle>, repo: Arc<R>, config: ServiceConfig) -> Self {
        Self { db, repo, config }
    }

    /// Insert the two sample teams and their four members in one transaction.
    ///
    /// # Errors
    /// Returns `DomainError::Database` if any insert fails; nothing is kept then.
    #[instrument(skip(self))]
    pub async fn seed_sample_data(&self) -> Result<Vec<Member>, DomainError> {
        let repo = Arc::clone(&self.repo);
        let members = self
            .db
            .with_sea_tx(TxPolicy::Commit, move |tx| {
                Box::pin(async move {
                    seed(repo.as_ref(), tx)
                        .await
                        .map_err(|e| DbError::Other(anyhow::Error::new(e)))
                })
            })
            .await?;
        info!(members = members.len(), "Sample data seeded");
        Ok(members)
    }

    /// Members matching every set field of `cond`.
    ///
    /// # Errors
    /// `DomainError::Validation` for an over-long username or a negative age.
    #[instrument(skip(self, cond), fields(username = ?cond.username, age = ?cond.age))]
    pub async fn search(&self, cond: &MemberSearchCondition) -> Result<Vec<Member>, DomainError> {
        if let Some(username) = &cond.username {
            self.validate_username(username)?;
        }
        if let Some(age) = cond.age {
            validate_age(age)?;
        }
        let found = self.repo.search(self.db.conn(), cond).await?;
        debug!("Search returned {} members", found.len());
        Ok(found)
    }

    /// Every member ordered by id.
    ///
    /// # Errors
    /// Returns `DomainError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_members(&self) -> Result<Vec<Member>, DomainError> {
        debug!("Listing members");
        self.repo.list_members(self.db.conn()).await
    }

    /// The member with its team loaded.
    ///
    /// # Errors
    /// `DomainError::MemberNotFound` when no member has this username.
    #[instrument(skip(self))]
    pub async fn get_member(&self, username: &str) -> Result<MemberWithTeam, DomainError> {
        self.validate_username(username)?;
        self.repo
            .find_member(self.db.conn(), username)
            .await?
            .ok_or_else(|| DomainError::member_not_found(username))
    }

    /// # Errors
    /// `DomainError::Validation` for invalid fields, `DomainError::TeamNotFound`
    /// when `team_id` names no team.
    #[instrument(skip(self, new_member), fields(username = ?new_member.username))]
    pub async fn create_member(&self, new_member: NewMember) -> Result<Member, DomainError> {
        if let Some(username) = &new_member.username {
            self.validate_username(username)?;
        }
        validate_age(new_member.age)?;
        let created = self.repo.create_member(self.db.conn(), new_member).await?;
        debug!(id = created.id, "Member created");
        Ok(created)
    }

    fn validate_username(&self, username: &str) -> Result<(), DomainError> {
        if username.len() > self.config.max_username_length {
            return Err(DomainError::validation(
                "username",
                format!(
                    "exceeds maximum length of {}",
                    self.config.max_username_length
                ),
            ));
        }
        Ok(())
    }
}

fn validate_age(age: i32) -> Result<(), DomainError> {
    if age < 0 {
        return Err(DomainError::validation("age", "must not be negative"));
    }
    Ok(())
}

async fn seed<R, C>(repo: &R, runner: &C) -> Result<Vec<Member>, DomainError>
where
    R: MembersRepository,
    C: ConnectionTrait,
{
    let mut members = Vec::with_capacity(4);
    for (team_name, roster) in SAMPLE_DATA {
        let team = repo.create_team(runner, NewTeam::new(team_name)).await?;
        for (username, age) in roster {
            members.push(
                repo.create_member(runner, NewMember::in_team(username, age, team.id))
                    .await?,
            );
        }
    }
    Ok(members)
}
