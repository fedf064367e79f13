#![allow(clippy::unwrap_used, clippy::expect_used)]

#[cfg(test)]
mod tests {
    use super::super::*;
    use async_trait::async_trait;
    use members_sdk::{
        Member, MemberSearchCondition, MemberWithTeam, NewMember, NewTeam, Team,
    };
    use querystudy_db::{ConnectOpts, DbHandle};
    use sea_orm::ConnectionTrait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

    use error::DomainError;

    // Mock repository for testing
    #[derive(Default)]
    struct MockRepository {
        members: Vec<Member>,
        next_id: AtomicI64,
        calls: AtomicUsize,
    }

    impl MockRepository {
        fn with_members(members: Vec<Member>) -> Self {
            Self {
                members,
                ..Default::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn next_id(&self) -> i64 {
            self.next_id.fetch_add(1, Ordering::SeqCst) + 1
        }
    }

    #[async_trait]
    impl repo::MembersRepository for MockRepository {
        async fn create_team<C: ConnectionTrait>(
            &self,
            _runner: &C,
            new_team: NewTeam,
        ) -> Result<Team, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Team {
                id: self.next_id(),
                name: new_team.name,
            })
        }

        async fn create_member<C: ConnectionTrait>(
            &self,
            _runner: &C,
            new_member: NewMember,
        ) -> Result<Member, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Member {
                id: self.next_id(),
                username: new_member.username,
                age: new_member.age,
                team_id: new_member.team_id,
            })
        }

        async fn find_member<C: ConnectionTrait>(
            &self,
            _runner: &C,
            username: &str,
        ) -> Result<Option<MemberWithTeam>, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .members
                .iter()
                .find(|m| m.username.as_deref() == Some(username))
                .cloned()
                .map(MemberWithTeam::lazy))
        }

        async fn list_members<C: ConnectionTrait>(
            &self,
            _runner: &C,
        ) -> Result<Vec<Member>, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.members.clone())
        }

        async fn search<C: ConnectionTrait>(
            &self,
            _runner: &C,
            cond: &MemberSearchCondition,
        ) -> Result<Vec<Member>, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .members
                .iter()
                .filter(|m| cond.username.is_none() || m.username == cond.username)
                .filter(|m| cond.age.is_none_or(|age| m.age == age))
                .cloned()
                .collect())
        }
    }

    fn member(id: i64, username: &str, age: i32) -> Member {
        Member {
            id,
            username: Some(username.to_owned()),
            age,
            team_id: None,
        }
    }

    async fn create_service(
        repo: MockRepository,
        config: service::ServiceConfig,
    ) -> (service::MembersService<MockRepository>, Arc<MockRepository>) {
        let db = DbHandle::connect("sqlite::memory:", ConnectOpts::default().for_memory_sqlite())
            .await
            .expect("connect");
        let repo = Arc::new(repo);
        let svc = service::MembersService::new(Arc::new(db), Arc::clone(&repo), config);
        (svc, repo)
    }

    #[tokio::test]
    async fn test_seed_sample_data_creates_two_teams_and_four_members() {
        let (svc, repo) =
            create_service(MockRepository::default(), service::ServiceConfig::default()).await;

        let members = svc.seed_sample_data().await.unwrap();

        let names: Vec<_> = members
            .iter()
            .map(|m| (m.username.as_deref().unwrap(), m.age))
            .collect();
        assert_eq!(
            names,
            vec![("member1", 10), ("member2", 20), ("member3", 30), ("member4", 40)]
        );
        assert_eq!(members[0].team_id, members[1].team_id);
        assert_ne!(members[1].team_id, members[2].team_id);
        assert_eq!(repo.calls(), 6);
    }

    #[tokio::test]
    async fn test_search_filters_by_set_fields_only() {
        let (svc, _) = create_service(
            MockRepository::with_members(vec![member(1, "member1", 10), member(2, "member2", 20)]),
            service::ServiceConfig::default(),
        )
        .await;

        let by_name = svc
            .search(&MemberSearchCondition::default().with_username("member1"))
            .await
            .unwrap();
        assert_eq!(by_name.len(), 1);

        let everyone = svc.search(&MemberSearchCondition::default()).await.unwrap();
        assert_eq!(everyone.len(), 2);
    }

    #[tokio::test]
    async fn test_search_rejects_long_username_without_hitting_repo() {
        let (svc, repo) = create_service(
            MockRepository::default(),
            service::ServiceConfig {
                max_username_length: 5,
            },
        )
        .await;

        let err = svc
            .search(&MemberSearchCondition::default().with_username("member1"))
            .await
            .unwrap_err();

        match err {
            DomainError::Validation { field, .. } => assert_eq!(field, "username"),
            other => panic!("Expected validation error, got {other:?}"),
        }
        assert_eq!(repo.calls(), 0);
    }

    #[tokio::test]
    async fn test_negative_age_is_rejected() {
        let (svc, repo) =
            create_service(MockRepository::default(), service::ServiceConfig::default()).await;

        let err = svc
            .search(&MemberSearchCondition::default().with_age(-1))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "age"));

        let err = svc.create_member(NewMember::new("x", -5)).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
        assert_eq!(repo.calls(), 0);

        let public: members_sdk::MembersError = err.into();
        assert_eq!(
            public,
            members_sdk::MembersError::validation("age", "must not be negative")
        );
    }

    #[tokio::test]
    async fn test_get_member_not_found() {
        let (svc, _) =
            create_service(MockRepository::default(), service::ServiceConfig::default()).await;

        let err = svc.get_member("nobody").await.unwrap_err();

        assert!(matches!(err, DomainError::MemberNotFound { ref username } if username == "nobody"));
        let public: members_sdk::MembersError = err.into();
        assert_eq!(public, members_sdk::MembersError::member_not_found("nobody"));
    }

    #[tokio::test]
    async fn test_list_members_passes_through() {
        let (svc, _) = create_service(
            MockRepository::with_members(vec![member(1, "member1", 10)]),
            service::ServiceConfig::default(),
        )
        .await;

        let all = svc.list_members().await.unwrap();

        assert_eq!(all, vec![member(1, "member1", 10)]);
    }
}
