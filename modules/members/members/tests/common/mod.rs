#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(dead_code)]

use members::infra::storage::entity::member;
use members::{Member, MembersRepository, Migrator, NewMember, NewTeam, OrmMembersRepository};
use querystudy_db::{ConnectOpts, DbHandle};
use sea_orm::DatabaseTransaction;
use sea_orm_migration::MigratorTrait;

/// Migrated in-memory database with the sample data, seen through one open
/// transaction. Dropping the fixture rolls everything back.
pub struct Fixture {
    pub tx: DatabaseTransaction,
    pub team_a: i64,
    pub team_b: i64,
    pub db: DbHandle,
}

/// Single-connection in-memory database with the schema applied.
pub async fn migrated_db() -> DbHandle {
    let db = DbHandle::connect("sqlite::memory:", ConnectOpts::default().for_memory_sqlite())
        .await
        .expect("Failed to connect to database");
    Migrator::up(db.conn(), None)
        .await
        .expect("Failed to run migrations");
    db
}

/// teamA{member1 (10), member2 (20)}, teamB{member3 (30), member4 (40)}
pub async fn setup() -> Fixture {
    let db = migrated_db().await;
    let tx = db.begin().await.expect("Failed to begin transaction");
    let repo = OrmMembersRepository::new();

    let team_a = repo.create_team(&tx, NewTeam::new("teamA")).await.unwrap().id;
    let team_b = repo.create_team(&tx, NewTeam::new("teamB")).await.unwrap().id;
    for (name, age, team) in [
        ("member1", 10, team_a),
        ("member2", 20, team_a),
        ("member3", 30, team_b),
        ("member4", 40, team_b),
    ] {
        repo.create_member(&tx, NewMember::in_team(name, age, team))
            .await
            .unwrap();
    }

    Fixture {
        tx,
        team_a,
        team_b,
        db,
    }
}

pub async fn add_member(fx: &Fixture, new_member: NewMember) -> Member {
    OrmMembersRepository::new()
        .create_member(&fx.tx, new_member)
        .await
        .unwrap()
}

pub fn usernames(models: &[member::Model]) -> Vec<&str> {
    models
        .iter()
        .map(|m| m.username.as_deref().unwrap_or("<null>"))
        .collect()
}

pub fn ages(models: &[member::Model]) -> Vec<i32> {
    models.iter().map(|m| m.age).collect()
}
