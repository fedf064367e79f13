#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use members::NewMember;
use members::infra::storage::entity::{hello, member};
use members::infra::storage::query::basic;
use querystudy_db::{DbError, FetchExt, PageRequest};
use sea_orm::{ActiveModelTrait, ActiveValue, EntityTrait, QueryOrder};

#[tokio::test]
async fn hello_entity_round_trips_through_the_schema() {
    let fx = common::setup().await;

    let saved = hello::ActiveModel {
        id: ActiveValue::NotSet,
    }
    .insert(&fx.tx)
    .await
    .unwrap();

    let found = hello::Entity::find().one(&fx.tx).await.unwrap();
    assert_eq!(found, Some(saved));
}

#[tokio::test]
async fn find_by_sql_and_by_builder_agree() {
    let fx = common::setup().await;

    let by_sql = basic::find_by_username_sql(&fx.tx, "member1")
        .await
        .unwrap()
        .expect("member1 by sql");
    let by_builder = basic::find_by_username(&fx.tx, "member1")
        .await
        .unwrap()
        .expect("member1 by builder");

    assert_eq!(by_sql.username.as_deref(), Some("member1"));
    assert_eq!(by_sql, by_builder);
}

#[tokio::test]
async fn search_with_chained_and_separate_filters() {
    let fx = common::setup().await;

    let chained = basic::search_chained(&fx.tx, "member1", 10, 30)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(chained.username.as_deref(), Some("member1"));

    let params = basic::search_params(&fx.tx, "member1", 10, 10)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(params, chained);

    let outside = basic::search_params(&fx.tx, "member1", 11, 30).await.unwrap();
    assert!(outside.is_none());
}

#[tokio::test]
async fn result_fetch_variants() {
    let fx = common::setup().await;

    let fetched = basic::result_fetch(&fx.tx, PageRequest::new(0, 2))
        .await
        .unwrap();

    assert_eq!(fetched.all.len(), 4);
    assert_eq!(fetched.count, 4);
    assert_eq!(fetched.results.total, 4);
    assert_eq!(common::usernames(&fetched.results.results), ["member1", "member2"]);

    let first = basic::find_first(&fx.tx).await.unwrap().unwrap();
    assert_eq!(first.username.as_deref(), Some("member1"));
}

#[tokio::test]
async fn fetch_one_over_several_rows_is_non_unique() {
    let fx = common::setup().await;

    let err = member::Entity::find().fetch_one(&fx.tx).await.unwrap_err();
    assert!(matches!(err, DbError::NonUniqueResult { found: 2 }));

    common::add_member(&fx, NewMember::new("member1", 99)).await;
    let err = basic::find_by_username_sql(&fx.tx, "member1")
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NonUniqueResult { found: 2 }));
}

#[tokio::test]
async fn unknown_username_finds_nothing() {
    let fx = common::setup().await;

    assert!(basic::find_by_username(&fx.tx, "ghost").await.unwrap().is_none());
    assert!(basic::find_by_username_sql(&fx.tx, "ghost").await.unwrap().is_none());
}

#[tokio::test]
async fn builder_and_hand_written_sql_return_the_same_rows() {
    let fx = common::setup().await;

    for name in ["member1", "member2", "member3", "member4"] {
        let by_sql = basic::find_by_username_sql(&fx.tx, name).await.unwrap();
        let by_builder = basic::find_by_username(&fx.tx, name).await.unwrap();
        assert_eq!(by_sql, by_builder, "{name}");
    }

    let all = member::Entity::find()
        .order_by_asc(member::Column::Id)
        .all(&fx.tx)
        .await
        .unwrap();
    assert_eq!(common::ages(&all), [10, 20, 30, 40]);
}
