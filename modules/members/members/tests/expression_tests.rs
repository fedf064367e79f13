#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use members::infra::storage::query::expression;

#[tokio::test]
async fn simple_case_on_exact_age() {
    let fx = common::setup().await;

    let labels = expression::age_labels_simple_case(&fx.tx).await.unwrap();

    assert_eq!(labels, ["ten", "twenty", "other", "other"]);
}

#[tokio::test]
async fn searched_case_on_age_ranges() {
    let fx = common::setup().await;

    let labels = expression::age_labels_searched_case(&fx.tx).await.unwrap();

    assert_eq!(labels, ["0-20", "0-20", "21-30", "other"]);
}

#[tokio::test]
async fn constant_next_to_each_username() {
    let fx = common::setup().await;

    let rows = expression::usernames_with_constant(&fx.tx, "A").await.unwrap();

    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0].username.as_deref(), Some("member1"));
    assert!(rows.iter().all(|r| r.constant == "A"));
}

#[tokio::test]
async fn concat_username_and_age() {
    let fx = common::setup().await;

    let joined = expression::username_age_concat(&fx.tx, "member1")
        .await
        .unwrap();

    assert_eq!(joined, ["member1_10"]);
}

#[tokio::test]
async fn native_replace_function() {
    let fx = common::setup().await;

    let replaced = expression::usernames_replaced(&fx.tx, "member", "M")
        .await
        .unwrap();

    assert_eq!(
        replaced,
        [
            Some("M1".to_owned()),
            Some("M2".to_owned()),
            Some("M3".to_owned()),
            Some("M4".to_owned())
        ]
    );
}

#[tokio::test]
async fn lower_function_in_where() {
    let fx = common::setup().await;
    common::add_member(&fx, members::NewMember::new("Member5", 50)).await;

    let lower = expression::usernames_already_lowercase(&fx.tx).await.unwrap();

    assert_eq!(
        common::usernames(&lower),
        ["member1", "member2", "member3", "member4"]
    );
}
