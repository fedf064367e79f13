#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::widget;
use querystudy_db::{DbError, FetchExt, PageRequest};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

#[tokio::test]
async fn fetch_returns_all_rows_or_empty() {
    let db = common::widgets_db(3).await;

    let all = widget::Entity::find().fetch(db.conn()).await.unwrap();
    assert_eq!(all.len(), 3);

    let none = widget::Entity::find()
        .filter(widget::Column::Name.eq("nope"))
        .fetch(db.conn())
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn fetch_one_distinguishes_zero_one_and_many() {
    let db = common::widgets_db(3).await;

    let one = widget::Entity::find()
        .filter(widget::Column::Name.eq("w2"))
        .fetch_one(db.conn())
        .await
        .unwrap();
    assert_eq!(one.map(|w| w.weight), Some(20));

    let zero = widget::Entity::find()
        .filter(widget::Column::Name.eq("w9"))
        .fetch_one(db.conn())
        .await
        .unwrap();
    assert!(zero.is_none());

    let err = widget::Entity::find()
        .fetch_one(db.conn())
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NonUniqueResult { found: 2 }));
}

#[tokio::test]
async fn fetch_first_picks_head_of_ordering() {
    let db = common::widgets_db(3).await;

    let first = widget::Entity::find()
        .order_by_desc(widget::Column::Weight)
        .fetch_first(db.conn())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.name, "w3");
}

#[tokio::test]
async fn fetch_results_carries_total_and_window() {
    let db = common::widgets_db(5).await;

    let page = widget::Entity::find()
        .order_by_asc(widget::Column::Id)
        .fetch_results(db.conn(), PageRequest::new(1, 2))
        .await
        .unwrap();

    assert_eq!(page.total, 5);
    assert_eq!(page.offset, 1);
    assert_eq!(page.limit, 2);
    let names: Vec<_> = page.results.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, ["w2", "w3"]);

    let weights = page.map(|w| w.weight);
    assert_eq!(weights.results, [20, 30]);
    assert_eq!(weights.total, 5);
}

#[tokio::test]
async fn fetch_count_honours_filter() {
    let db = common::widgets_db(4).await;

    let heavy = widget::Entity::find()
        .filter(widget::Column::Weight.gt(15))
        .fetch_count(db.conn())
        .await
        .unwrap();
    assert_eq!(heavy, 3);
}
