#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(dead_code)]

use querystudy_db::{ConnectOpts, DbHandle};
use sea_orm::ConnectionTrait;

/// Single-connection in-memory database.
pub async fn memory_db() -> DbHandle {
    let opts = ConnectOpts {
        max_conns: Some(1),
        ..Default::default()
    };
    DbHandle::connect("sqlite::memory:", opts)
        .await
        .expect("Failed to connect to database")
}

/// In-memory database with a `widget` table holding `n` rows named `w1..=wn`.
pub async fn widgets_db(n: i64) -> DbHandle {
    let db = memory_db().await;
    db.conn()
        .execute_unprepared(
            "CREATE TABLE widget (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL, weight INTEGER NOT NULL)",
        )
        .await
        .expect("Failed to create table");
    for i in 1..=n {
        db.conn()
            .execute_unprepared(&format!(
                "INSERT INTO widget (name, weight) VALUES ('w{i}', {})",
                i * 10
            ))
            .await
            .expect("Failed to insert row");
    }
    db
}

pub mod widget {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "widget")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub name: String,
        pub weight: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}
