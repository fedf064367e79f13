#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use querystudy_db::{DbError, TxPolicy};
use sea_orm::{ConnectionTrait, DbBackend, Statement};

async fn count_rows(db: &querystudy_db::DbHandle) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM tx_test")
        .fetch_one(db.sqlx_sqlite().unwrap())
        .await
        .expect("Failed to query count")
}

async fn db_with_table() -> querystudy_db::DbHandle {
    let db = common::memory_db().await;
    sqlx::query("CREATE TABLE tx_test (id INTEGER PRIMARY KEY, val TEXT NOT NULL)")
        .execute(db.sqlx_sqlite().unwrap())
        .await
        .expect("Failed to create table");
    db
}

fn insert(id: i64, val: &str) -> Statement {
    Statement::from_sql_and_values(
        DbBackend::Sqlite,
        "INSERT INTO tx_test (id, val) VALUES (?, ?)",
        [id.into(), val.into()],
    )
}

#[tokio::test]
async fn sqlite_with_tx_commit_persists_changes() {
    let db = db_with_table().await;

    db.with_sqlite_tx(|tx| {
        Box::pin(async move {
            sqlx::query("INSERT INTO tx_test (id, val) VALUES (?, ?)")
                .bind(1_i64)
                .bind("committed")
                .execute(&mut **tx)
                .await?;
            Ok(())
        })
    })
    .await
    .expect("Transaction failed");

    assert_eq!(count_rows(&db).await, 1);
}

#[tokio::test]
async fn sqlite_with_tx_error_rolls_back() {
    let db = db_with_table().await;

    let result: Result<(), _> = db
        .with_sqlite_tx(|tx| {
            Box::pin(async move {
                sqlx::query("INSERT INTO tx_test (id, val) VALUES (?, ?)")
                    .bind(1_i64)
                    .bind("should_rollback")
                    .execute(&mut **tx)
                    .await?;
                Err(DbError::Other(anyhow::anyhow!("Simulated error")))
            })
        })
        .await;

    assert!(result.is_err());
    assert_eq!(count_rows(&db).await, 0);
}

#[tokio::test]
async fn sea_tx_commit_policy_persists_changes() {
    let db = db_with_table().await;

    let affected = db
        .with_sea_tx(TxPolicy::Commit, |tx| {
            Box::pin(async move {
                let res = tx.execute(insert(1, "kept")).await?;
                Ok(res.rows_affected())
            })
        })
        .await
        .expect("Transaction failed");

    assert_eq!(affected, 1);
    assert_eq!(count_rows(&db).await, 1);
}

#[tokio::test]
async fn sea_tx_rollback_policy_returns_value_and_discards_writes() {
    let db = db_with_table().await;

    let seen_inside = db
        .with_sea_tx(TxPolicy::Rollback, |tx| {
            Box::pin(async move {
                tx.execute(insert(1, "a")).await?;
                tx.execute(insert(2, "b")).await?;
                let row = tx
                    .query_one(Statement::from_string(
                        DbBackend::Sqlite,
                        "SELECT COUNT(*) AS n FROM tx_test",
                    ))
                    .await?
                    .expect("count row");
                Ok(row.try_get::<i64>("", "n")?)
            })
        })
        .await
        .expect("Transaction failed");

    assert_eq!(seen_inside, 2);
    assert_eq!(count_rows(&db).await, 0);
}

#[tokio::test]
async fn sea_tx_error_rolls_back_even_with_commit_policy() {
    let db = db_with_table().await;

    let err = db
        .with_sea_tx(TxPolicy::Commit, |tx| {
            Box::pin(async move {
                tx.execute(insert(1, "doomed")).await?;
                // Duplicate key
                tx.execute(insert(1, "again")).await?;
                Ok(())
            })
        })
        .await
        .unwrap_err();

    assert!(matches!(err, DbError::Sea(_)));
    assert_eq!(count_rows(&db).await, 0);
}

#[tokio::test]
async fn dropped_transaction_is_rolled_back() {
    let db = db_with_table().await;
    {
        let tx = db.begin().await.unwrap();
        tx.execute(insert(7, "never")).await.unwrap();
    }
    assert_eq!(count_rows(&db).await, 0);
}
