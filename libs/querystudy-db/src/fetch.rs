//! Fetch helpers over `SeaORM` selects.
//!
//! `fetch_one` is strict: more than one row is an error rather than a silent
//! pick. Use `fetch_first` when any matching row will do.

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait, QuerySelect, Select};
use serde::Serialize;

use crate::{DbError, Result};

/// Offset/limit window for a paged query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u64,
    pub limit: u64,
}

impl PageRequest {
    #[must_use]
    pub fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }
}

/// One page of rows together with the total row count of the unpaged query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResults<T> {
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
    pub results: Vec<T>,
}

impl<T> QueryResults<T> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Convert the page content, keeping the paging metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> QueryResults<U> {
        QueryResults {
            total: self.total,
            offset: self.offset,
            limit: self.limit,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

#[async_trait]
pub trait FetchExt<E: EntityTrait>: Sized {
    /// All rows; empty when nothing matches.
    ///
    /// # Errors
    /// Returns a database error if the query fails.
    async fn fetch<C>(self, conn: &C) -> Result<Vec<E::Model>>
    where
        C: ConnectionTrait;

    /// The only row, `None` when nothing matches.
    ///
    /// # Errors
    /// `DbError::NonUniqueResult` when more than one row matches.
    async fn fetch_one<C>(self, conn: &C) -> Result<Option<E::Model>>
    where
        C: ConnectionTrait;

    /// The first row (`LIMIT 1`), `None` when nothing matches.
    ///
    /// # Errors
    /// Returns a database error if the query fails.
    async fn fetch_first<C>(self, conn: &C) -> Result<Option<E::Model>>
    where
        C: ConnectionTrait;

    /// `COUNT(*)` over the query.
    ///
    /// # Errors
    /// Returns a database error if the query fails.
    async fn fetch_count<C>(self, conn: &C) -> Result<u64>
    where
        C: ConnectionTrait;

    /// Count query plus the paged content query.
    ///
    /// # Errors
    /// Returns a database error if either query fails.
    async fn fetch_results<C>(self, conn: &C, page: PageRequest) -> Result<QueryResults<E::Model>>
    where
        C: ConnectionTrait;
}

#[async_trait]
impl<E> FetchExt<E> for Select<E>
where
    E: EntityTrait,
    E::Model: Send + Sync,
{
    async fn fetch<C>(self, conn: &C) -> Result<Vec<E::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(self.all(conn).await?)
    }

    async fn fetch_one<C>(self, conn: &C) -> Result<Option<E::Model>>
    where
        C: ConnectionTrait,
    {
        let mut rows = self.limit(2).all(conn).await?;
        if rows.len() > 1 {
            return Err(DbError::NonUniqueResult { found: rows.len() });
        }
        Ok(rows.pop())
    }

    async fn fetch_first<C>(self, conn: &C) -> Result<Option<E::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(self.limit(1).all(conn).await?.into_iter().next())
    }

    async fn fetch_count<C>(self, conn: &C) -> Result<u64>
    where
        C: ConnectionTrait,
    {
        Ok(self.count(conn).await?)
    }

    async fn fetch_results<C>(self, conn: &C, page: PageRequest) -> Result<QueryResults<E::Model>>
    where
        C: ConnectionTrait,
    {
        let total = self.clone().count(conn).await?;
        let results = self
            .offset(page.offset)
            .limit(page.limit)
            .all(conn)
            .await?;
        tracing::trace!(total, offset = page.offset, limit = page.limit, "Fetched page");
        Ok(QueryResults {
            total,
            offset: page.offset,
            limit: page.limit,
            results,
        })
    }
}
