//! Query catalog.
//!
//! One function per query shape, grouped by feature. Every function is generic
//! over `ConnectionTrait`, so it runs on a pooled connection or inside an open
//! transaction alike.

pub mod aggregate;
pub mod basic;
pub mod bulk;
pub mod dynamic;
pub mod expression;
pub mod join;
pub mod projection;
pub mod rows;
pub mod sorting;
pub mod subquery;

use sea_orm::sea_query::{Alias, Func, SimpleExpr};

/// `AVG(expr)` as a double on every backend (`PostgreSQL` would return `NUMERIC`).
pub(crate) fn avg_as_double(expr: impl Into<SimpleExpr>) -> SimpleExpr {
    Func::cast_as(Func::avg(expr), Alias::new("DOUBLE PRECISION")).into()
}
