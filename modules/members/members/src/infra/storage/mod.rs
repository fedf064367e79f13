//! Storage layer: everything that touches `SeaORM`.
//!
//! - `entity/`: `member`, `team` and `hello` entities
//! - `migrations/`: schema migrations
//! - `mapper.rs`: conversions from storage rows to SDK models
//! - `query/`: the query catalog, one function per query shape
//!
//! Nothing outside this module builds SQL.

pub mod entity;
pub mod mapper;
pub mod migrations;
pub mod query;

mod db;
mod members_sea_repo;

pub use members_sea_repo::OrmMembersRepository;
