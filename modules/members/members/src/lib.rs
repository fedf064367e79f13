//! Members module.
//!
//! - `domain`: repository contract, service and domain errors
//! - `infra::storage`: entities, migrations, mappers, the sea-orm repository
//!   and the query catalog

// === PUBLIC CONTRACT ===
pub use members_sdk::*;

pub mod domain;
pub mod infra;

pub use domain::error::DomainError;
pub use domain::repo::MembersRepository;
pub use domain::service::{MembersService, ServiceConfig};
pub use infra::storage::OrmMembersRepository;
pub use infra::storage::migrations::Migrator;
