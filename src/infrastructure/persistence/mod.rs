//! Persistence backends implementing the repository traits.

mod memory;
mod pg_account_repository;
mod pg_url_repository;

pub use memory::{MemoryAccountRepository, MemoryUrlRepository};
pub use pg_account_repository::PgAccountRepository;
pub use pg_url_repository::PgUrlRepository;
