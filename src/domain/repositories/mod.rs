//! Repository traits decoupling the domain from the backing store.

mod account_repository;
mod url_repository;

pub use account_repository::AccountRepository;
pub use url_repository::{InsertError, UrlRepository};

#[cfg(test)]
pub use account_repository::MockAccountRepository;
#[cfg(test)]
pub use url_repository::MockUrlRepository;
