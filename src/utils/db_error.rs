//! Classification of database unique-violation errors.
//!
//! The short-code and owner+URL uniqueness constraints are the concurrency
//! safety net for record creation; the repository needs to tell them apart
//! to pick the right recovery path.

/// Constraint name of the global short-code unique index.
pub const CODE_CONSTRAINT: &str = "short_urls_code_key";

/// Constraint name of the partial `(owner_id, original_url)` unique index
/// over active records.
pub const OWNER_URL_CONSTRAINT: &str = "short_urls_owner_url_active_key";

pub fn is_unique_violation_on_code(e: &sqlx::Error) -> bool {
    is_unique_violation_on(e, CODE_CONSTRAINT)
}

pub fn is_unique_violation_on_owner_url(e: &sqlx::Error) -> bool {
    is_unique_violation_on(e, OWNER_URL_CONSTRAINT)
}

fn is_unique_violation_on(e: &sqlx::Error, constraint: &str) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    db_err.constraint() == Some(constraint)
}
