//! Shared utilities: code generation, URL normalization, referrer parsing.

pub mod code_generator;
pub mod db_error;
pub mod referrer;
pub mod url_normalizer;
