pub mod models;
pub mod order_repo;
pub mod product_repo;
pub mod query_cache;
pub mod sales_repo;
pub mod seller_repo;
pub mod user_directory;

#[cfg(test)]
pub(crate) mod testutil;

use crate::domain::errors::DomainError;

// ── Error conversions (infrastructure concern only) ──────────────────────────
//
// `conn.transaction` requires `From<diesel::result::Error>`; the write paths
// rely on it. Read paths map explicitly to `FetchFailed` instead.

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        match e {
            diesel::result::Error::NotFound => DomainError::NotFound,
            other => DomainError::WriteFailed(other.to_string()),
        }
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::FetchFailed(e.to_string())
    }
}

pub(crate) fn fetch_failed(e: impl std::fmt::Display) -> DomainError {
    DomainError::FetchFailed(e.to_string())
}
