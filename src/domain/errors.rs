use thiserror::Error;

/// Error taxonomy for the storefront core.
///
/// Checkout raises the first four in order; the read side raises the rest.
/// Nothing here is fatal to the process, every variant is converted to a
/// user-visible response at the handler boundary.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No authenticated principal; checkout refuses before any write.
    #[error("Authentication required")]
    AuthRequired,

    /// The session email has no row in the user table. Non-recoverable from
    /// the caller's side, the user is directed to support.
    #[error("Could not resolve your user account, please contact support")]
    UserResolutionFailed,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An insert or update was rejected. Retryable, the cart is preserved.
    #[error("Order could not be saved: {0}")]
    WriteFailed(String),

    /// A read query failed. Retryable by re-issuing the query.
    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    #[error("Not found")]
    NotFound,
}
