pub mod analytics;
pub mod orders;
pub mod products;
pub mod sellers;

use actix_web::HttpRequest;

use crate::application::checkout::Principal;

/// Header carrying the authenticated principal's email, as resolved by the
/// session layer in front of this service.
pub const PRINCIPAL_HEADER: &str = "X-User-Email";

pub(crate) fn principal_from(req: &HttpRequest) -> Option<Principal> {
    req.headers()
        .get(PRINCIPAL_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|email| !email.is_empty())
        .map(|email| Principal {
            email: email.to_string(),
        })
}
