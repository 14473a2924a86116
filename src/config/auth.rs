//! Authentication header building for API requests.
//!
//! Builds the appropriate authentication header from the session's
//! auth type and stored access token.

use super::credentials::AuthType;
use super::session::Session;

/// Header name and value for authentication.
pub type AuthHeader = (String, String);

/// Build the authentication header for a session.
///
/// Returns `Some((header_name, header_value))` if a token is stored,
/// or `None` if no auth is needed or the token is missing.
pub fn build_auth_header(session: &Session) -> Option<AuthHeader> {
    let token = session.access_token()?;

    match session.auth_type() {
        AuthType::Bearer => Some((
            "Authorization".to_string(),
            format!("Bearer {}", token.expose()),
        )),
        AuthType::None => None,
    }
}
