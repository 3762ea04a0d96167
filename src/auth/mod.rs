pub mod middleware;
pub mod password;

use actix_session::Session;

use crate::error::AppError;

// Re-export necessary items
pub use middleware::{CheckUser, LoginCheck};
pub use password::{digest, verify};

/// Session key under which the authenticated user's id is stored.
pub const SESSION_USER_KEY: &str = "user";

/// Name of the session cookie round-tripped with every request.
pub const SESSION_COOKIE_NAME: &str = "user-session";

/// Signing key for the session cookie. Hard-coded development secret; the
/// cookie store requires at least 64 bytes of key material.
pub const SESSION_SIGNING_KEY: &[u8] =
    b"an-insecure-development-only-session-signing-key-0123456789abcdef";

/// Reads the authenticated user's id from the session.
///
/// Routes calling this are expected to sit behind the `LoginCheck` guard, so
/// an absent id is reported as `AppError::LoginRequired` as a safe fallback.
pub fn session_user_id(session: &Session) -> Result<i64, AppError> {
    session
        .get::<i64>(SESSION_USER_KEY)?
        .ok_or(AppError::LoginRequired)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signing_key_is_long_enough() {
        // actix_web::cookie::Key::from panics below 64 bytes.
        assert!(SESSION_SIGNING_KEY.len() >= 64);
    }
}
