//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the
//! application. It centralizes error management, providing a consistent way to
//! represent the failure modes of a request: missing authentication, failed
//! ownership checks, bad input, missing rows and database trouble.
//!
//! `AppError` implements `actix_web::error::ResponseError`, so handlers and
//! guards can return it (or convert into it with `?`) and actix-web will turn
//! it into the right response: a redirect to the login page for
//! `LoginRequired`, and a rendered HTML error page for everything else.
//! `From` implementations cover `sqlx::Error`, `tera::Error` and the
//! actix-session error types.

use actix_web::http::{header, StatusCode};
use actix_web::{error::ResponseError, HttpResponse};
use std::fmt;
use tera::Context;

use crate::templates::TEMPLATES;

/// Represents all possible errors that can occur while handling a request.
#[derive(Debug)]
pub enum AppError {
    /// No user id in the session. Rendered as a 302 redirect to `/login`.
    LoginRequired,
    /// The session user does not own the referenced task (or the task has no
    /// ownership row at all). Rendered as the unauthorized error page with an
    /// HTTP 400 status.
    NotOwner,
    /// A malformed or invalid request (HTTP 400).
    BadRequest(String),
    /// A referenced row does not exist. Surfaced to the client as a
    /// bad-request page carrying the underlying message (HTTP 400).
    NotFound(String),
    /// An error originating from database operations (HTTP 500).
    DatabaseError(String),
    /// An unexpected server-side error (HTTP 500).
    InternalServerError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::LoginRequired => write!(f, "Login required"),
            AppError::NotOwner => write!(f, "You are not the owner of this task."),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl AppError {
    /// The code line shown on the rendered error page, e.g. "400 Bad Request".
    /// Note that `NotOwner` reports "401 Unauthorized" on the page while the
    /// HTTP status is 400.
    fn code_text(&self) -> &'static str {
        match self {
            AppError::LoginRequired => "302 Found",
            AppError::NotOwner => "401 Unauthorized",
            AppError::BadRequest(_) | AppError::NotFound(_) => "400 Bad Request",
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                "500 Internal Server Error"
            }
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// `LoginRequired` becomes a redirect; everything else renders `error.html`
/// with the error code and message. If template rendering itself fails, a
/// plain-text body with the same message is returned instead.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::LoginRequired => StatusCode::FOUND,
            AppError::NotOwner | AppError::BadRequest(_) | AppError::NotFound(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::LoginRequired = self {
            return HttpResponse::Found()
                .insert_header((header::LOCATION, "/login"))
                .finish();
        }

        let message = match self {
            AppError::NotOwner => "You are not the owner of this task.".to_string(),
            AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::DatabaseError(msg)
            | AppError::InternalServerError(msg) => msg.clone(),
            AppError::LoginRequired => unreachable!(),
        };

        let mut ctx = Context::new();
        ctx.insert("title", "Error");
        ctx.insert("code", self.code_text());
        ctx.insert("error", &message);
        match TEMPLATES.render("error.html", &ctx) {
            Ok(body) => HttpResponse::build(self.status_code())
                .content_type("text/html; charset=utf-8")
                .body(body),
            Err(_) => HttpResponse::build(self.status_code()).body(message),
        }
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `RowNotFound` is mapped to `AppError::NotFound` carrying the underlying
/// message, while other database errors become `AppError::DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound(error.to_string()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<tera::Error> for AppError {
    fn from(error: tera::Error) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

impl From<actix_session::SessionGetError> for AppError {
    fn from(error: actix_session::SessionGetError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

impl From<actix_session::SessionInsertError> for AppError {
    fn from(error: actix_session::SessionInsertError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_responses() {
        // Ownership failures render an unauthorized page but use 400.
        let error = AppError::NotOwner;
        let response = error.error_response();
        assert_eq!(response.status(), 400);

        let error = AppError::BadRequest("Invalid input".into());
        let response = error.error_response();
        assert_eq!(response.status(), 400);

        // Missing rows also surface as bad requests.
        let error = AppError::NotFound("no rows returned".into());
        let response = error.error_response();
        assert_eq!(response.status(), 400);

        let error = AppError::DatabaseError("connection reset".into());
        let response = error.error_response();
        assert_eq!(response.status(), 500);

        let error = AppError::InternalServerError("boom".into());
        let response = error.error_response();
        assert_eq!(response.status(), 500);
    }

    #[test]
    fn test_login_required_redirects() {
        let error = AppError::LoginRequired;
        let response = error.error_response();
        assert_eq!(response.status(), 302);
        assert_eq!(
            response
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok()),
            Some("/login")
        );
    }

    #[test]
    fn test_sqlx_row_not_found_maps_to_not_found() {
        let error: AppError = sqlx::Error::RowNotFound.into();
        match error {
            AppError::NotFound(_) => {}
            other => panic!("expected NotFound, got {:?}", other),
        }
    }
}
