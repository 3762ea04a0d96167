//!
//! # User Management
//!
//! Registration, login, logout, profile edit and account deactivation.
//! Validation failures re-render the originating form with a specific error
//! message and the previously entered values, using an HTTP 400 status.
//! Deactivation is a soft delete: the row is kept with `is_valid = false`.

use actix_session::Session;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use tera::Context;

use crate::auth::{self, password, SESSION_USER_KEY};
use crate::error::AppError;
use crate::models::{DeleteUserForm, EditUserForm, LoginForm, NewUserForm, User};
use crate::routes::redirect;
use crate::templates::render;

/// Renders the registration form.
pub async fn new_user_form() -> Result<HttpResponse, AppError> {
    let mut ctx = Context::new();
    ctx.insert("title", "Register user");
    render(StatusCode::OK, "new_user_form.html", &ctx)
}

/// Handles a registration submission.
///
/// Validation rules run in a fixed order and the first failure re-renders the
/// form with its message; which entered values are echoed back depends on the
/// failing rule. A taken username is rejected after the field rules pass.
/// Registration does not log the user in.
pub async fn register_user(
    pool: web::Data<PgPool>,
    form: web::Form<NewUserForm>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();

    let mut ctx = Context::new();
    ctx.insert("title", "Register user");

    if let Err(message) = form.validate() {
        // Which fields come back depends on the failing rule: a missing
        // username or password echoes only that field, every later rule
        // echoes the whole form.
        ctx.insert("error", message);
        if form.username.is_empty() {
            ctx.insert("username", &form.username);
        } else if form.password.is_empty() {
            ctx.insert("password", &form.password);
        } else {
            ctx.insert("username", &form.username);
            ctx.insert("password", &form.password);
            ctx.insert("password_confirm", &form.password_confirm);
        }
        return render(StatusCode::BAD_REQUEST, "new_user_form.html", &ctx);
    }

    ctx.insert("username", &form.username);
    ctx.insert("password", &form.password);
    ctx.insert("password_confirm", &form.password_confirm);

    let (duplicates,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE name = $1")
        .bind(&form.username)
        .fetch_one(pool.get_ref())
        .await?;
    if duplicates > 0 {
        ctx.insert("error", "Username is already taken");
        return render(StatusCode::BAD_REQUEST, "new_user_form.html", &ctx);
    }

    sqlx::query("INSERT INTO users (name, password) VALUES ($1, $2)")
        .bind(&form.username)
        .bind(password::digest(&form.password))
        .execute(pool.get_ref())
        .await?;

    Ok(redirect("/list"))
}

/// Renders the login form, or complains when a session already exists.
pub async fn login_form(session: Session) -> Result<HttpResponse, AppError> {
    if session.get::<i64>(SESSION_USER_KEY)?.is_some() {
        let mut ctx = Context::new();
        ctx.insert("title", "List of Tasks");
        ctx.insert("error", "You are already logged in");
        return render(StatusCode::BAD_REQUEST, "task_list.html", &ctx);
    }

    let mut ctx = Context::new();
    ctx.insert("title", "Login");
    render(StatusCode::OK, "login.html", &ctx)
}

/// Handles a login submission.
///
/// Checks run in order: unknown username, digest mismatch, deactivated
/// account. Each failure re-renders the login form and leaves the session
/// untouched. Success stores the user id in the session.
pub async fn login(
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();

    let mut ctx = Context::new();
    ctx.insert("title", "Login");
    ctx.insert("username", &form.username);

    let user: Option<User> =
        sqlx::query_as("SELECT id, name, password, is_valid FROM users WHERE name = $1")
            .bind(&form.username)
            .fetch_optional(pool.get_ref())
            .await?;

    let user = match user {
        Some(user) => user,
        None => {
            ctx.insert("error", "No such user");
            return render(StatusCode::BAD_REQUEST, "login.html", &ctx);
        }
    };

    if !password::verify(&form.password, &user.password) {
        ctx.insert("error", "Incorrect password");
        return render(StatusCode::BAD_REQUEST, "login.html", &ctx);
    }

    if !user.is_valid {
        ctx.insert("error", "User is not valid");
        return render(StatusCode::BAD_REQUEST, "login.html", &ctx);
    }

    session.insert(SESSION_USER_KEY, user.id)?;

    Ok(redirect("/list"))
}

/// Ends the session and expires the cookie.
pub async fn logout(session: Session) -> Result<HttpResponse, AppError> {
    session.purge();
    Ok(redirect("/"))
}

/// Renders the profile-edit form with the current username.
pub async fn edit_user_form(
    pool: web::Data<PgPool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let user_id = auth::session_user_id(&session)?;

    let user: User = sqlx::query_as("SELECT id, name, password, is_valid FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_one(pool.get_ref())
        .await?;

    let mut ctx = Context::new();
    ctx.insert("title", "Edit user");
    ctx.insert("username", &user.name);
    render(StatusCode::OK, "edit_user_form.html", &ctx)
}

/// Handles a profile-edit submission.
///
/// The current password authorizes the change; on success both the name and
/// the password digest are overwritten in one statement.
pub async fn edit_user(
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Form<EditUserForm>,
) -> Result<HttpResponse, AppError> {
    let user_id = auth::session_user_id(&session)?;
    let form = form.into_inner();

    let mut ctx = Context::new();
    ctx.insert("title", "Edit user");
    ctx.insert("username", &form.username);

    if let Err(message) = form.validate() {
        ctx.insert("error", message);
        return render(StatusCode::BAD_REQUEST, "edit_user_form.html", &ctx);
    }

    let user: User = sqlx::query_as("SELECT id, name, password, is_valid FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_one(pool.get_ref())
        .await?;

    if !password::verify(&form.password, &user.password) {
        ctx.insert("error", "Incorrect password");
        return render(StatusCode::BAD_REQUEST, "edit_user_form.html", &ctx);
    }

    sqlx::query("UPDATE users SET name = $1, password = $2 WHERE id = $3")
        .bind(&form.username)
        .bind(password::digest(&form.password_new))
        .bind(user_id)
        .execute(pool.get_ref())
        .await?;

    Ok(redirect("/"))
}

/// Renders the account-deactivation form.
pub async fn delete_user_form() -> Result<HttpResponse, AppError> {
    let mut ctx = Context::new();
    ctx.insert("title", "Delete user");
    render(StatusCode::OK, "delete_user_form.html", &ctx)
}

/// Handles an account-deactivation submission.
///
/// The row is retained with `is_valid = false`; the user's tasks and
/// ownership rows are left untouched. The session is purged afterwards.
pub async fn delete_user(
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Form<DeleteUserForm>,
) -> Result<HttpResponse, AppError> {
    let user_id = auth::session_user_id(&session)?;
    let form = form.into_inner();

    let mut ctx = Context::new();
    ctx.insert("title", "Delete user");

    if let Err(message) = form.validate() {
        ctx.insert("error", message);
        return render(StatusCode::BAD_REQUEST, "delete_user_form.html", &ctx);
    }

    let user: User = sqlx::query_as("SELECT id, name, password, is_valid FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_one(pool.get_ref())
        .await?;

    if !password::verify(&form.password, &user.password) {
        ctx.insert("error", "Incorrect password");
        return render(StatusCode::BAD_REQUEST, "delete_user_form.html", &ctx);
    }

    sqlx::query("UPDATE users SET is_valid = false WHERE id = $1")
        .bind(user_id)
        .execute(pool.get_ref())
        .await?;

    session.purge();

    Ok(redirect("/"))
}
