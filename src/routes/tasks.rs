//!
//! # Task Management
//!
//! List (with keyword/status filters and pagination), detail, create, edit
//! and delete flows. Every route here sits behind `LoginCheck`, and the
//! id-addressed routes additionally behind `CheckUser`; the list view scopes
//! its query to the session user through the ownership join regardless.

use actix_session::Session;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use tera::Context;

use crate::auth;
use crate::error::AppError;
use crate::models::{EditTaskForm, NewTaskForm, Task, TaskQuery};
use crate::routes::redirect;
use crate::templates::render;

/// Fixed number of tasks per list page.
pub(crate) const PAGE_SIZE: usize = 10;

/// Base list query; filter variants append conditions to it.
const LIST_QUERY: &str = "SELECT id, title, description, is_done, priority, deadline, created_at \
     FROM tasks INNER JOIN ownership ON task_id = id WHERE user_id = $1";

/// Selects the slice of `items` for the requested page and the list of page
/// numbers.
///
/// Page count is ceil(len / 10). A page index at or beyond the last page
/// yields the tail slice (the last page's worth of items) instead of an
/// out-of-range error; this also covers result sets smaller than one page.
/// Page indexes below 1 clamp the slice start to the beginning.
pub(crate) fn paginate<T>(items: &[T], page: i64) -> (&[T], Vec<i64>) {
    let mut page_count = items.len() / PAGE_SIZE;
    if items.len() % PAGE_SIZE != 0 {
        page_count += 1;
    }
    let pages: Vec<i64> = (1..=page_count as i64).collect();

    if page_count == 0 {
        return (items, pages);
    }
    let slice = if page >= page_count as i64 {
        &items[(page_count - 1) * PAGE_SIZE..]
    } else {
        let start = (page - 1).max(0) as usize * PAGE_SIZE;
        &items[start..(start + PAGE_SIZE).min(items.len())]
    };
    (slice, pages)
}

/// Renders the task list for the session user.
///
/// Query parameters: `kw` filters by case-sensitive substring match on the
/// title, `status` compares the completion flag against `status == "done"`,
/// and `page` selects the page (see `paginate` for the clamping rules). One
/// of four query variants runs depending on which filters are present; all
/// of them restrict to the session user's tasks via the ownership join.
pub async fn task_list(
    pool: web::Data<PgPool>,
    session: Session,
    query: web::Query<TaskQuery>,
) -> Result<HttpResponse, AppError> {
    let user_id = auth::session_user_id(&session)?;
    let query = query.into_inner();

    let kw = query.kw.clone().unwrap_or_default();
    let status = query.status.clone().unwrap_or_default();
    let page = query.page_number();

    let tasks: Vec<Task> = match (kw.is_empty(), status.is_empty()) {
        (false, false) => {
            sqlx::query_as(&format!(
                "{LIST_QUERY} AND title LIKE $2 AND is_done = $3 ORDER BY id"
            ))
            .bind(user_id)
            .bind(format!("%{}%", kw))
            .bind(status == "done")
            .fetch_all(pool.get_ref())
            .await?
        }
        (false, true) => {
            sqlx::query_as(&format!("{LIST_QUERY} AND title LIKE $2 ORDER BY id"))
                .bind(user_id)
                .bind(format!("%{}%", kw))
                .fetch_all(pool.get_ref())
                .await?
        }
        (true, false) => {
            sqlx::query_as(&format!("{LIST_QUERY} AND is_done = $2 ORDER BY id"))
                .bind(user_id)
                .bind(status == "done")
                .fetch_all(pool.get_ref())
                .await?
        }
        (true, true) => {
            sqlx::query_as(&format!("{LIST_QUERY} ORDER BY id"))
                .bind(user_id)
                .fetch_all(pool.get_ref())
                .await?
        }
    };

    let (page_tasks, pages) = paginate(&tasks, page);

    let mut ctx = Context::new();
    ctx.insert("title", "Task list");
    ctx.insert("tasks", page_tasks);
    ctx.insert("kw", &kw);
    ctx.insert("status", &status);
    ctx.insert("now_page", &page);
    ctx.insert("pages", &pages);
    render(StatusCode::OK, "task_list.html", &ctx)
}

/// Renders a single task.
///
/// The task is fetched by primary key only; ownership has already been
/// enforced by the route-level `CheckUser` guard.
pub async fn show_task(
    pool: web::Data<PgPool>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id: i64 = id
        .into_inner()
        .parse()
        .map_err(|e: std::num::ParseIntError| AppError::BadRequest(e.to_string()))?;

    let task: Task = sqlx::query_as(
        "SELECT id, title, description, is_done, priority, deadline, created_at \
         FROM tasks WHERE id = $1",
    )
    .bind(id)
    .fetch_one(pool.get_ref())
    .await?;

    let mut ctx = Context::new();
    ctx.insert("title", &format!("Task {}", task.id));
    ctx.insert("task", &task);
    render(StatusCode::OK, "task.html", &ctx)
}

/// Renders the task-creation form.
pub async fn new_task_form() -> Result<HttpResponse, AppError> {
    let mut ctx = Context::new();
    ctx.insert("title", "Task registration");
    render(StatusCode::OK, "form_new_task.html", &ctx)
}

/// Handles a task-creation submission.
///
/// All four fields must be present; each absent field is reported on its
/// own. The task insert and the ownership insert run in one transaction:
/// any failure before commit rolls the task row back, so a task without an
/// owner is never left behind.
pub async fn register_task(
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Form<NewTaskForm>,
) -> Result<HttpResponse, AppError> {
    let user_id = auth::session_user_id(&session)?;
    let form = form.into_inner();
    form.validate()
        .map_err(|message| AppError::BadRequest(message.into()))?;

    let title = form.title.unwrap_or_default();
    let description = form.description.unwrap_or_default();
    let deadline = form.deadline.unwrap_or_default();
    let priority = parse_priority(&form.priority.unwrap_or_default())?;

    // Dropping the transaction on any `?` return rolls the task insert back.
    let mut tx = pool.begin().await?;
    let (task_id,): (i64,) = sqlx::query_as(
        "INSERT INTO tasks (title, description, priority, deadline) \
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(&title)
    .bind(&description)
    .bind(priority)
    .bind(&deadline)
    .fetch_one(&mut *tx)
    .await?;
    sqlx::query("INSERT INTO ownership (user_id, task_id) VALUES ($1, $2)")
        .bind(user_id)
        .bind(task_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(redirect(&format!("/task/{}", task_id)))
}

/// Parses the priority submitted on task creation. Priorities are
/// non-negative, and the value must also fit the signed integer column, so
/// the upper half of the `u32` range is rejected rather than narrowed.
fn parse_priority(raw: &str) -> Result<i32, AppError> {
    let value: u32 = raw
        .parse()
        .map_err(|e| AppError::BadRequest(format!("invalid priority: {}", e)))?;
    i32::try_from(value).map_err(|e| AppError::BadRequest(format!("invalid priority: {}", e)))
}

/// Looks up the owner of a task through the ownership relation. A missing
/// row surfaces as `NotFound` (rendered as a bad request).
async fn task_owner(pool: &PgPool, task_id: i64) -> Result<i64, AppError> {
    let (owner,): (i64,) = sqlx::query_as("SELECT user_id FROM ownership WHERE task_id = $1")
        .bind(task_id)
        .fetch_one(pool)
        .await?;
    Ok(owner)
}

/// Renders the task-edit form.
///
/// Ownership is re-checked in the handler body on top of the route guard.
pub async fn edit_task_form(
    pool: web::Data<PgPool>,
    session: Session,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let user_id = auth::session_user_id(&session)?;
    let id: i64 = id
        .into_inner()
        .parse()
        .map_err(|e: std::num::ParseIntError| AppError::BadRequest(e.to_string()))?;

    let owner = task_owner(pool.get_ref(), id).await?;
    if owner != user_id {
        return Err(AppError::BadRequest("You are not owner of this task".into()));
    }

    let task: Task = sqlx::query_as(
        "SELECT id, title, description, is_done, priority, deadline, created_at \
         FROM tasks WHERE id = $1",
    )
    .bind(id)
    .fetch_one(pool.get_ref())
    .await?;

    let mut ctx = Context::new();
    ctx.insert("title", &format!("Edit task {}", task.id));
    ctx.insert("task", &task);
    render(StatusCode::OK, "form_edit_task.html", &ctx)
}

/// Handles a task-edit submission.
///
/// Fields are applied leniently: missing strings become empty, an unparsable
/// completion flag becomes false and an unparsable priority becomes zero.
/// All fields are persisted in a single update statement.
pub async fn edit_task(
    pool: web::Data<PgPool>,
    session: Session,
    id: web::Path<String>,
    form: web::Form<EditTaskForm>,
) -> Result<HttpResponse, AppError> {
    let user_id = auth::session_user_id(&session)?;
    let id: i64 = id
        .into_inner()
        .parse()
        .map_err(|e: std::num::ParseIntError| AppError::BadRequest(e.to_string()))?;

    let task: Task = sqlx::query_as(
        "SELECT id, title, description, is_done, priority, deadline, created_at \
         FROM tasks WHERE id = $1",
    )
    .bind(id)
    .fetch_one(pool.get_ref())
    .await?;

    let owner = task_owner(pool.get_ref(), id).await?;
    if owner != user_id {
        return Err(AppError::BadRequest("You are not owner of this task".into()));
    }

    let form = form.into_inner();
    let title = form.title.clone().unwrap_or_default();
    let description = form.description.clone().unwrap_or_default();
    let is_done = form.is_done_value();
    let priority = form.priority_value();
    let deadline = form.deadline.clone().unwrap_or_default();

    sqlx::query(
        "UPDATE tasks SET title = $1, description = $2, is_done = $3, priority = $4, \
         deadline = $5 WHERE id = $6",
    )
    .bind(&title)
    .bind(&description)
    .bind(is_done)
    .bind(priority)
    .bind(&deadline)
    .bind(task.id)
    .execute(pool.get_ref())
    .await?;

    Ok(redirect(&format!("/task/{}", task.id)))
}

/// Deletes a task and redirects to the list.
///
/// There is deliberately no ownership re-check in the handler body, unlike
/// edit; the route-level `CheckUser` guard is the only protection.
pub async fn delete_task(
    pool: web::Data<PgPool>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id: i64 = id
        .into_inner()
        .parse()
        .map_err(|e: std::num::ParseIntError| AppError::BadRequest(e.to_string()))?;

    sqlx::query("DELETE FROM tasks WHERE id = $1")
        .bind(id)
        .execute(pool.get_ref())
        .await?;

    Ok(redirect("/list"))
}
