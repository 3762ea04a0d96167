use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use tera::Context;

use crate::error::AppError;
use crate::templates::render;

/// Renders the home page.
pub async fn home() -> Result<HttpResponse, AppError> {
    let mut ctx = Context::new();
    ctx.insert("title", "Home");
    render(StatusCode::OK, "index.html", &ctx)
}
