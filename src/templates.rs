//!
//! # Template Registry
//!
//! All pages are rendered from tera templates compiled once at startup. The
//! templates are embedded into the binary with `include_str!`, so the server
//! and the test suite do not depend on the working directory at runtime.

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use lazy_static::lazy_static;
use tera::{Context, Tera};

use crate::error::AppError;

lazy_static! {
    pub static ref TEMPLATES: Tera = {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("base.html", include_str!("../templates/base.html")),
            ("index.html", include_str!("../templates/index.html")),
            ("login.html", include_str!("../templates/login.html")),
            (
                "new_user_form.html",
                include_str!("../templates/new_user_form.html"),
            ),
            (
                "edit_user_form.html",
                include_str!("../templates/edit_user_form.html"),
            ),
            (
                "delete_user_form.html",
                include_str!("../templates/delete_user_form.html"),
            ),
            ("task_list.html", include_str!("../templates/task_list.html")),
            ("task.html", include_str!("../templates/task.html")),
            (
                "form_new_task.html",
                include_str!("../templates/form_new_task.html"),
            ),
            (
                "form_edit_task.html",
                include_str!("../templates/form_edit_task.html"),
            ),
            ("error.html", include_str!("../templates/error.html")),
        ])
        .expect("embedded templates must parse");
        tera
    };
}

/// Renders a template into an HTML response with the given status code.
pub fn render(status: StatusCode, name: &str, ctx: &Context) -> Result<HttpResponse, AppError> {
    let body = TEMPLATES.render(name, ctx)?;
    Ok(HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(body))
}
