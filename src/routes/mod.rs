pub mod pages;
pub mod tasks;
pub mod users;

use actix_web::http::header;
use actix_web::{web, HttpResponse};

use crate::auth::{CheckUser, LoginCheck};

/// Builds a 302 redirect to the given location.
pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Registers every route together with its guard chain.
///
/// Guards are attached per resource: `LoginCheck` everywhere a session is
/// required, `CheckUser` wherever the route references a task by id. Inside
/// the `/task` scope the fixed paths must be registered before `/{id}` so
/// that `/task/new` is not captured as an id.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(pages::home)))
        .service(
            web::resource("/list")
                .wrap(LoginCheck)
                .route(web::get().to(tasks::task_list)),
        )
        .service(
            web::resource("/user/new")
                .route(web::get().to(users::new_user_form))
                .route(web::post().to(users::register_user)),
        )
        .service(
            web::resource("/login")
                .route(web::get().to(users::login_form))
                .route(web::post().to(users::login)),
        )
        .service(
            web::resource("/logout")
                .wrap(LoginCheck)
                .route(web::get().to(users::logout)),
        )
        .service(
            web::resource("/user/edit")
                .wrap(LoginCheck)
                .route(web::get().to(users::edit_user_form))
                .route(web::post().to(users::edit_user)),
        )
        .service(
            web::resource("/user/delete")
                .wrap(LoginCheck)
                .route(web::get().to(users::delete_user_form))
                .route(web::post().to(users::delete_user)),
        )
        .service(
            web::scope("/task")
                .wrap(LoginCheck)
                .service(
                    web::resource("/new")
                        .route(web::get().to(tasks::new_task_form))
                        .route(web::post().to(tasks::register_task)),
                )
                .service(
                    web::resource("/edit/{id}")
                        .wrap(CheckUser)
                        .route(web::get().to(tasks::edit_task_form))
                        .route(web::post().to(tasks::edit_task)),
                )
                .service(
                    web::resource("/delete/{id}")
                        .wrap(CheckUser)
                        .route(web::get().to(tasks::delete_task)),
                )
                .service(
                    web::resource("/{id}")
                        .wrap(CheckUser)
                        .route(web::get().to(tasks::show_task)),
                ),
        );
}
