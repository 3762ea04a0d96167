use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::Key;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use sqlx::PgPool;

use todolist::auth::{SESSION_COOKIE_NAME, SESSION_SIGNING_KEY};
use todolist::config::Config;
use todolist::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    // A failed connection is fatal at startup; everything after this point
    // shares the one pool.
    let pool = PgPool::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    let key = Key::from(SESSION_SIGNING_KEY);

    log::info!("Starting todolist server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .wrap(Logger::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
                    .cookie_name(SESSION_COOKIE_NAME.to_string())
                    .cookie_secure(false)
                    .build(),
            )
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
