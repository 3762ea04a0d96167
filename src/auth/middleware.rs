//!
//! # Request Guards
//!
//! Two pipeline filters compose with the route table in `routes::config`:
//!
//! - [`LoginCheck`] aborts with a redirect to `/login` when the session holds
//!   no user id.
//! - [`CheckUser`] resolves the owner of the task referenced by the `{id}`
//!   route segment and aborts with the unauthorized error page when it is not
//!   the session user.
//!
//! Both are pure middleware: they either pass the request forward untouched
//! or short-circuit by returning an `AppError`, which actix-web renders
//! through its `ResponseError` implementation. They never produce the final
//! success response themselves.

use std::rc::Rc;

use actix_session::SessionExt;
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use sqlx::PgPool;

use crate::auth::SESSION_USER_KEY;
use crate::error::AppError;

/// Guard requiring a logged-in session.
pub struct LoginCheck;

impl<S, B> Transform<S, ServiceRequest> for LoginCheck
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = LoginCheckService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(LoginCheckService { service }))
    }
}

pub struct LoginCheckService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for LoginCheckService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let logged_in = matches!(
            req.get_session().get::<i64>(SESSION_USER_KEY),
            Ok(Some(_))
        );
        if logged_in {
            let fut = self.service.call(req);
            Box::pin(fut)
        } else {
            Box::pin(ready(Err(AppError::LoginRequired.into())))
        }
    }
}

/// Guard requiring the session user to own the task referenced by `{id}`.
pub struct CheckUser;

impl<S, B> Transform<S, ServiceRequest> for CheckUser
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = CheckUserService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CheckUserService {
            service: Rc::new(service),
        }))
    }
}

pub struct CheckUserService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for CheckUserService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        Box::pin(async move {
            // An unparsable id degrades to 0, which owns nothing and can
            // never match a real session id.
            let task_id: i64 = req
                .match_info()
                .get("id")
                .unwrap_or_default()
                .parse()
                .unwrap_or(0);

            let pool = req
                .app_data::<web::Data<PgPool>>()
                .cloned()
                .ok_or_else(|| {
                    AppError::InternalServerError("database pool is not configured".into())
                })?;

            let owner_id: i64 = sqlx::query_as::<_, (i64,)>(
                "SELECT user_id FROM tasks INNER JOIN ownership ON task_id = id WHERE task_id = $1",
            )
            .bind(task_id)
            .fetch_optional(pool.get_ref())
            .await
            .map_err(AppError::from)?
            .map(|(user_id,)| user_id)
            .unwrap_or(0);

            let session_user = req
                .get_session()
                .get::<i64>(SESSION_USER_KEY)
                .map_err(AppError::from)?;

            if session_user == Some(owner_id) {
                service.call(req).await
            } else {
                Err(AppError::NotOwner.into())
            }
        })
    }
}
