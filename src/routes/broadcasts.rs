use actix_web::{HttpResponse, Responder, get, post, web};
use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::forms::broadcasts::{NewBroadcastForm, ScheduleBroadcastForm, SubscribeForm};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::broadcasts as broadcast_service;
use crate::services::broadcasts::PageQuery;

#[derive(Debug, Deserialize)]
pub struct UnsubscribeForm {
    pub phone: String,
}

#[post("/store/{seller_slug}/subscribe")]
pub async fn subscribe(
    repo: web::Data<DieselRepository>,
    path: web::Path<String>,
    form: web::Json<SubscribeForm>,
) -> impl Responder {
    match broadcast_service::subscribe(repo.get_ref(), &path.into_inner(), form.into_inner()) {
        Ok(subscriber) => HttpResponse::Created().json(subscriber),
        Err(error) => error_response(error),
    }
}

#[post("/store/{seller_slug}/unsubscribe")]
pub async fn unsubscribe(
    repo: web::Data<DieselRepository>,
    path: web::Path<String>,
    form: web::Json<UnsubscribeForm>,
) -> impl Responder {
    match broadcast_service::unsubscribe(repo.get_ref(), &path.into_inner(), &form.phone) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(error) => error_response(error),
    }
}

#[get("/subscribers")]
pub async fn list_subscribers(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    params: web::Query<PageQuery>,
) -> impl Responder {
    match broadcast_service::list_subscribers(repo.get_ref(), &user, params.into_inner()) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(error) => error_response(error),
    }
}

#[get("/broadcasts")]
pub async fn list_broadcasts(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    params: web::Query<PageQuery>,
) -> impl Responder {
    match broadcast_service::list_broadcasts(repo.get_ref(), &user, params.into_inner()) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(error) => error_response(error),
    }
}

#[post("/broadcasts")]
pub async fn create_broadcast(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<NewBroadcastForm>,
) -> impl Responder {
    match broadcast_service::create_broadcast(repo.get_ref(), &user, form.into_inner()) {
        Ok(broadcast) => HttpResponse::Created().json(broadcast),
        Err(error) => error_response(error),
    }
}

#[post("/broadcasts/{broadcast_id}/schedule")]
pub async fn schedule_broadcast(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
    form: web::Json<ScheduleBroadcastForm>,
) -> impl Responder {
    match broadcast_service::schedule_broadcast(
        repo.get_ref(),
        &user,
        path.into_inner(),
        form.into_inner(),
    ) {
        Ok(broadcast) => HttpResponse::Ok().json(broadcast),
        Err(error) => error_response(error),
    }
}

#[post("/broadcasts/{broadcast_id}/send")]
pub async fn send_broadcast(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
) -> impl Responder {
    match broadcast_service::send_broadcast(repo.get_ref(), &user, path.into_inner()) {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(error) => error_response(error),
    }
}
