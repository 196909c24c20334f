use actix_web::{HttpResponse, Responder, get, post, web};

use crate::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::analytics as analytics_service;
use crate::services::analytics::{RecordEventForm, SummaryQuery};

#[post("/store/{seller_slug}/events")]
pub async fn record_event(
    repo: web::Data<DieselRepository>,
    path: web::Path<String>,
    form: web::Json<RecordEventForm>,
) -> impl Responder {
    match analytics_service::record_event(repo.get_ref(), &path.into_inner(), form.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(error) => error_response(error),
    }
}

#[get("/analytics/summary")]
pub async fn summarize(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    params: web::Query<SummaryQuery>,
) -> impl Responder {
    match analytics_service::summarize(repo.get_ref(), &user, params.into_inner()) {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(error) => error_response(error),
    }
}
