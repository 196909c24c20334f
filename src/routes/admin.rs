use actix_web::{HttpResponse, Responder, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::forms::admin::{ExtendTrialForm, SetFlagForm};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::admin as admin_service;
use crate::services::admin::SellersQuery;

#[get("/admin/sellers")]
pub async fn list_sellers(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    params: web::Query<SellersQuery>,
) -> impl Responder {
    match admin_service::list_sellers(repo.get_ref(), &user, params.into_inner()) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(error) => error_response(error),
    }
}

#[post("/admin/sellers/{seller_id}/approve")]
pub async fn approve_seller(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
) -> impl Responder {
    match admin_service::approve_seller(repo.get_ref(), &user, path.into_inner()) {
        Ok(seller) => HttpResponse::Ok().json(seller),
        Err(error) => error_response(error),
    }
}

#[put("/admin/sellers/{seller_id}/active")]
pub async fn set_seller_active(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
    form: web::Json<SetFlagForm>,
) -> impl Responder {
    match admin_service::set_seller_active(
        repo.get_ref(),
        &user,
        path.into_inner(),
        form.into_inner(),
    ) {
        Ok(seller) => HttpResponse::Ok().json(seller),
        Err(error) => error_response(error),
    }
}

#[put("/admin/sellers/{seller_id}/broadcasts")]
pub async fn set_broadcasts_enabled(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
    form: web::Json<SetFlagForm>,
) -> impl Responder {
    match admin_service::set_broadcasts_enabled(
        repo.get_ref(),
        &user,
        path.into_inner(),
        form.into_inner(),
    ) {
        Ok(seller) => HttpResponse::Ok().json(seller),
        Err(error) => error_response(error),
    }
}

#[put("/admin/sellers/{seller_id}/trial")]
pub async fn extend_trial(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
    form: web::Json<ExtendTrialForm>,
) -> impl Responder {
    match admin_service::extend_trial(repo.get_ref(), &user, path.into_inner(), form.into_inner()) {
        Ok(seller) => HttpResponse::Ok().json(seller),
        Err(error) => error_response(error),
    }
}
