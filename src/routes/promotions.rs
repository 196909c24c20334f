use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::forms::promotions::{AddPromotionForm, EditPromotionForm};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::promotions as promotion_service;
use crate::services::promotions::PromotionsQuery;

#[get("/promotions")]
pub async fn list_promotions(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    params: web::Query<PromotionsQuery>,
) -> impl Responder {
    match promotion_service::list_promotions(repo.get_ref(), &user, params.into_inner()) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(error) => error_response(error),
    }
}

#[post("/promotions")]
pub async fn create_promotion(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<AddPromotionForm>,
) -> impl Responder {
    match promotion_service::create_promotion(repo.get_ref(), &user, form.into_inner()) {
        Ok(promotion) => HttpResponse::Created().json(promotion),
        Err(error) => error_response(error),
    }
}

#[put("/promotions/{promotion_id}")]
pub async fn update_promotion(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
    form: web::Json<EditPromotionForm>,
) -> impl Responder {
    match promotion_service::update_promotion(
        repo.get_ref(),
        &user,
        path.into_inner(),
        form.into_inner(),
    ) {
        Ok(promotion) => HttpResponse::Ok().json(promotion),
        Err(error) => error_response(error),
    }
}

#[delete("/promotions/{promotion_id}")]
pub async fn delete_promotion(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
) -> impl Responder {
    match promotion_service::delete_promotion(repo.get_ref(), &user, path.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(error) => error_response(error),
    }
}
