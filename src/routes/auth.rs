use actix_web::{HttpResponse, Responder, post, web};

use crate::config::ServerConfig;
use crate::forms::auth::{LoginForm, RegisterForm};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::auth as auth_service;

#[post("/auth/register")]
/// Create a seller account. The account stays closed to buyers until an
/// admin approves it.
pub async fn register(
    repo: web::Data<DieselRepository>,
    form: web::Json<RegisterForm>,
) -> impl Responder {
    match auth_service::register(repo.get_ref(), form.into_inner()) {
        Ok(seller) => HttpResponse::Created().json(seller),
        Err(error) => error_response(error),
    }
}

#[post("/auth/login")]
/// Exchange credentials for a bearer token.
pub async fn login(
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
    form: web::Json<LoginForm>,
) -> impl Responder {
    match auth_service::login(repo.get_ref(), form.into_inner(), &config.secret) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(error) => error_response(error),
    }
}
