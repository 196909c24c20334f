use actix_web::{HttpResponse, Responder, get, post, web};
use serde::Deserialize;

use crate::forms::cart::{AddCartItemForm, CheckoutForm, RemoveCartItemForm};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::cart as cart_service;

#[derive(Debug, Deserialize)]
pub struct CartQuery {
    /// Buyer phone identifying the cart, in any accepted Indian format.
    pub phone: String,
}

#[get("/store/{seller_slug}/cart")]
pub async fn view_cart(
    repo: web::Data<DieselRepository>,
    path: web::Path<String>,
    params: web::Query<CartQuery>,
) -> impl Responder {
    match cart_service::view_cart(repo.get_ref(), &path.into_inner(), &params.phone) {
        Ok(cart) => HttpResponse::Ok().json(cart),
        Err(error) => error_response(error),
    }
}

#[post("/store/{seller_slug}/cart/items")]
pub async fn add_item(
    repo: web::Data<DieselRepository>,
    path: web::Path<String>,
    form: web::Json<AddCartItemForm>,
) -> impl Responder {
    match cart_service::add_item(repo.get_ref(), &path.into_inner(), form.into_inner()) {
        Ok(cart) => HttpResponse::Ok().json(cart),
        Err(error) => error_response(error),
    }
}

#[post("/store/{seller_slug}/cart/items/remove")]
pub async fn remove_item(
    repo: web::Data<DieselRepository>,
    path: web::Path<String>,
    form: web::Json<RemoveCartItemForm>,
) -> impl Responder {
    match cart_service::remove_item(repo.get_ref(), &path.into_inner(), form.into_inner()) {
        Ok(cart) => HttpResponse::Ok().json(cart),
        Err(error) => error_response(error),
    }
}

#[post("/store/{seller_slug}/checkout")]
pub async fn checkout(
    repo: web::Data<DieselRepository>,
    tera: web::Data<tera::Tera>,
    path: web::Path<String>,
    form: web::Json<CheckoutForm>,
) -> impl Responder {
    match cart_service::checkout(
        repo.get_ref(),
        tera.get_ref(),
        &path.into_inner(),
        form.into_inner(),
    ) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(error) => error_response(error),
    }
}
