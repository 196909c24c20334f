use actix_web::{HttpResponse, Responder, get, web};

use crate::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::feed as feed_service;
use crate::services::storefront as storefront_service;
use crate::services::storefront::StoreQuery;

#[get("/store/{seller_slug}")]
pub async fn get_store(
    repo: web::Data<DieselRepository>,
    path: web::Path<String>,
    params: web::Query<StoreQuery>,
) -> impl Responder {
    match storefront_service::get_store(repo.get_ref(), &path.into_inner(), params.into_inner()) {
        Ok(store) => HttpResponse::Ok().json(store),
        Err(error) => error_response(error),
    }
}

#[get("/store/{seller_slug}/products/{product_slug}")]
pub async fn get_store_product(
    repo: web::Data<DieselRepository>,
    path: web::Path<(String, String)>,
) -> impl Responder {
    let (seller_slug, product_slug) = path.into_inner();
    match storefront_service::get_store_product(repo.get_ref(), &seller_slug, &product_slug) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(error) => error_response(error),
    }
}

#[get("/feed/{seller_slug}/feed.xml")]
pub async fn merchant_feed(
    repo: web::Data<DieselRepository>,
    tera: web::Data<tera::Tera>,
    config: web::Data<ServerConfig>,
    path: web::Path<String>,
) -> impl Responder {
    match feed_service::render_feed(
        repo.get_ref(),
        tera.get_ref(),
        &path.into_inner(),
        &config.base_url,
    ) {
        Ok(xml) => HttpResponse::Ok()
            .content_type("application/xml; charset=utf-8")
            .body(xml),
        Err(error) => error_response(error),
    }
}
