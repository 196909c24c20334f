use actix_multipart::form::MultipartForm;
use actix_multipart::form::tempfile::TempFile;
use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::forms::products::{AddProductForm, EditProductForm, UploadProductsForm};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::ServiceError;
use crate::services::products as product_service;
use crate::services::products::ProductsQuery;

/// Multipart payload for the bulk upload endpoint: one spreadsheet or CSV
/// file per request.
#[derive(Debug, MultipartForm)]
pub struct SpreadsheetUpload {
    #[multipart(limit = "10MB")]
    pub file: TempFile,
}

#[get("/products")]
pub async fn list_products(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    params: web::Query<ProductsQuery>,
) -> impl Responder {
    match product_service::list_products(repo.get_ref(), &user, params.into_inner()) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(error) => error_response(error),
    }
}

#[get("/products/{product_id}")]
pub async fn get_product(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
) -> impl Responder {
    match product_service::get_product(repo.get_ref(), &user, path.into_inner()) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(error) => error_response(error),
    }
}

#[post("/products")]
pub async fn create_product(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<AddProductForm>,
) -> impl Responder {
    match product_service::create_product(repo.get_ref(), &user, form.into_inner()) {
        Ok(product) => HttpResponse::Created().json(product),
        Err(error) => error_response(error),
    }
}

#[put("/products/{product_id}")]
pub async fn update_product(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
    form: web::Json<EditProductForm>,
) -> impl Responder {
    match product_service::update_product(repo.get_ref(), &user, path.into_inner(), form.into_inner())
    {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(error) => error_response(error),
    }
}

#[delete("/products/{product_id}")]
pub async fn delete_product(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
) -> impl Responder {
    match product_service::delete_product(repo.get_ref(), &user, path.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(error) => error_response(error),
    }
}

#[post("/products/upload")]
pub async fn upload_products(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    MultipartForm(upload): MultipartForm<SpreadsheetUpload>,
) -> impl Responder {
    let bytes = match std::fs::read(upload.file.file.path()) {
        Ok(bytes) => bytes,
        Err(error) => {
            return error_response(ServiceError::Internal(format!(
                "failed to read uploaded file: {error}"
            )));
        }
    };

    let form = UploadProductsForm::new(upload.file.file_name, bytes);
    match product_service::import_products(repo.get_ref(), &user, form) {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(error) => error_response(error),
    }
}
