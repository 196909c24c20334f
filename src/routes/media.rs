use actix_multipart::form::MultipartForm;
use actix_multipart::form::tempfile::TempFile;
use actix_web::{HttpResponse, Responder, post, web};
use serde_json::json;
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::config::ServerConfig;
use crate::domain::seller::UpdateSeller;
use crate::forms::images::{ImageKind, validate_image};
use crate::repository::{DieselRepository, SellerWriter};
use crate::routes::error_response;
use crate::services::ServiceError;
use crate::services::auth::require_active_seller;

/// Multipart payload for image uploads: one file per request.
#[derive(Debug, MultipartForm)]
pub struct ImageUpload {
    #[multipart(limit = "5MB")]
    pub file: TempFile,
}

fn parse_kind(raw: &str) -> Option<ImageKind> {
    match raw {
        "logo" => Some(ImageKind::Logo),
        "banner" => Some(ImageKind::Banner),
        "product" => Some(ImageKind::Product),
        _ => None,
    }
}

/// Validate the upload against its context thresholds and persist it under a
/// fresh name. Returns the public URL of the stored file.
fn store_image(
    config: &ServerConfig,
    kind: ImageKind,
    upload: &TempFile,
) -> Result<String, ServiceError> {
    let bytes = std::fs::read(upload.file.path())
        .map_err(|error| ServiceError::Internal(format!("failed to read upload: {error}")))?;

    validate_image(kind, &bytes).map_err(|error| ServiceError::Form(error.to_string()))?;

    let extension = image::guess_format(&bytes)
        .ok()
        .and_then(|format| format.extensions_str().first().copied())
        .unwrap_or("bin");
    let file_name = format!("{}.{extension}", Uuid::new_v4());

    std::fs::create_dir_all(&config.upload_dir)
        .map_err(|error| ServiceError::Internal(format!("failed to create upload dir: {error}")))?;
    let path = std::path::Path::new(&config.upload_dir).join(&file_name);
    std::fs::write(&path, &bytes)
        .map_err(|error| ServiceError::Internal(format!("failed to store upload: {error}")))?;

    Ok(format!("{}/uploads/{file_name}", config.base_url))
}

/// Upload an image for the given context (`logo`, `banner` or `product`).
///
/// Logo and banner uploads are attached to the seller's storefront directly;
/// product uploads return the URL to be set on a product separately.
#[post("/media/{kind}")]
pub async fn upload_image(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
    path: web::Path<String>,
    MultipartForm(upload): MultipartForm<ImageUpload>,
) -> impl Responder {
    let kind = match parse_kind(&path.into_inner()) {
        Some(kind) => kind,
        None => {
            return error_response(ServiceError::Form(
                "image kind must be logo, banner or product".to_string(),
            ));
        }
    };

    let seller = match require_active_seller(repo.get_ref(), &user) {
        Ok(seller) => seller,
        Err(error) => return error_response(error),
    };

    let url = match store_image(config.get_ref(), kind, &upload.file) {
        Ok(url) => url,
        Err(error) => return error_response(error),
    };

    let updates = match kind {
        ImageKind::Logo => Some(UpdateSeller::new().logo_url(url.clone())),
        ImageKind::Banner => Some(UpdateSeller::new().banner_url(url.clone())),
        ImageKind::Product => None,
    };
    if let Some(updates) = updates {
        if let Err(error) = repo.update_seller(seller.id, &updates) {
            return error_response(error.into());
        }
    }

    HttpResponse::Created().json(json!({ "url": url }))
}
