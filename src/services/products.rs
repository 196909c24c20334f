use serde::{Deserialize, Serialize};

use crate::auth::AuthenticatedUser;
use crate::domain::product::{Product, ProductListQuery};
use crate::forms::products::{AddProductForm, EditProductForm, RowError, UploadProductsForm};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{ProductReader, ProductWriter, SellerReader};
use crate::services::auth::require_active_seller;
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the product list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    /// Optional name or description search term.
    pub search: Option<String>,
    /// Page requested by the client (1-based).
    pub page: Option<usize>,
    /// Whether archived items should be included in the response.
    #[serde(default)]
    pub show_archived: bool,
}

/// List the seller's own catalog.
pub fn list_products<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ProductsQuery,
) -> ServiceResult<Paginated<Product>>
where
    R: SellerReader + ProductReader + ?Sized,
{
    let seller = require_active_seller(repo, user)?;

    let page = query.page.unwrap_or(1);
    let mut list_query = ProductListQuery::new(seller.id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = query.search.as_ref() {
        list_query = list_query.search(term);
    }
    if query.show_archived {
        list_query = list_query.include_archived();
    }

    let (total, items) = repo.list_products(list_query)?;
    Ok(Paginated::new(items, page, total, DEFAULT_ITEMS_PER_PAGE))
}

/// Fetch one of the seller's products.
pub fn get_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
) -> ServiceResult<Product>
where
    R: SellerReader + ProductReader + ?Sized,
{
    let seller = require_active_seller(repo, user)?;
    repo.get_product_by_id(product_id, seller.id)?
        .ok_or(ServiceError::NotFound)
}

/// Create a product in the seller's catalog.
pub fn create_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddProductForm,
) -> ServiceResult<Product>
where
    R: SellerReader + ProductReader + ProductWriter + ?Sized,
{
    let seller = require_active_seller(repo, user)?;

    let new_product = form
        .into_new_product(seller.id)
        .map_err(|error| ServiceError::Form(error.to_string()))?;

    Ok(repo.create_product(&new_product)?)
}

/// Apply a patch to one of the seller's products.
pub fn update_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
    form: EditProductForm,
) -> ServiceResult<Product>
where
    R: SellerReader + ProductReader + ProductWriter + ?Sized,
{
    let seller = require_active_seller(repo, user)?;

    let updates = form
        .into_update_product()
        .map_err(|error| ServiceError::Form(error.to_string()))?;

    Ok(repo.update_product(product_id, seller.id, &updates)?)
}

/// Delete one of the seller's products.
pub fn delete_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
) -> ServiceResult<()>
where
    R: SellerReader + ProductWriter + ?Sized,
{
    let seller = require_active_seller(repo, user)?;
    repo.delete_product(product_id, seller.id)?;
    Ok(())
}

/// One successfully imported row of a bulk upload.
#[derive(Debug, Serialize)]
pub struct ImportedRow {
    /// 1-based spreadsheet row number, header included.
    pub row: usize,
    pub product: Product,
}

/// Per-row outcome report returned by the bulk upload endpoint.
#[derive(Debug, Serialize)]
pub struct ImportReport {
    pub created: Vec<ImportedRow>,
    pub errors: Vec<RowError>,
}

/// Import products from an uploaded spreadsheet, row by row. Parse failures
/// and insert failures are reported per row; valid rows are still inserted.
pub fn import_products<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: UploadProductsForm,
) -> ServiceResult<ImportReport>
where
    R: SellerReader + ProductWriter + ?Sized,
{
    let seller = require_active_seller(repo, user)?;

    let parsed = form
        .parse(seller.id)
        .map_err(|error| ServiceError::Form(error.to_string()))?;

    let mut report = ImportReport {
        created: Vec::with_capacity(parsed.products.len()),
        errors: parsed.errors,
    };

    for (row, new_product) in parsed.products {
        match repo.create_product(&new_product) {
            Ok(product) => report.created.push(ImportedRow { row, product }),
            Err(error) => report.errors.push(RowError {
                row,
                reason: error.to_string(),
            }),
        }
    }

    report.errors.sort_by_key(|error| error.row);
    Ok(report)
}
