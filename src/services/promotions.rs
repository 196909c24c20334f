use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::domain::promotion::{Promotion, PromotionListQuery};
use crate::forms::promotions::{AddPromotionForm, EditPromotionForm};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{PromotionReader, PromotionWriter, SellerReader};
use crate::services::auth::require_active_seller;
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the promotion list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct PromotionsQuery {
    /// Page requested by the client (1-based).
    pub page: Option<usize>,
}

/// List the seller's promotions, oldest first.
pub fn list_promotions<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: PromotionsQuery,
) -> ServiceResult<Paginated<Promotion>>
where
    R: SellerReader + PromotionReader + ?Sized,
{
    let seller = require_active_seller(repo, user)?;

    let page = query.page.unwrap_or(1);
    let list_query = PromotionListQuery::new(seller.id).paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let (total, items) = repo.list_promotions(list_query)?;
    Ok(Paginated::new(items, page, total, DEFAULT_ITEMS_PER_PAGE))
}

/// Create a promotion for the seller.
pub fn create_promotion<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddPromotionForm,
) -> ServiceResult<Promotion>
where
    R: SellerReader + PromotionWriter + ?Sized,
{
    let seller = require_active_seller(repo, user)?;

    let new_promotion = form
        .into_new_promotion(seller.id)
        .map_err(|error| ServiceError::Form(error.to_string()))?;

    Ok(repo.create_promotion(&new_promotion)?)
}

/// Apply a patch to one of the seller's promotions.
pub fn update_promotion<R>(
    repo: &R,
    user: &AuthenticatedUser,
    promotion_id: i32,
    form: EditPromotionForm,
) -> ServiceResult<Promotion>
where
    R: SellerReader + PromotionReader + PromotionWriter + ?Sized,
{
    let seller = require_active_seller(repo, user)?;

    let current = repo
        .get_promotion_by_id(promotion_id, seller.id)?
        .ok_or(ServiceError::NotFound)?;

    let updates = form
        .into_update_promotion(&current)
        .map_err(|error| ServiceError::Form(error.to_string()))?;

    Ok(repo.update_promotion(promotion_id, seller.id, &updates)?)
}

/// Delete one of the seller's promotions.
pub fn delete_promotion<R>(
    repo: &R,
    user: &AuthenticatedUser,
    promotion_id: i32,
) -> ServiceResult<()>
where
    R: SellerReader + PromotionWriter + ?Sized,
{
    let seller = require_active_seller(repo, user)?;
    repo.delete_promotion(promotion_id, seller.id)?;
    Ok(())
}
