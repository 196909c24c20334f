use chrono::{Duration, Utc};
use serde::Deserialize;

use crate::ADMIN_ROLE;
use crate::auth::{AuthenticatedUser, check_role};
use crate::domain::seller::{Seller, SellerFlags, SellerListQuery};
use crate::forms::admin::{ExtendTrialForm, SetFlagForm};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{SellerReader, SellerWriter};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the admin seller list.
#[derive(Debug, Default, Deserialize)]
pub struct SellersQuery {
    /// Optional name, store or email search term.
    pub search: Option<String>,
    /// Page requested by the client (1-based).
    pub page: Option<usize>,
    /// Whether deactivated accounts should be included.
    #[serde(default)]
    pub show_inactive: bool,
}

fn require_admin(user: &AuthenticatedUser) -> ServiceResult<()> {
    if !check_role(ADMIN_ROLE, user) {
        return Err(ServiceError::Unauthorized);
    }
    Ok(())
}

/// List seller accounts for the admin panel.
pub fn list_sellers<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: SellersQuery,
) -> ServiceResult<Paginated<Seller>>
where
    R: SellerReader + ?Sized,
{
    require_admin(user)?;

    let page = query.page.unwrap_or(1);
    let mut list_query = SellerListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = query.search.as_ref() {
        list_query = list_query.search(term);
    }
    if query.show_inactive {
        list_query = list_query.include_inactive();
    }

    let (total, items) = repo.list_sellers(list_query)?;
    Ok(Paginated::new(items, page, total, DEFAULT_ITEMS_PER_PAGE))
}

/// Approve a pending seller account.
pub fn approve_seller<R>(repo: &R, user: &AuthenticatedUser, seller_id: i32) -> ServiceResult<Seller>
where
    R: SellerReader + SellerWriter + ?Sized,
{
    require_admin(user)?;
    ensure_seller_exists(repo, seller_id)?;

    let flags = SellerFlags {
        is_approved: Some(true),
        ..SellerFlags::default()
    };
    Ok(repo.set_seller_flags(seller_id, &flags)?)
}

/// Activate or deactivate a seller account.
pub fn set_seller_active<R>(
    repo: &R,
    user: &AuthenticatedUser,
    seller_id: i32,
    form: SetFlagForm,
) -> ServiceResult<Seller>
where
    R: SellerReader + SellerWriter + ?Sized,
{
    require_admin(user)?;
    ensure_seller_exists(repo, seller_id)?;

    let flags = SellerFlags {
        is_active: Some(form.enabled),
        ..SellerFlags::default()
    };
    Ok(repo.set_seller_flags(seller_id, &flags)?)
}

/// Allow or forbid a seller to send broadcasts.
pub fn set_broadcasts_enabled<R>(
    repo: &R,
    user: &AuthenticatedUser,
    seller_id: i32,
    form: SetFlagForm,
) -> ServiceResult<Seller>
where
    R: SellerReader + SellerWriter + ?Sized,
{
    require_admin(user)?;
    ensure_seller_exists(repo, seller_id)?;

    let flags = SellerFlags {
        broadcasts_enabled: Some(form.enabled),
        ..SellerFlags::default()
    };
    Ok(repo.set_seller_flags(seller_id, &flags)?)
}

/// Extend a seller's trial window by a number of days.
///
/// Extension is relative to the current trial end when it is still in the
/// future, otherwise relative to now, so expired accounts come back for the
/// whole extension.
pub fn extend_trial<R>(
    repo: &R,
    user: &AuthenticatedUser,
    seller_id: i32,
    form: ExtendTrialForm,
) -> ServiceResult<Seller>
where
    R: SellerReader + SellerWriter + ?Sized,
{
    require_admin(user)?;
    let form = form
        .checked()
        .map_err(|error| ServiceError::Form(error.to_string()))?;

    let seller = repo
        .get_seller_by_id(seller_id)?
        .ok_or(ServiceError::NotFound)?;

    let now = Utc::now().naive_utc();
    let base = seller.trial_ends_at.max(now);
    let ends_at = base + Duration::days(form.days);

    Ok(repo.set_trial_end(seller_id, ends_at)?)
}

fn ensure_seller_exists<R>(repo: &R, seller_id: i32) -> ServiceResult<()>
where
    R: SellerReader + ?Sized,
{
    repo.get_seller_by_id(seller_id)?
        .ok_or(ServiceError::NotFound)?;
    Ok(())
}
