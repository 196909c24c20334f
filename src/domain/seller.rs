use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// Domain representation of a seller account and its microsite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seller {
    /// Unique identifier of the seller.
    pub id: i32,
    /// Contact name of the account owner.
    pub name: String,
    /// Login email, unique across the platform.
    pub email: String,
    /// Bcrypt hash of the login password. Never serialized to clients.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Normalized WhatsApp phone number in `+91…` form.
    pub phone: String,
    /// Globally unique microsite alias.
    pub slug: String,
    /// Display name of the storefront.
    pub store_name: String,
    /// Optional storefront description.
    pub description: Option<String>,
    /// Optional URL of the uploaded logo.
    pub logo_url: Option<String>,
    /// Optional URL of the uploaded banner.
    pub banner_url: Option<String>,
    /// Account role, `seller` or `admin`.
    pub role: String,
    /// Whether an admin has approved the account.
    pub is_approved: bool,
    /// Admin kill switch for the whole account.
    pub is_active: bool,
    /// Admin toggle allowing the seller to send broadcasts.
    pub broadcasts_enabled: bool,
    /// End of the trial/subscription window.
    pub trial_ends_at: NaiveDateTime,
    /// Timestamp for when the seller record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the seller record.
    pub updated_at: NaiveDateTime,
}

impl Seller {
    /// Whether the trial/subscription window has lapsed at `now`.
    pub fn trial_expired(&self, now: NaiveDateTime) -> bool {
        now > self.trial_ends_at
    }

    /// Whether the microsite may serve buyers: approved, active and within
    /// the validity window.
    pub fn storefront_open(&self, now: NaiveDateTime) -> bool {
        self.is_approved && self.is_active && !self.trial_expired(now)
    }
}

/// Payload required to insert a new seller.
#[derive(Debug, Clone)]
pub struct NewSeller {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    /// Normalized phone number.
    pub phone: String,
    /// Microsite alias, already made unique by the caller.
    pub slug: String,
    pub store_name: String,
    pub description: Option<String>,
    /// End of the initial trial window.
    pub trial_ends_at: NaiveDateTime,
}

/// Patch data applied when updating an existing seller.
///
/// `None` fields are left untouched; admin flags have dedicated repository
/// operations and are not part of this patch.
#[derive(Debug, Clone, Default)]
pub struct UpdateSeller {
    pub name: Option<String>,
    pub store_name: Option<String>,
    pub description: Option<Option<String>>,
    pub phone: Option<String>,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
}

impl UpdateSeller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn store_name(mut self, store_name: impl Into<String>) -> Self {
        self.store_name = Some(store_name.into());
        self
    }

    /// Update the description, using `None` to clear an existing value.
    pub fn description(mut self, description: Option<impl Into<String>>) -> Self {
        self.description = Some(description.map(|value| value.into()));
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn logo_url(mut self, url: impl Into<String>) -> Self {
        self.logo_url = Some(url.into());
        self
    }

    pub fn banner_url(mut self, url: impl Into<String>) -> Self {
        self.banner_url = Some(url.into());
        self
    }
}

/// Admin-controlled account flags.
#[derive(Debug, Clone, Default)]
pub struct SellerFlags {
    pub is_approved: Option<bool>,
    pub is_active: Option<bool>,
    pub broadcasts_enabled: Option<bool>,
}

/// Query definition used by the admin panel to list sellers.
#[derive(Debug, Clone)]
pub struct SellerListQuery {
    /// Optional name, store name or email search term.
    pub search: Option<String>,
    /// Whether deactivated accounts should be included.
    pub include_inactive: bool,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl Default for SellerListQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl SellerListQuery {
    pub fn new() -> Self {
        Self {
            search: None,
            include_inactive: false,
            pagination: None,
        }
    }

    /// Filter the results by a search term applied to name, store or email.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Include deactivated sellers in the results.
    pub fn include_inactive(mut self) -> Self {
        self.include_inactive = true;
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination::new(page, per_page));
        self
    }
}
