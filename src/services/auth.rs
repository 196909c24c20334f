use chrono::{Duration, NaiveDateTime, Utc};
use serde::Serialize;

use crate::auth::AuthenticatedUser;
use crate::domain::seller::{NewSeller, Seller};
use crate::forms::auth::{LoginForm, RegisterForm};
use crate::normalize::{normalize_indian_phone, slugify};
use crate::repository::{SellerReader, SellerWriter};
use crate::services::{ServiceError, ServiceResult};
use crate::{SELLER_ROLE, TRIAL_DAYS};

/// Response payload returned by a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub seller: Seller,
}

/// Register a new seller account with a fresh trial window.
///
/// The account starts unapproved; an admin has to approve it before the
/// storefront opens.
pub fn register<R>(repo: &R, form: RegisterForm) -> ServiceResult<Seller>
where
    R: SellerReader + SellerWriter + ?Sized,
{
    let registration = form
        .into_registration()
        .map_err(|error| ServiceError::Form(error.to_string()))?;

    let phone = normalize_indian_phone(&registration.phone)
        .map_err(|error| ServiceError::Form(error.to_string()))?;

    if repo.get_seller_by_email(&registration.email)?.is_some() {
        return Err(ServiceError::Conflict(format!(
            "an account with email {} already exists",
            registration.email
        )));
    }

    let password_hash = bcrypt::hash(&registration.password, bcrypt::DEFAULT_COST)
        .map_err(|error| ServiceError::Internal(error.to_string()))?;

    let new_seller = NewSeller {
        name: registration.name,
        email: registration.email,
        password_hash,
        phone,
        slug: slugify(&registration.store_name),
        store_name: registration.store_name,
        description: registration.description,
        trial_ends_at: Utc::now().naive_utc() + Duration::days(TRIAL_DAYS),
    };

    Ok(repo.create_seller(&new_seller)?)
}

/// Verify credentials and issue a bearer token.
pub fn login<R>(repo: &R, form: LoginForm, secret: &str) -> ServiceResult<LoginResponse>
where
    R: SellerReader + ?Sized,
{
    let email = form
        .normalized_email()
        .map_err(|error| ServiceError::Form(error.to_string()))?;

    let seller = repo
        .get_seller_by_email(&email)?
        .ok_or(ServiceError::Unauthorized)?;

    let verified = bcrypt::verify(&form.password, &seller.password_hash)
        .map_err(|error| ServiceError::Internal(error.to_string()))?;
    if !verified {
        return Err(ServiceError::Unauthorized);
    }

    if !seller.is_active {
        return Err(ServiceError::Forbidden(
            "this account has been deactivated".to_string(),
        ));
    }

    let claims = AuthenticatedUser::new(seller.id, &seller.email, &seller.role);
    let token = claims
        .to_token(secret)
        .map_err(|error| ServiceError::Internal(error.to_string()))?;

    Ok(LoginResponse { token, seller })
}

/// Load the seller behind the token and enforce the dashboard gate: seller
/// role, approved, active, trial not expired.
pub fn require_active_seller<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Seller>
where
    R: SellerReader + ?Sized,
{
    if !crate::auth::check_role(SELLER_ROLE, user) {
        return Err(ServiceError::Unauthorized);
    }

    let seller = repo
        .get_seller_by_id(user.seller_id)?
        .ok_or(ServiceError::Unauthorized)?;

    ensure_seller_usable(&seller, Utc::now().naive_utc())?;
    Ok(seller)
}

/// The gate applied to every seller dashboard operation.
pub fn ensure_seller_usable(seller: &Seller, now: NaiveDateTime) -> ServiceResult<()> {
    if !seller.is_active {
        return Err(ServiceError::Forbidden(
            "this account has been deactivated".to_string(),
        ));
    }
    if !seller.is_approved {
        return Err(ServiceError::Forbidden(
            "this account is awaiting admin approval".to_string(),
        ));
    }
    if seller.trial_expired(now) {
        return Err(ServiceError::Forbidden(
            "the trial period for this account has ended".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::mock::{MockSellerReader, MockSellerWriter};

    fn seller_fixture() -> Seller {
        let now = Utc::now().naive_utc();
        Seller {
            id: 1,
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            password_hash: bcrypt::hash("correct-horse", 4).unwrap(),
            phone: "+919876543210".to_string(),
            slug: "ashas-boutique".to_string(),
            store_name: "Asha's Boutique".to_string(),
            description: None,
            logo_url: None,
            banner_url: None,
            role: SELLER_ROLE.to_string(),
            is_approved: true,
            is_active: true,
            broadcasts_enabled: false,
            trial_ends_at: now + Duration::days(7),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn register_rejects_duplicate_email() {
        struct FakeRepo(MockSellerReader, MockSellerWriter);
        impl SellerReader for FakeRepo {
            fn get_seller_by_id(&self, id: i32) -> crate::repository::RepositoryResult<Option<Seller>> {
                self.0.get_seller_by_id(id)
            }
            fn get_seller_by_email(
                &self,
                email: &str,
            ) -> crate::repository::RepositoryResult<Option<Seller>> {
                self.0.get_seller_by_email(email)
            }
            fn get_seller_by_slug(
                &self,
                slug: &str,
            ) -> crate::repository::RepositoryResult<Option<Seller>> {
                self.0.get_seller_by_slug(slug)
            }
            fn list_sellers(
                &self,
                query: crate::domain::seller::SellerListQuery,
            ) -> crate::repository::RepositoryResult<(usize, Vec<Seller>)> {
                self.0.list_sellers(query)
            }
        }
        impl SellerWriter for FakeRepo {
            fn create_seller(
                &self,
                new_seller: &NewSeller,
            ) -> crate::repository::RepositoryResult<Seller> {
                self.1.create_seller(new_seller)
            }
            fn update_seller(
                &self,
                seller_id: i32,
                updates: &crate::domain::seller::UpdateSeller,
            ) -> crate::repository::RepositoryResult<Seller> {
                self.1.update_seller(seller_id, updates)
            }
            fn set_seller_flags(
                &self,
                seller_id: i32,
                flags: &crate::domain::seller::SellerFlags,
            ) -> crate::repository::RepositoryResult<Seller> {
                self.1.set_seller_flags(seller_id, flags)
            }
            fn set_trial_end(
                &self,
                seller_id: i32,
                ends_at: NaiveDateTime,
            ) -> crate::repository::RepositoryResult<Seller> {
                self.1.set_trial_end(seller_id, ends_at)
            }
        }

        let mut reader = MockSellerReader::new();
        reader
            .expect_get_seller_by_email()
            .returning(|_| Ok(Some(seller_fixture())));
        let repo = FakeRepo(reader, MockSellerWriter::new());

        let form = RegisterForm {
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            password: "correct-horse".to_string(),
            phone: "9876543210".to_string(),
            store_name: "Asha's Boutique".to_string(),
            description: None,
        };

        assert!(matches!(
            register(&repo, form),
            Err(ServiceError::Conflict(_))
        ));
    }

    #[test]
    fn login_rejects_wrong_password() {
        let mut reader = MockSellerReader::new();
        reader
            .expect_get_seller_by_email()
            .returning(|_| Ok(Some(seller_fixture())));

        let form = LoginForm {
            email: "asha@example.com".to_string(),
            password: "wrong".to_string(),
        };

        assert!(matches!(
            login(&reader, form, "secret"),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn login_issues_token_for_valid_credentials() {
        let mut reader = MockSellerReader::new();
        reader
            .expect_get_seller_by_email()
            .returning(|_| Ok(Some(seller_fixture())));

        let form = LoginForm {
            email: "asha@example.com".to_string(),
            password: "correct-horse".to_string(),
        };

        let response = login(&reader, form, "secret").expect("login should succeed");
        let claims = AuthenticatedUser::from_token(&response.token, "secret").expect("valid token");
        assert_eq!(claims.seller_id, 1);
        assert_eq!(claims.role, SELLER_ROLE);
    }

    #[test]
    fn gate_blocks_unapproved_and_expired_accounts() {
        let now = Utc::now().naive_utc();

        let mut unapproved = seller_fixture();
        unapproved.is_approved = false;
        assert!(matches!(
            ensure_seller_usable(&unapproved, now),
            Err(ServiceError::Forbidden(_))
        ));

        let mut expired = seller_fixture();
        expired.trial_ends_at = now - Duration::days(1);
        assert!(matches!(
            ensure_seller_usable(&expired, now),
            Err(ServiceError::Forbidden(_))
        ));

        assert!(ensure_seller_usable(&seller_fixture(), now).is_ok());
    }
}
