use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::analytics::{EventType, NewAnalyticsEvent};
use crate::domain::pricing::resolve_price;
use crate::domain::product::{PriceTier, Product, ProductListQuery};
use crate::domain::promotion::PromotionListQuery;
use crate::domain::seller::Seller;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{AnalyticsWriter, ProductReader, PromotionReader, SellerReader};
use crate::services::{ServiceError, ServiceResult};

/// Resolve the seller behind a public storefront path. Closed storefronts
/// (unapproved, deactivated or expired) look like missing ones to buyers.
pub(crate) fn open_storefront<R>(repo: &R, seller_slug: &str) -> ServiceResult<Seller>
where
    R: SellerReader + ?Sized,
{
    let seller = repo
        .get_seller_by_slug(seller_slug)?
        .ok_or(ServiceError::NotFound)?;

    if !seller.storefront_open(Utc::now().naive_utc()) {
        return Err(ServiceError::NotFound);
    }

    Ok(seller)
}

/// Query parameters accepted by the public storefront.
#[derive(Debug, Default, Deserialize)]
pub struct StoreQuery {
    pub search: Option<String>,
    pub page: Option<usize>,
}

/// A product as shown to buyers, with its live resolved price.
#[derive(Debug, Serialize)]
pub struct StorefrontProduct {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    /// Unit price in paise before any discount.
    pub base_price_cents: i64,
    /// Unit price in paise at the minimum order quantity, promotions applied.
    pub unit_price_cents: i64,
    pub stock: i32,
    pub minimum_order_quantity: i32,
    pub price_tiers: Vec<PriceTier>,
}

/// The public microsite payload.
#[derive(Debug, Serialize)]
pub struct StoreView {
    pub store_name: String,
    pub slug: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
    pub products: Paginated<StorefrontProduct>,
}

fn storefront_product(product: Product, unit_price_cents: i64) -> StorefrontProduct {
    StorefrontProduct {
        id: product.id,
        name: product.name,
        slug: product.slug,
        description: product.description,
        brand: product.brand,
        image_url: product.image_url,
        video_url: product.video_url,
        base_price_cents: product.base_price_cents,
        unit_price_cents,
        stock: product.stock,
        minimum_order_quantity: product.minimum_order_quantity,
        price_tiers: product.price_tiers,
    }
}

/// Load a seller's public microsite. Records a store view.
pub fn get_store<R>(repo: &R, seller_slug: &str, query: StoreQuery) -> ServiceResult<StoreView>
where
    R: SellerReader + ProductReader + PromotionReader + AnalyticsWriter + ?Sized,
{
    let seller = open_storefront(repo, seller_slug)?;

    let page = query.page.unwrap_or(1);
    let mut list_query = ProductListQuery::new(seller.id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = query.search.as_ref() {
        list_query = list_query.search(term);
    }

    let (total, products) = repo.list_products(list_query)?;
    let (_, promotions) = repo.list_promotions(PromotionListQuery::new(seller.id))?;
    let now = Utc::now().naive_utc();

    let items: Vec<StorefrontProduct> = products
        .into_iter()
        .map(|product| {
            let unit_price_cents =
                resolve_price(&product, product.minimum_order_quantity, &promotions, now);
            storefront_product(product, unit_price_cents)
        })
        .collect();

    record_event_best_effort(repo, seller.id, None, EventType::StoreView);

    Ok(StoreView {
        store_name: seller.store_name,
        slug: seller.slug,
        description: seller.description,
        logo_url: seller.logo_url,
        banner_url: seller.banner_url,
        products: Paginated::new(items, page, total, DEFAULT_ITEMS_PER_PAGE),
    })
}

/// Load a single product page of a microsite. Records a product view.
pub fn get_store_product<R>(
    repo: &R,
    seller_slug: &str,
    product_slug: &str,
) -> ServiceResult<StorefrontProduct>
where
    R: SellerReader + ProductReader + PromotionReader + AnalyticsWriter + ?Sized,
{
    let seller = open_storefront(repo, seller_slug)?;

    let product = repo
        .get_product_by_slug(seller.id, product_slug)?
        .filter(|product| !product.is_archived)
        .ok_or(ServiceError::NotFound)?;

    let (_, promotions) = repo.list_promotions(PromotionListQuery::new(seller.id))?;
    let unit_price_cents = resolve_price(
        &product,
        product.minimum_order_quantity,
        &promotions,
        Utc::now().naive_utc(),
    );

    record_event_best_effort(repo, seller.id, Some(product.id), EventType::ProductView);

    Ok(storefront_product(product, unit_price_cents))
}

/// Analytics are advisory; a failed insert never breaks a buyer request.
fn record_event_best_effort<R>(
    repo: &R,
    seller_id: i32,
    product_id: Option<i32>,
    event_type: EventType,
) where
    R: AnalyticsWriter + ?Sized,
{
    let event = NewAnalyticsEvent {
        seller_id,
        product_id,
        event_type,
    };
    if let Err(error) = repo.record_event(&event) {
        log::warn!("failed to record {} event: {error}", event_type.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::domain::promotion::Promotion;
    use crate::repository::RepositoryResult;
    use crate::repository::mock::{
        MockAnalyticsWriter, MockProductReader, MockPromotionReader, MockSellerReader,
    };

    struct FakeRepo {
        seller_reader: MockSellerReader,
        product_reader: MockProductReader,
        promotion_reader: MockPromotionReader,
        analytics_writer: MockAnalyticsWriter,
    }

    impl FakeRepo {
        fn new() -> Self {
            Self {
                seller_reader: MockSellerReader::new(),
                product_reader: MockProductReader::new(),
                promotion_reader: MockPromotionReader::new(),
                analytics_writer: MockAnalyticsWriter::new(),
            }
        }
    }

    impl SellerReader for FakeRepo {
        fn get_seller_by_id(&self, id: i32) -> RepositoryResult<Option<Seller>> {
            self.seller_reader.get_seller_by_id(id)
        }
        fn get_seller_by_email(&self, email: &str) -> RepositoryResult<Option<Seller>> {
            self.seller_reader.get_seller_by_email(email)
        }
        fn get_seller_by_slug(&self, slug: &str) -> RepositoryResult<Option<Seller>> {
            self.seller_reader.get_seller_by_slug(slug)
        }
        fn list_sellers(
            &self,
            query: crate::domain::seller::SellerListQuery,
        ) -> RepositoryResult<(usize, Vec<Seller>)> {
            self.seller_reader.list_sellers(query)
        }
    }

    impl ProductReader for FakeRepo {
        fn get_product_by_id(&self, id: i32, seller_id: i32) -> RepositoryResult<Option<Product>> {
            self.product_reader.get_product_by_id(id, seller_id)
        }
        fn get_product_by_slug(
            &self,
            seller_id: i32,
            slug: &str,
        ) -> RepositoryResult<Option<Product>> {
            self.product_reader.get_product_by_slug(seller_id, slug)
        }
        fn list_products(
            &self,
            query: ProductListQuery,
        ) -> RepositoryResult<(usize, Vec<Product>)> {
            self.product_reader.list_products(query)
        }
    }

    impl PromotionReader for FakeRepo {
        fn get_promotion_by_id(
            &self,
            id: i32,
            seller_id: i32,
        ) -> RepositoryResult<Option<Promotion>> {
            self.promotion_reader.get_promotion_by_id(id, seller_id)
        }
        fn list_promotions(
            &self,
            query: PromotionListQuery,
        ) -> RepositoryResult<(usize, Vec<Promotion>)> {
            self.promotion_reader.list_promotions(query)
        }
    }

    impl AnalyticsWriter for FakeRepo {
        fn record_event(&self, event: &NewAnalyticsEvent) -> RepositoryResult<()> {
            self.analytics_writer.record_event(event)
        }
    }

    fn open_seller() -> Seller {
        let now = Utc::now().naive_utc();
        Seller {
            id: 2,
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            password_hash: "hash".to_string(),
            phone: "+919876543210".to_string(),
            slug: "ashas-boutique".to_string(),
            store_name: "Asha's Boutique".to_string(),
            description: Some("Handmade soaps".to_string()),
            logo_url: None,
            banner_url: None,
            role: crate::SELLER_ROLE.to_string(),
            is_approved: true,
            is_active: true,
            broadcasts_enabled: false,
            trial_ends_at: now + Duration::days(7),
            created_at: now,
            updated_at: now,
        }
    }

    fn soap() -> Product {
        let now = Utc::now().naive_utc();
        Product {
            id: 11,
            seller_id: 2,
            name: "Rose Soap".to_string(),
            slug: "rose-soap".to_string(),
            sku: None,
            description: None,
            brand: None,
            product_type: None,
            image_url: None,
            video_url: None,
            base_price_cents: 10_000,
            currency: "INR".to_string(),
            stock: 50,
            minimum_order_quantity: 1,
            is_archived: false,
            price_tiers: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn store_view_resolves_prices_and_records_event() {
        let mut repo = FakeRepo::new();
        repo.seller_reader
            .expect_get_seller_by_slug()
            .returning(|_| Ok(Some(open_seller())));
        repo.product_reader
            .expect_list_products()
            .returning(|_| Ok((1, vec![soap()])));
        repo.promotion_reader
            .expect_list_promotions()
            .returning(|_| Ok((0, Vec::new())));
        repo.analytics_writer
            .expect_record_event()
            .withf(|event| event.event_type == EventType::StoreView && event.product_id.is_none())
            .times(1)
            .returning(|_| Ok(()));

        let view = get_store(&repo, "ashas-boutique", StoreQuery::default())
            .expect("store should load");

        assert_eq!(view.store_name, "Asha's Boutique");
        assert_eq!(view.products.items.len(), 1);
        assert_eq!(view.products.items[0].unit_price_cents, 10_000);
    }

    #[test]
    fn archived_product_page_is_hidden() {
        let mut repo = FakeRepo::new();
        repo.seller_reader
            .expect_get_seller_by_slug()
            .returning(|_| Ok(Some(open_seller())));
        repo.product_reader
            .expect_get_product_by_slug()
            .returning(|_, _| {
                let mut product = soap();
                product.is_archived = true;
                Ok(Some(product))
            });

        assert!(matches!(
            get_store_product(&repo, "ashas-boutique", "rose-soap"),
            Err(ServiceError::NotFound)
        ));
    }
}
