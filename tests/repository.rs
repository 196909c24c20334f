use chrono::{Duration, Utc};

use storelink::domain::analytics::{AnalyticsQuery, EventType, NewAnalyticsEvent};
use storelink::domain::broadcast::{
    BroadcastListQuery, BroadcastOutcome, BroadcastStatus, NewBroadcast,
};
use storelink::domain::cart::NewCartItem;
use storelink::domain::product::{NewPriceTier, NewProduct, ProductListQuery, UpdateProduct};
use storelink::domain::promotion::{DiscountType, NewPromotion, PromotionListQuery};
use storelink::domain::seller::SellerFlags;
use storelink::domain::subscriber::{NewSubscriber, SubscriberListQuery};
use storelink::repository::{
    AnalyticsReader, AnalyticsWriter, BroadcastReader, BroadcastWriter, CartReader, CartWriter,
    DieselRepository, ProductReader, ProductWriter, PromotionReader, PromotionWriter,
    RepositoryError, SellerReader, SellerWriter, SubscriberReader, SubscriberWriter,
};

mod common;

#[test]
fn test_seller_slugs_are_unique_platform_wide() {
    let test_db = common::TestDb::new("test_seller_slugs_are_unique.db");
    let repo = DieselRepository::new(test_db.pool());

    let first = common::create_seller(&repo, "a@example.com", "Red Rose");
    let second = common::create_seller(&repo, "b@example.com", "Red Rose");
    let third = common::create_seller(&repo, "c@example.com", "Red Rose");

    assert_eq!(first.slug, "red-rose");
    assert_eq!(second.slug, "red-rose-1");
    assert_eq!(third.slug, "red-rose-2");

    let found = repo
        .get_seller_by_slug("red-rose-1")
        .unwrap()
        .expect("expected seller by slug");
    assert_eq!(found.id, second.id);
}

#[test]
fn test_seller_flags_and_trial_end() {
    let test_db = common::TestDb::new("test_seller_flags_and_trial.db");
    let repo = DieselRepository::new(test_db.pool());

    let seller = common::create_seller(&repo, "a@example.com", "Red Rose");
    assert!(!seller.is_approved);
    assert!(seller.is_active);
    assert!(!seller.broadcasts_enabled);

    let approved = repo
        .set_seller_flags(
            seller.id,
            &SellerFlags {
                is_approved: Some(true),
                ..SellerFlags::default()
            },
        )
        .unwrap();
    assert!(approved.is_approved);
    assert!(approved.is_active);

    let ends_at = Utc::now().naive_utc() + Duration::days(30);
    let extended = repo.set_trial_end(seller.id, ends_at).unwrap();
    assert_eq!(extended.trial_ends_at, ends_at);

    let err = repo
        .set_trial_end(9999, ends_at)
        .expect_err("expected missing seller to fail");
    assert!(matches!(err, RepositoryError::NotFound));
}

#[test]
fn test_product_repository_crud_is_seller_scoped() {
    let test_db = common::TestDb::new("test_product_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool());

    let seller = common::create_seller(&repo, "a@example.com", "Red Rose");
    let other = common::create_seller(&repo, "b@example.com", "Blue Lily");

    let tiers = vec![
        NewPriceTier {
            min_quantity: 5,
            max_quantity: Some(9),
            price_cents: 9_000,
        },
        NewPriceTier {
            min_quantity: 10,
            max_quantity: None,
            price_cents: 8_000,
        },
    ];
    let created = repo
        .create_product(
            &NewProduct::new(seller.id, "Rose Soap", 10_000)
                .with_stock(50)
                .with_price_tiers(tiers),
        )
        .unwrap();
    assert_eq!(created.slug, "rose-soap");
    assert_eq!(created.price_tiers.len(), 2);

    // Same name in the same catalog gets a suffixed slug.
    let duplicate = repo
        .create_product(&NewProduct::new(seller.id, "Rose Soap", 12_000))
        .unwrap();
    assert_eq!(duplicate.slug, "rose-soap-1");

    // The other seller's catalog is a separate slug scope.
    let elsewhere = repo
        .create_product(&NewProduct::new(other.id, "Rose Soap", 11_000))
        .unwrap();
    assert_eq!(elsewhere.slug, "rose-soap");

    let fetched = repo
        .get_product_by_id(created.id, seller.id)
        .unwrap()
        .expect("expected product");
    assert_eq!(fetched.price_tiers.len(), 2);
    assert!(
        repo.get_product_by_id(created.id, other.id)
            .unwrap()
            .is_none()
    );

    let updated = repo
        .update_product(
            created.id,
            seller.id,
            &UpdateProduct::new()
                .base_price_cents(9_500)
                .price_tiers(vec![NewPriceTier {
                    min_quantity: 3,
                    max_quantity: None,
                    price_cents: 9_000,
                }]),
        )
        .unwrap();
    assert_eq!(updated.base_price_cents, 9_500);
    assert_eq!(updated.price_tiers.len(), 1);
    assert_eq!(updated.price_tiers[0].min_quantity, 3);

    let err = repo
        .update_product(created.id, other.id, &UpdateProduct::new().stock(0))
        .expect_err("expected cross-seller update to fail");
    assert!(matches!(err, RepositoryError::NotFound));

    let archived = repo
        .update_product(duplicate.id, seller.id, &UpdateProduct::new().archived(true))
        .unwrap();
    assert!(archived.is_archived);

    let (total, items) = repo.list_products(ProductListQuery::new(seller.id)).unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].id, created.id);

    let (total_all, _) = repo
        .list_products(ProductListQuery::new(seller.id).include_archived())
        .unwrap();
    assert_eq!(total_all, 2);

    repo.delete_product(created.id, seller.id).unwrap();
    assert!(
        repo.get_product_by_id(created.id, seller.id)
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_product_search_and_stock_filters() {
    let test_db = common::TestDb::new("test_product_search_filters.db");
    let repo = DieselRepository::new(test_db.pool());

    let seller = common::create_seller(&repo, "a@example.com", "Red Rose");
    repo.create_product(
        &NewProduct::new(seller.id, "Rose Soap", 10_000)
            .with_description("gentle floral bar")
            .with_stock(5),
    )
    .unwrap();
    repo.create_product(&NewProduct::new(seller.id, "Neem Comb", 4_000).with_stock(0))
        .unwrap();

    let (total, items) = repo
        .list_products(ProductListQuery::new(seller.id).search("floral"))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].name, "Rose Soap");

    let (in_stock, items) = repo
        .list_products(ProductListQuery::new(seller.id).in_stock_only())
        .unwrap();
    assert_eq!(in_stock, 1);
    assert_eq!(items[0].name, "Rose Soap");
}

#[test]
fn test_promotions_are_listed_in_creation_order() {
    let test_db = common::TestDb::new("test_promotions_creation_order.db");
    let repo = DieselRepository::new(test_db.pool());

    let seller = common::create_seller(&repo, "a@example.com", "Red Rose");
    let product = repo
        .create_product(&NewProduct::new(seller.id, "Rose Soap", 10_000))
        .unwrap();

    let now = Utc::now().naive_utc();
    let older = repo
        .create_promotion(&NewPromotion {
            seller_id: seller.id,
            name: "Monsoon Sale".to_string(),
            discount_type: DiscountType::Percentage,
            discount_value: 20,
            apply_to_all: false,
            product_ids: vec![product.id],
            starts_at: now - Duration::days(1),
            ends_at: now + Duration::days(1),
        })
        .unwrap();
    let newer = repo
        .create_promotion(&NewPromotion {
            seller_id: seller.id,
            name: "Festive Offer".to_string(),
            discount_type: DiscountType::Absolute,
            discount_value: 1_500,
            apply_to_all: true,
            product_ids: Vec::new(),
            starts_at: now - Duration::days(1),
            ends_at: now + Duration::days(1),
        })
        .unwrap();

    let (total, items) = repo
        .list_promotions(PromotionListQuery::new(seller.id))
        .unwrap();
    assert_eq!(total, 2);
    assert_eq!(items[0].id, older.id);
    assert_eq!(items[1].id, newer.id);
    assert_eq!(items[0].product_ids, vec![product.id]);
    assert!(items[1].product_ids.is_empty());

    assert!(
        repo.get_promotion_by_id(older.id, seller.id + 1)
            .unwrap()
            .is_none()
    );

    repo.delete_promotion(older.id, seller.id).unwrap();
    let (total, _) = repo
        .list_promotions(PromotionListQuery::new(seller.id))
        .unwrap();
    assert_eq!(total, 1);
}

#[test]
fn test_cart_upsert_updates_quantity_and_cached_price() {
    let test_db = common::TestDb::new("test_cart_upsert.db");
    let repo = DieselRepository::new(test_db.pool());

    let seller = common::create_seller(&repo, "a@example.com", "Red Rose");
    let product = repo
        .create_product(&NewProduct::new(seller.id, "Rose Soap", 10_000))
        .unwrap();
    let phone = "+919876543210";

    assert!(repo.get_cart(seller.id, phone).unwrap().is_none());

    let cart = repo
        .upsert_cart_item(
            seller.id,
            phone,
            &NewCartItem {
                product_id: product.id,
                quantity: 2,
                price_at_add_cents: 10_000,
            },
        )
        .unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 2);

    // A second upsert for the same product replaces the line, not adds one.
    let cart = repo
        .upsert_cart_item(
            seller.id,
            phone,
            &NewCartItem {
                product_id: product.id,
                quantity: 5,
                price_at_add_cents: 9_000,
            },
        )
        .unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 5);
    assert_eq!(cart.items[0].price_at_add_cents, 9_000);

    let cart = repo.remove_cart_item(seller.id, phone, product.id).unwrap();
    assert!(cart.items.is_empty());

    repo.upsert_cart_item(
        seller.id,
        phone,
        &NewCartItem {
            product_id: product.id,
            quantity: 1,
            price_at_add_cents: 10_000,
        },
    )
    .unwrap();
    repo.clear_cart(seller.id, phone).unwrap();
    assert!(repo.get_cart(seller.id, phone).unwrap().is_none());
}

#[test]
fn test_subscriber_upsert_reopts_in() {
    let test_db = common::TestDb::new("test_subscriber_upsert.db");
    let repo = DieselRepository::new(test_db.pool());

    let seller = common::create_seller(&repo, "a@example.com", "Red Rose");
    let phone = "+919876543210";

    let created = repo
        .upsert_subscriber(&NewSubscriber {
            seller_id: seller.id,
            phone: phone.to_string(),
            name: Some("Meera".to_string()),
        })
        .unwrap();
    assert!(created.is_opted_in);

    repo.opt_out_subscriber(seller.id, phone).unwrap();
    let (_, items) = repo
        .list_subscribers(SubscriberListQuery::new(seller.id))
        .unwrap();
    assert!(!items[0].is_opted_in);

    let (opted_in, _) = repo
        .list_subscribers(SubscriberListQuery::new(seller.id).opted_in_only())
        .unwrap();
    assert_eq!(opted_in, 0);

    // Subscribing again with the same phone re-opts in instead of duplicating.
    let again = repo
        .upsert_subscriber(&NewSubscriber {
            seller_id: seller.id,
            phone: phone.to_string(),
            name: None,
        })
        .unwrap();
    assert_eq!(again.id, created.id);
    assert!(again.is_opted_in);

    let err = repo
        .opt_out_subscriber(seller.id, "+911111111111")
        .expect_err("expected unknown phone to fail");
    assert!(matches!(err, RepositoryError::NotFound));
}

#[test]
fn test_broadcast_status_transitions_and_outcome() {
    let test_db = common::TestDb::new("test_broadcast_status.db");
    let repo = DieselRepository::new(test_db.pool());

    let seller = common::create_seller(&repo, "a@example.com", "Red Rose");
    let broadcast = repo
        .create_broadcast(&NewBroadcast {
            seller_id: seller.id,
            message: "Fresh stock just arrived!".to_string(),
        })
        .unwrap();
    assert!(matches!(broadcast.status, BroadcastStatus::Draft));
    assert!(broadcast.scheduled_at.is_none());

    let send_at = Utc::now().naive_utc() + Duration::hours(2);
    let scheduled = repo
        .schedule_broadcast(broadcast.id, seller.id, send_at)
        .unwrap();
    assert!(matches!(scheduled.status, BroadcastStatus::Scheduled));
    assert_eq!(scheduled.scheduled_at, Some(send_at));

    let sending = repo
        .set_broadcast_status(broadcast.id, seller.id, BroadcastStatus::Sending)
        .unwrap();
    assert!(matches!(sending.status, BroadcastStatus::Sending));

    let done = repo
        .record_broadcast_outcome(
            broadcast.id,
            seller.id,
            &BroadcastOutcome {
                status: BroadcastStatus::Sent,
                sent_count: 3,
                failed_count: 1,
            },
        )
        .unwrap();
    assert!(matches!(done.status, BroadcastStatus::Sent));
    assert_eq!(done.sent_count, 3);
    assert_eq!(done.failed_count, 1);

    let err = repo
        .set_broadcast_status(broadcast.id, seller.id + 1, BroadcastStatus::Sent)
        .expect_err("expected cross-seller update to fail");
    assert!(matches!(err, RepositoryError::NotFound));

    let (total, items) = repo
        .list_broadcasts(BroadcastListQuery::new(seller.id))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].id, broadcast.id);
    assert!(
        repo.get_broadcast_by_id(broadcast.id, seller.id)
            .unwrap()
            .is_some()
    );
}

#[test]
fn test_analytics_summary_groups_by_event_type() {
    let test_db = common::TestDb::new("test_analytics_summary.db");
    let repo = DieselRepository::new(test_db.pool());

    let seller = common::create_seller(&repo, "a@example.com", "Red Rose");
    let other = common::create_seller(&repo, "b@example.com", "Blue Lily");

    for _ in 0..3 {
        repo.record_event(&NewAnalyticsEvent {
            seller_id: seller.id,
            product_id: None,
            event_type: EventType::StoreView,
        })
        .unwrap();
    }
    repo.record_event(&NewAnalyticsEvent {
        seller_id: seller.id,
        product_id: Some(1),
        event_type: EventType::ProductView,
    })
    .unwrap();
    repo.record_event(&NewAnalyticsEvent {
        seller_id: other.id,
        product_id: None,
        event_type: EventType::WhatsappClick,
    })
    .unwrap();

    let counts = repo
        .summarize_events(seller.id, &AnalyticsQuery::default())
        .unwrap();
    assert_eq!(counts.len(), 2);
    let store_views = counts
        .iter()
        .find(|count| count.event_type == EventType::StoreView)
        .expect("expected store_view bucket");
    assert_eq!(store_views.count, 3);

    // A window that ends in the past matches nothing.
    let counts = repo
        .summarize_events(
            seller.id,
            &AnalyticsQuery {
                since: None,
                until: Some(Utc::now().naive_utc() - Duration::days(1)),
            },
        )
        .unwrap();
    assert!(counts.is_empty());
}
