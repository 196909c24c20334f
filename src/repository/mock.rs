use chrono::NaiveDateTime;
use mockall::mock;

use super::{
    AnalyticsReader, AnalyticsWriter, BroadcastReader, BroadcastWriter, CartReader, CartWriter,
    ProductReader, ProductWriter, PromotionReader, PromotionWriter, SellerReader, SellerWriter,
    SubscriberReader, SubscriberWriter,
};
use crate::domain::{
    analytics::{AnalyticsQuery, EventCount, NewAnalyticsEvent},
    broadcast::{Broadcast, BroadcastListQuery, BroadcastOutcome, BroadcastStatus, NewBroadcast},
    cart::{Cart, NewCartItem},
    product::{NewProduct, Product, ProductListQuery, UpdateProduct},
    promotion::{NewPromotion, Promotion, PromotionListQuery, UpdatePromotion},
    seller::{NewSeller, Seller, SellerFlags, SellerListQuery, UpdateSeller},
    subscriber::{NewSubscriber, Subscriber, SubscriberListQuery},
};
use crate::repository::errors::RepositoryResult;

mock! {
    pub SellerReader {}

    impl SellerReader for SellerReader {
        fn get_seller_by_id(&self, id: i32) -> RepositoryResult<Option<Seller>>;
        fn get_seller_by_email(&self, email: &str) -> RepositoryResult<Option<Seller>>;
        fn get_seller_by_slug(&self, slug: &str) -> RepositoryResult<Option<Seller>>;
        fn list_sellers(&self, query: SellerListQuery) -> RepositoryResult<(usize, Vec<Seller>)>;
    }
}

mock! {
    pub SellerWriter {}

    impl SellerWriter for SellerWriter {
        fn create_seller(&self, new_seller: &NewSeller) -> RepositoryResult<Seller>;
        fn update_seller(&self, seller_id: i32, updates: &UpdateSeller) -> RepositoryResult<Seller>;
        fn set_seller_flags(&self, seller_id: i32, flags: &SellerFlags) -> RepositoryResult<Seller>;
        fn set_trial_end(&self, seller_id: i32, ends_at: NaiveDateTime) -> RepositoryResult<Seller>;
    }
}

mock! {
    pub ProductReader {}

    impl ProductReader for ProductReader {
        fn get_product_by_id(&self, id: i32, seller_id: i32) -> RepositoryResult<Option<Product>>;
        fn get_product_by_slug(&self, seller_id: i32, slug: &str) -> RepositoryResult<Option<Product>>;
        fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    }
}

mock! {
    pub ProductWriter {}

    impl ProductWriter for ProductWriter {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
        fn update_product(&self, product_id: i32, seller_id: i32, updates: &UpdateProduct) -> RepositoryResult<Product>;
        fn delete_product(&self, product_id: i32, seller_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub PromotionReader {}

    impl PromotionReader for PromotionReader {
        fn get_promotion_by_id(&self, id: i32, seller_id: i32) -> RepositoryResult<Option<Promotion>>;
        fn list_promotions(&self, query: PromotionListQuery) -> RepositoryResult<(usize, Vec<Promotion>)>;
    }
}

mock! {
    pub PromotionWriter {}

    impl PromotionWriter for PromotionWriter {
        fn create_promotion(&self, new_promotion: &NewPromotion) -> RepositoryResult<Promotion>;
        fn update_promotion(&self, promotion_id: i32, seller_id: i32, updates: &UpdatePromotion) -> RepositoryResult<Promotion>;
        fn delete_promotion(&self, promotion_id: i32, seller_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub CartReader {}

    impl CartReader for CartReader {
        fn get_cart(&self, seller_id: i32, buyer_phone: &str) -> RepositoryResult<Option<Cart>>;
    }
}

mock! {
    pub CartWriter {}

    impl CartWriter for CartWriter {
        fn upsert_cart_item(&self, seller_id: i32, buyer_phone: &str, item: &NewCartItem) -> RepositoryResult<Cart>;
        fn remove_cart_item(&self, seller_id: i32, buyer_phone: &str, product_id: i32) -> RepositoryResult<Cart>;
        fn clear_cart(&self, seller_id: i32, buyer_phone: &str) -> RepositoryResult<()>;
    }
}

mock! {
    pub SubscriberReader {}

    impl SubscriberReader for SubscriberReader {
        fn list_subscribers(&self, query: SubscriberListQuery) -> RepositoryResult<(usize, Vec<Subscriber>)>;
    }
}

mock! {
    pub SubscriberWriter {}

    impl SubscriberWriter for SubscriberWriter {
        fn upsert_subscriber(&self, new_subscriber: &NewSubscriber) -> RepositoryResult<Subscriber>;
        fn opt_out_subscriber(&self, seller_id: i32, phone: &str) -> RepositoryResult<()>;
    }
}

mock! {
    pub BroadcastReader {}

    impl BroadcastReader for BroadcastReader {
        fn get_broadcast_by_id(&self, id: i32, seller_id: i32) -> RepositoryResult<Option<Broadcast>>;
        fn list_broadcasts(&self, query: BroadcastListQuery) -> RepositoryResult<(usize, Vec<Broadcast>)>;
    }
}

mock! {
    pub BroadcastWriter {}

    impl BroadcastWriter for BroadcastWriter {
        fn create_broadcast(&self, new_broadcast: &NewBroadcast) -> RepositoryResult<Broadcast>;
        fn set_broadcast_status(&self, broadcast_id: i32, seller_id: i32, status: BroadcastStatus) -> RepositoryResult<Broadcast>;
        fn schedule_broadcast(&self, broadcast_id: i32, seller_id: i32, send_at: NaiveDateTime) -> RepositoryResult<Broadcast>;
        fn record_broadcast_outcome(&self, broadcast_id: i32, seller_id: i32, outcome: &BroadcastOutcome) -> RepositoryResult<Broadcast>;
    }
}

mock! {
    pub AnalyticsWriter {}

    impl AnalyticsWriter for AnalyticsWriter {
        fn record_event(&self, event: &NewAnalyticsEvent) -> RepositoryResult<()>;
    }
}

mock! {
    pub AnalyticsReader {}

    impl AnalyticsReader for AnalyticsReader {
        fn summarize_events(&self, seller_id: i32, query: &AnalyticsQuery) -> RepositoryResult<Vec<EventCount>>;
    }
}
