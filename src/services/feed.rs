use serde::Serialize;

use crate::domain::product::{Product, ProductListQuery};
use crate::repository::{ProductReader, SellerReader};
use crate::services::storefront::open_storefront;
use crate::services::{ServiceResult, format_rupees};

/// One `<item>` of the merchant feed.
#[derive(Debug, Serialize)]
struct FeedItem {
    id: i32,
    title: String,
    description: String,
    link: String,
    image_link: String,
    /// `129.50 INR` — amount then currency, per the merchant feed format.
    price: String,
    availability: &'static str,
    brand: Option<String>,
    product_type: Option<String>,
}

/// Whether a product qualifies for the feed: live, in stock, and carrying a
/// fetchable image URL.
fn feed_eligible(product: &Product) -> bool {
    product
        .image_url
        .as_deref()
        .is_some_and(|url| url.starts_with("http://") || url.starts_with("https://"))
}

/// Render the Google Merchant RSS feed for a storefront.
pub fn render_feed<R>(
    repo: &R,
    tera: &tera::Tera,
    seller_slug: &str,
    base_url: &str,
) -> ServiceResult<String>
where
    R: SellerReader + ProductReader + ?Sized,
{
    let seller = open_storefront(repo, seller_slug)?;

    let (_, products) = repo.list_products(ProductListQuery::new(seller.id).in_stock_only())?;

    let store_link = format!("{base_url}/store/{}", seller.slug);
    let items: Vec<FeedItem> = products
        .into_iter()
        .filter(feed_eligible)
        .map(|product| {
            let availability = product.availability();
            FeedItem {
                id: product.id,
                link: format!("{store_link}/products/{}", product.slug),
                title: product.name,
                description: product.description.unwrap_or_default(),
                image_link: product.image_url.unwrap_or_default(),
                price: format!(
                    "{} {}",
                    format_rupees(product.base_price_cents),
                    product.currency
                ),
                availability,
                brand: product.brand,
                product_type: product.product_type,
            }
        })
        .collect();

    let mut context = tera::Context::new();
    context.insert("store_name", &seller.store_name);
    context.insert("store_description", &seller.description.unwrap_or_default());
    context.insert("store_link", &store_link);
    context.insert("items", &items);

    Ok(tera.render("feed/merchant.xml", &context)?)
}
