use chrono::Utc;
use serde::Serialize;

use crate::domain::cart::{Cart, NewCartItem};
use crate::domain::pricing::resolve_price;
use crate::domain::product::Product;
use crate::domain::promotion::{Promotion, PromotionListQuery};
use crate::domain::seller::Seller;
use crate::forms::cart::{AddCartItemForm, CheckoutForm, RemoveCartItemForm};
use crate::normalize::normalize_indian_phone;
use crate::repository::{
    CartReader, CartWriter, ProductReader, PromotionReader, SellerReader,
};
use crate::services::storefront::open_storefront;
use crate::services::{ServiceError, ServiceResult, format_rupees};
use crate::whatsapp;

/// One cart line with its live resolved price.
#[derive(Debug, Serialize)]
pub struct CartItemView {
    pub product_id: i32,
    pub name: String,
    pub image_url: Option<String>,
    pub quantity: i32,
    /// Unit price in paise resolved against current tiers and promotions.
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
    /// Unit price in paise cached when the line was last touched.
    pub price_at_add_cents: i64,
}

/// A cart as returned to buyers, prices re-resolved at view time.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub seller_slug: String,
    pub buyer_phone: String,
    pub items: Vec<CartItemView>,
    pub total_cents: i64,
}

/// Checkout result: the composed order message and its WhatsApp deep link.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub message: String,
    pub whatsapp_link: String,
    pub total_cents: i64,
}

fn live_promotions<R>(repo: &R, seller_id: i32) -> ServiceResult<Vec<Promotion>>
where
    R: PromotionReader + ?Sized,
{
    let (_, promotions) = repo.list_promotions(PromotionListQuery::new(seller_id))?;
    Ok(promotions)
}

fn build_cart_view<R>(
    repo: &R,
    seller: &Seller,
    cart: &Cart,
    promotions: &[Promotion],
) -> ServiceResult<CartView>
where
    R: ProductReader + ?Sized,
{
    let now = Utc::now().naive_utc();
    let mut items = Vec::with_capacity(cart.items.len());
    let mut total_cents = 0;

    for line in &cart.items {
        // A product deleted after it was added simply drops out of the view.
        let Some(product) = repo.get_product_by_id(line.product_id, seller.id)? else {
            continue;
        };
        if product.is_archived {
            continue;
        }

        let unit_price_cents = resolve_price(&product, line.quantity, promotions, now);
        let line_total_cents = unit_price_cents * i64::from(line.quantity);
        total_cents += line_total_cents;

        items.push(CartItemView {
            product_id: product.id,
            name: product.name,
            image_url: product.image_url,
            quantity: line.quantity,
            unit_price_cents,
            line_total_cents,
            price_at_add_cents: line.price_at_add_cents,
        });
    }

    Ok(CartView {
        seller_slug: seller.slug.clone(),
        buyer_phone: cart.buyer_phone.clone(),
        items,
        total_cents,
    })
}

/// Fetch a buyer's cart with prices re-resolved against live promotions.
pub fn view_cart<R>(repo: &R, seller_slug: &str, buyer_phone: &str) -> ServiceResult<CartView>
where
    R: SellerReader + ProductReader + PromotionReader + CartReader + ?Sized,
{
    let seller = open_storefront(repo, seller_slug)?;
    let phone = normalize_indian_phone(buyer_phone)
        .map_err(|error| ServiceError::Form(error.to_string()))?;

    let promotions = live_promotions(repo, seller.id)?;

    match repo.get_cart(seller.id, &phone)? {
        Some(cart) => build_cart_view(repo, &seller, &cart, &promotions),
        None => Ok(CartView {
            seller_slug: seller.slug,
            buyer_phone: phone,
            items: Vec::new(),
            total_cents: 0,
        }),
    }
}

/// Add a product to the buyer's cart, or change its quantity.
///
/// The cached line price is recomputed here; it is not re-validated again
/// until the cart is viewed or checked out.
pub fn add_item<R>(repo: &R, seller_slug: &str, form: AddCartItemForm) -> ServiceResult<CartView>
where
    R: SellerReader + ProductReader + PromotionReader + CartReader + CartWriter + ?Sized,
{
    let seller = open_storefront(repo, seller_slug)?;
    let form = form.checked().map_err(|error| ServiceError::Form(error.to_string()))?;
    let phone = normalize_indian_phone(&form.buyer_phone)
        .map_err(|error| ServiceError::Form(error.to_string()))?;

    let product = repo
        .get_product_by_id(form.product_id, seller.id)?
        .filter(|product| !product.is_archived)
        .ok_or(ServiceError::NotFound)?;

    if form.quantity < product.minimum_order_quantity {
        return Err(ServiceError::Form(format!(
            "minimum order quantity for {} is {}",
            product.name, product.minimum_order_quantity
        )));
    }
    // The upsert replaces the line outright, so the requested quantity is the
    // final line quantity and a single stock check covers it.
    if form.quantity > product.stock {
        return Err(ServiceError::Form(format!(
            "only {} of {} left in stock",
            product.stock, product.name
        )));
    }

    let promotions = live_promotions(repo, seller.id)?;
    let unit_price_cents = resolve_price(
        &product,
        form.quantity,
        &promotions,
        Utc::now().naive_utc(),
    );

    let cart = repo.upsert_cart_item(
        seller.id,
        &phone,
        &NewCartItem {
            product_id: product.id,
            quantity: form.quantity,
            price_at_add_cents: unit_price_cents,
        },
    )?;

    build_cart_view(repo, &seller, &cart, &promotions)
}

/// Remove one product line from the buyer's cart.
pub fn remove_item<R>(
    repo: &R,
    seller_slug: &str,
    form: RemoveCartItemForm,
) -> ServiceResult<CartView>
where
    R: SellerReader + ProductReader + PromotionReader + CartReader + CartWriter + ?Sized,
{
    let seller = open_storefront(repo, seller_slug)?;
    let phone = normalize_indian_phone(&form.buyer_phone)
        .map_err(|error| ServiceError::Form(error.to_string()))?;

    let cart = repo.remove_cart_item(seller.id, &phone, form.product_id)?;
    let promotions = live_promotions(repo, seller.id)?;

    build_cart_view(repo, &seller, &cart, &promotions)
}

/// Turn the buyer's cart into a WhatsApp order message and deep link, then
/// clear the cart.
///
/// The clear is best-effort and not transactional with the link generation;
/// a failed clear is logged and the link still returned.
pub fn checkout<R>(
    repo: &R,
    tera: &tera::Tera,
    seller_slug: &str,
    form: CheckoutForm,
) -> ServiceResult<CheckoutResponse>
where
    R: SellerReader + ProductReader + PromotionReader + CartReader + CartWriter + ?Sized,
{
    let seller = open_storefront(repo, seller_slug)?;
    let phone = normalize_indian_phone(&form.buyer_phone)
        .map_err(|error| ServiceError::Form(error.to_string()))?;

    let cart = repo
        .get_cart(seller.id, &phone)?
        .ok_or(ServiceError::NotFound)?;
    let promotions = live_promotions(repo, seller.id)?;
    let view = build_cart_view(repo, &seller, &cart, &promotions)?;

    if view.items.is_empty() {
        return Err(ServiceError::Form("cart is empty".to_string()));
    }

    let message = render_order_message(tera, &seller, &view, &form)?;
    let whatsapp_link = whatsapp::deep_link(&seller.phone, &message);

    if let Err(error) = repo.clear_cart(seller.id, &phone) {
        log::warn!("failed to clear cart for {phone} after checkout: {error}");
    }

    Ok(CheckoutResponse {
        message,
        whatsapp_link,
        total_cents: view.total_cents,
    })
}

fn render_order_message(
    tera: &tera::Tera,
    seller: &Seller,
    view: &CartView,
    form: &CheckoutForm,
) -> ServiceResult<String> {
    #[derive(Serialize)]
    struct LineContext {
        name: String,
        quantity: i32,
        unit_price: String,
        line_total: String,
    }

    let lines: Vec<LineContext> = view
        .items
        .iter()
        .map(|item| LineContext {
            name: item.name.clone(),
            quantity: item.quantity,
            unit_price: format_rupees(item.unit_price_cents),
            line_total: format_rupees(item.line_total_cents),
        })
        .collect();

    let mut context = tera::Context::new();
    context.insert("store_name", &seller.store_name);
    context.insert("buyer_name", &form.buyer_name);
    context.insert("buyer_phone", &view.buyer_phone);
    context.insert("note", &form.note);
    context.insert("items", &lines);
    context.insert("total", &format_rupees(view.total_cents));

    Ok(tera.render("whatsapp/checkout.txt", &context)?)
}

// Products referenced below keep the pricing path honest end to end; the
// resolver itself is covered in the pricing module.
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::domain::cart::CartItem;
    use crate::domain::product::ProductListQuery;
    use crate::domain::promotion::DiscountType;
    use crate::domain::seller::SellerListQuery;
    use crate::repository::RepositoryResult;
    use crate::repository::mock::{
        MockCartReader, MockCartWriter, MockProductReader, MockPromotionReader, MockSellerReader,
    };

    struct FakeRepo {
        seller_reader: MockSellerReader,
        product_reader: MockProductReader,
        promotion_reader: MockPromotionReader,
        cart_reader: MockCartReader,
        cart_writer: MockCartWriter,
    }

    impl FakeRepo {
        fn new() -> Self {
            Self {
                seller_reader: MockSellerReader::new(),
                product_reader: MockProductReader::new(),
                promotion_reader: MockPromotionReader::new(),
                cart_reader: MockCartReader::new(),
                cart_writer: MockCartWriter::new(),
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
        fn list_sellers(&self, query: SellerListQuery) -> RepositoryResult<(usize, Vec<Seller>)> {
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

    impl CartReader for FakeRepo {
        fn get_cart(&self, seller_id: i32, buyer_phone: &str) -> RepositoryResult<Option<Cart>> {
            self.cart_reader.get_cart(seller_id, buyer_phone)
        }
    }

    impl CartWriter for FakeRepo {
        fn upsert_cart_item(
            &self,
            seller_id: i32,
            buyer_phone: &str,
            item: &NewCartItem,
        ) -> RepositoryResult<Cart> {
            self.cart_writer.upsert_cart_item(seller_id, buyer_phone, item)
        }
        fn remove_cart_item(
            &self,
            seller_id: i32,
            buyer_phone: &str,
            product_id: i32,
        ) -> RepositoryResult<Cart> {
            self.cart_writer
                .remove_cart_item(seller_id, buyer_phone, product_id)
        }
        fn clear_cart(&self, seller_id: i32, buyer_phone: &str) -> RepositoryResult<()> {
            self.cart_writer.clear_cart(seller_id, buyer_phone)
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
            description: None,
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

    fn soap(price_cents: i64) -> Product {
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
            base_price_cents: price_cents,
            currency: "INR".to_string(),
            stock: 50,
            minimum_order_quantity: 1,
            is_archived: false,
            price_tiers: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn cart_with_one_line(quantity: i32, price_at_add_cents: i64) -> Cart {
        let now = Utc::now().naive_utc();
        Cart {
            id: 1,
            seller_id: 2,
            buyer_phone: "+919876500000".to_string(),
            items: vec![CartItem {
                id: 1,
                cart_id: 1,
                product_id: 11,
                quantity,
                price_at_add_cents,
                created_at: now,
                updated_at: now,
            }],
            created_at: now,
            updated_at: now,
        }
    }

    fn checkout_tera() -> tera::Tera {
        let mut tera = tera::Tera::default();
        tera.add_raw_template(
            "whatsapp/checkout.txt",
            "Order for {{ store_name }}:\n{% for item in items %}{{ item.name }} x{{ item.quantity }} = {{ item.line_total }}\n{% endfor %}Total: {{ total }}",
        )
        .expect("template should compile");
        tera
    }

    #[test]
    fn view_cart_reprices_against_live_promotions() {
        let mut repo = FakeRepo::new();
        repo.seller_reader
            .expect_get_seller_by_slug()
            .returning(|_| Ok(Some(open_seller())));
        // Line was cached at full price; a 20% promotion is live now.
        repo.cart_reader
            .expect_get_cart()
            .returning(|_, _| Ok(Some(cart_with_one_line(2, 10_000))));
        repo.product_reader
            .expect_get_product_by_id()
            .returning(|_, _| Ok(Some(soap(10_000))));
        repo.promotion_reader.expect_list_promotions().returning(|_| {
            let now = Utc::now().naive_utc();
            Ok((
                1,
                vec![Promotion {
                    id: 1,
                    seller_id: 2,
                    name: "Sale".to_string(),
                    discount_type: DiscountType::Percentage,
                    discount_value: 20,
                    apply_to_all: true,
                    product_ids: Vec::new(),
                    starts_at: now - Duration::hours(1),
                    ends_at: now + Duration::hours(1),
                    is_active: true,
                    created_at: now,
                    updated_at: now,
                }],
            ))
        });

        let view = view_cart(&repo, "ashas-boutique", "98765 00000").expect("view should load");

        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].unit_price_cents, 8_000);
        assert_eq!(view.items[0].price_at_add_cents, 10_000);
        assert_eq!(view.total_cents, 16_000);
    }

    #[test]
    fn add_item_enforces_minimum_order_quantity() {
        let mut repo = FakeRepo::new();
        repo.seller_reader
            .expect_get_seller_by_slug()
            .returning(|_| Ok(Some(open_seller())));
        repo.product_reader.expect_get_product_by_id().returning(|_, _| {
            let mut product = soap(10_000);
            product.minimum_order_quantity = 5;
            Ok(Some(product))
        });

        let form = AddCartItemForm {
            buyer_phone: "9876500000".to_string(),
            product_id: 11,
            quantity: 2,
        };

        assert!(matches!(
            add_item(&repo, "ashas-boutique", form),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn add_item_rejects_quantity_above_stock() {
        let mut repo = FakeRepo::new();
        repo.seller_reader
            .expect_get_seller_by_slug()
            .returning(|_| Ok(Some(open_seller())));
        repo.product_reader.expect_get_product_by_id().returning(|_, _| {
            let mut product = soap(10_000);
            product.stock = 3;
            Ok(Some(product))
        });

        let form = AddCartItemForm {
            buyer_phone: "9876500000".to_string(),
            product_id: 11,
            quantity: 100,
        };

        match add_item(&repo, "ashas-boutique", form) {
            Err(ServiceError::Form(reason)) => {
                assert!(reason.contains("3"), "reason should name the stock level");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn add_item_accepts_quantity_up_to_stock() {
        let mut repo = FakeRepo::new();
        repo.seller_reader
            .expect_get_seller_by_slug()
            .returning(|_| Ok(Some(open_seller())));
        repo.product_reader.expect_get_product_by_id().returning(|_, _| {
            let mut product = soap(10_000);
            product.stock = 3;
            Ok(Some(product))
        });
        repo.promotion_reader
            .expect_list_promotions()
            .returning(|_| Ok((0, Vec::new())));
        repo.cart_writer
            .expect_upsert_cart_item()
            .withf(|_, _, item| item.quantity == 3)
            .returning(|_, _, _| Ok(cart_with_one_line(3, 10_000)));

        let form = AddCartItemForm {
            buyer_phone: "9876500000".to_string(),
            product_id: 11,
            quantity: 3,
        };

        let view = add_item(&repo, "ashas-boutique", form).expect("add should run");
        assert_eq!(view.items[0].quantity, 3);
    }

    #[test]
    fn closed_storefront_is_hidden_from_buyers() {
        let mut repo = FakeRepo::new();
        repo.seller_reader.expect_get_seller_by_slug().returning(|_| {
            let mut seller = open_seller();
            seller.trial_ends_at = Utc::now().naive_utc() - Duration::days(1);
            Ok(Some(seller))
        });

        assert!(matches!(
            view_cart(&repo, "ashas-boutique", "9876500000"),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn checkout_builds_link_and_clears_cart() {
        let mut repo = FakeRepo::new();
        repo.seller_reader
            .expect_get_seller_by_slug()
            .returning(|_| Ok(Some(open_seller())));
        repo.cart_reader
            .expect_get_cart()
            .returning(|_, _| Ok(Some(cart_with_one_line(2, 10_000))));
        repo.product_reader
            .expect_get_product_by_id()
            .returning(|_, _| Ok(Some(soap(10_000))));
        repo.promotion_reader
            .expect_list_promotions()
            .returning(|_| Ok((0, Vec::new())));
        repo.cart_writer
            .expect_clear_cart()
            .times(1)
            .returning(|_, _| Ok(()));

        let form = CheckoutForm {
            buyer_phone: "9876500000".to_string(),
            buyer_name: None,
            note: None,
        };

        let response =
            checkout(&repo, &checkout_tera(), "ashas-boutique", form).expect("checkout should run");

        assert!(response.whatsapp_link.starts_with("https://wa.me/919876543210?text="));
        assert!(response.message.contains("Rose Soap x2 = 200.00"));
        assert_eq!(response.total_cents, 20_000);
    }

    #[test]
    fn checkout_with_empty_cart_is_rejected() {
        let mut repo = FakeRepo::new();
        repo.seller_reader
            .expect_get_seller_by_slug()
            .returning(|_| Ok(Some(open_seller())));
        repo.cart_reader.expect_get_cart().returning(|_, _| Ok(None));

        let form = CheckoutForm {
            buyer_phone: "9876500000".to_string(),
            buyer_name: None,
            note: None,
        };

        assert!(matches!(
            checkout(&repo, &checkout_tera(), "ashas-boutique", form),
            Err(ServiceError::NotFound)
        ));
    }
}
