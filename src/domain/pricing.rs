//! Tiered price and promotion resolution.
//!
//! Pure arithmetic over paise; callers persist the result where they need a
//! point-in-time cache (`cart_items.price_at_add_cents`).

use chrono::NaiveDateTime;

use crate::domain::product::{PriceTier, Product};
use crate::domain::promotion::{DiscountType, Promotion};

/// Resolve the tiered unit price for `quantity` units.
///
/// Among tiers where `quantity >= min_quantity` and the quantity does not
/// exceed `max_quantity` (when bounded), the tier with the greatest
/// `min_quantity` wins. Quantities covered by no tier fall back to the base
/// price; gapped or overlapping tier sets are accepted as the seller defined
/// them.
pub fn tier_price(base_price_cents: i64, tiers: &[PriceTier], quantity: i32) -> i64 {
    tiers
        .iter()
        .filter(|tier| {
            quantity >= tier.min_quantity
                && tier.max_quantity.is_none_or(|max| quantity <= max)
        })
        .max_by_key(|tier| tier.min_quantity)
        .map(|tier| tier.price_cents)
        .unwrap_or(base_price_cents)
}

/// Apply one discount to a unit price, clamping at zero.
pub fn apply_discount(price_cents: i64, discount_type: DiscountType, value: i64) -> i64 {
    let discounted = match discount_type {
        DiscountType::Percentage => price_cents * (100 - value) / 100,
        DiscountType::Absolute => price_cents - value,
    };
    discounted.max(0)
}

/// Resolve the unit price a buyer pays for `quantity` units of `product`.
///
/// The tiered price is computed first, then the first promotion in
/// `promotions` that is live at `now` and covers the product is applied.
/// A single promotion wins; promotions never stack. Callers supply
/// `promotions` in repository order (`created_at` ascending), so the oldest
/// matching promotion takes precedence.
pub fn resolve_price(
    product: &Product,
    quantity: i32,
    promotions: &[Promotion],
    now: NaiveDateTime,
) -> i64 {
    let price = tier_price(product.base_price_cents, &product.price_tiers, quantity);

    match promotions
        .iter()
        .find(|promo| promo.is_current(now) && promo.applies_to(product.id))
    {
        Some(promo) => apply_discount(price, promo.discount_type, promo.discount_value),
        None => price,
    }
}
