//! WhatsApp deep-link construction.
//!
//! Links are handed to the buyer's browser; nothing is ever sent through a
//! WhatsApp API.

/// Build a `https://wa.me/<digits>?text=<encoded>` deep link.
///
/// `phone` may be in `+91…` form; everything except digits is dropped as
/// `wa.me` requires a bare international number.
pub fn deep_link(phone: &str, message: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    format!("https://wa.me/{digits}?text={}", urlencoding::encode(message))
}
