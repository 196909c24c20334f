//! Leaf normalization helpers shared by forms, services and repositories.

use thiserror::Error;

/// Errors produced while normalizing a phone number.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhoneError {
    /// The input contained fewer than ten significant digits.
    #[error("phone number must contain at least 10 digits")]
    TooShort,
    /// The input contained more digits than an Indian number allows.
    #[error("phone number has too many digits")]
    TooLong,
}

/// Normalize a raw Indian phone number into `+91XXXXXXXXXX` form.
///
/// Strips every non-digit character, then drops a single leading `0` trunk
/// prefix or a leading `91` country code before requiring exactly ten
/// significant digits.
pub fn normalize_indian_phone(raw: &str) -> Result<String, PhoneError> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    let national = if digits.len() == 11 && digits.starts_with('0') {
        &digits[1..]
    } else if digits.len() == 12 && digits.starts_with("91") {
        &digits[2..]
    } else {
        digits.as_str()
    };

    if national.len() < 10 {
        return Err(PhoneError::TooShort);
    }
    if national.len() > 10 {
        return Err(PhoneError::TooLong);
    }

    Ok(format!("+91{national}"))
}

/// Lowercase a name into a URL slug: alphanumeric runs joined by `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut previous_dash = true; // suppress a leading dash

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            previous_dash = false;
        } else if !previous_dash {
            slug.push('-');
            previous_dash = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}

/// Pick the first free slug among `base`, `base-1`, `base-2`…
///
/// `existing` holds the slugs already taken within the scope (one seller's
/// products, or all microsite aliases).
pub fn unique_slug(base: &str, existing: &[String]) -> String {
    if !existing.iter().any(|slug| slug == base) {
        return base.to_string();
    }

    let mut suffix = 1usize;
    loop {
        let candidate = format!("{base}-{suffix}");
        if !existing.iter().any(|slug| *slug == candidate) {
            return candidate;
        }
        suffix += 1;
    }
}
