use std::io::Cursor;

use calamine::{Data, DataType, Reader, open_workbook_auto_from_rs};
use csv::Trim;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::product::{NewPriceTier, NewProduct, UpdateProduct};
use crate::forms::{empty_string_as_none, sanitize_inline_text, sanitize_multiline_text};

/// Maximum allowed length for a product name.
const NAME_MAX_LEN: u64 = 128;
/// Maximum allowed length for a SKU.
const SKU_MAX_LEN: u64 = 64;

/// Result type returned by the product form helpers.
pub type ProductFormResult<T> = Result<T, ProductFormError>;

/// Errors that can occur while processing product forms.
#[derive(Debug, Error)]
pub enum ProductFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided name is empty after sanitization.
    #[error("product name cannot be empty")]
    EmptyName,
    /// The base price is negative.
    #[error("price cannot be negative")]
    NegativePrice,
    /// A price tier is malformed.
    #[error("invalid price tier: {reason}")]
    InvalidTier { reason: String },
    /// The upload is missing a product name column.
    #[error("upload is missing a `name`/`title`/`product name` header")]
    MissingNameHeader,
    /// The upload is missing a price column.
    #[error("upload is missing a `price`/`mrp` header")]
    MissingPriceHeader,
    /// The uploaded file could not be read as a spreadsheet.
    #[error("failed to read spreadsheet: {0}")]
    Spreadsheet(String),
    /// The uploaded workbook has no sheets.
    #[error("workbook contains no sheets")]
    EmptyWorkbook,
    /// The uploaded file did not contain any data rows.
    #[error("upload contains no rows")]
    EmptyUpload,
    /// CSV parsing failures.
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// One quantity tier submitted alongside a product.
#[derive(Debug, Clone, Deserialize)]
pub struct TierForm {
    pub min_quantity: i32,
    pub max_quantity: Option<i32>,
    /// Unit price in paise while the tier applies.
    pub price_cents: i64,
}

impl TierForm {
    fn into_new_tier(self) -> ProductFormResult<NewPriceTier> {
        if self.min_quantity < 1 {
            return Err(ProductFormError::InvalidTier {
                reason: format!("min_quantity {} is below 1", self.min_quantity),
            });
        }
        if self.price_cents < 0 {
            return Err(ProductFormError::InvalidTier {
                reason: "tier price cannot be negative".to_string(),
            });
        }
        if let Some(max) = self.max_quantity
            && max < self.min_quantity
        {
            return Err(ProductFormError::InvalidTier {
                reason: format!("max_quantity {max} is below min_quantity {}", self.min_quantity),
            });
        }

        Ok(NewPriceTier {
            min_quantity: self.min_quantity,
            max_quantity: self.max_quantity,
            price_cents: self.price_cents,
        })
    }
}

/// Payload submitted when creating a product.
#[derive(Debug, Deserialize, Validate)]
pub struct AddProductForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    #[validate(length(max = SKU_MAX_LEN))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub sku: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub brand: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub product_type: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub video_url: Option<String>,
    /// Unit price in paise when no tier applies.
    pub base_price_cents: i64,
    #[serde(default)]
    pub stock: i32,
    #[serde(default = "default_minimum_order_quantity")]
    pub minimum_order_quantity: i32,
    #[serde(default)]
    pub price_tiers: Vec<TierForm>,
}

fn default_minimum_order_quantity() -> i32 {
    1
}

impl AddProductForm {
    /// Validates and sanitizes the payload into a domain [`NewProduct`].
    pub fn into_new_product(self, seller_id: i32) -> ProductFormResult<NewProduct> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(ProductFormError::EmptyName);
        }
        if self.base_price_cents < 0 {
            return Err(ProductFormError::NegativePrice);
        }

        let tiers = self
            .price_tiers
            .into_iter()
            .map(TierForm::into_new_tier)
            .collect::<ProductFormResult<Vec<_>>>()?;

        let mut product = NewProduct::new(seller_id, name, self.base_price_cents)
            .with_stock(self.stock.max(0))
            .with_minimum_order_quantity(self.minimum_order_quantity)
            .with_price_tiers(tiers);

        if let Some(sku) = self.sku.as_deref().map(sanitize_inline_text).filter(|v| !v.is_empty()) {
            product = product.with_sku(sku);
        }
        if let Some(description) = self
            .description
            .as_deref()
            .map(sanitize_multiline_text)
            .filter(|v| !v.is_empty())
        {
            product = product.with_description(description);
        }
        if let Some(brand) = self.brand.as_deref().map(sanitize_inline_text).filter(|v| !v.is_empty())
        {
            product = product.with_brand(brand);
        }
        if let Some(product_type) = self
            .product_type
            .as_deref()
            .map(sanitize_inline_text)
            .filter(|v| !v.is_empty())
        {
            product = product.with_product_type(product_type);
        }
        product.image_url = self.image_url.map(|url| url.trim().to_string());
        product.video_url = self.video_url.map(|url| url.trim().to_string());

        Ok(product)
    }
}

/// Payload submitted when editing a product. An empty string clears a
/// nullable field; an absent field leaves it untouched.
#[derive(Debug, Deserialize, Validate)]
pub struct EditProductForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: Option<String>,
    #[validate(length(max = SKU_MAX_LEN))]
    pub sku: Option<String>,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub product_type: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub base_price_cents: Option<i64>,
    pub stock: Option<i32>,
    pub minimum_order_quantity: Option<i32>,
    pub is_archived: Option<bool>,
    /// When present, replaces the product's whole tier set.
    pub price_tiers: Option<Vec<TierForm>>,
}

impl EditProductForm {
    /// Validates and sanitizes the payload into a domain [`UpdateProduct`].
    pub fn into_update_product(self) -> ProductFormResult<UpdateProduct> {
        self.validate()?;

        let mut updates = UpdateProduct::new();

        if let Some(name) = self.name {
            let sanitized = sanitize_inline_text(&name);
            if sanitized.is_empty() {
                return Err(ProductFormError::EmptyName);
            }
            updates = updates.name(sanitized);
        }

        if let Some(sku) = self.sku {
            let sanitized = sanitize_inline_text(&sku);
            updates = updates.sku((!sanitized.is_empty()).then_some(sanitized));
        }
        if let Some(description) = self.description {
            let sanitized = sanitize_multiline_text(&description);
            updates = updates.description((!sanitized.is_empty()).then_some(sanitized));
        }
        if let Some(brand) = self.brand {
            let sanitized = sanitize_inline_text(&brand);
            updates = updates.brand((!sanitized.is_empty()).then_some(sanitized));
        }
        if let Some(product_type) = self.product_type {
            let sanitized = sanitize_inline_text(&product_type);
            updates = updates.product_type((!sanitized.is_empty()).then_some(sanitized));
        }
        if let Some(image_url) = self.image_url {
            let trimmed = image_url.trim().to_string();
            updates = updates.image_url((!trimmed.is_empty()).then_some(trimmed));
        }
        if let Some(video_url) = self.video_url {
            let trimmed = video_url.trim().to_string();
            updates = updates.video_url((!trimmed.is_empty()).then_some(trimmed));
        }

        if let Some(price_cents) = self.base_price_cents {
            if price_cents < 0 {
                return Err(ProductFormError::NegativePrice);
            }
            updates = updates.base_price_cents(price_cents);
        }
        if let Some(stock) = self.stock {
            updates = updates.stock(stock.max(0));
        }
        if let Some(quantity) = self.minimum_order_quantity {
            updates = updates.minimum_order_quantity(quantity);
        }
        if let Some(is_archived) = self.is_archived {
            updates = updates.archived(is_archived);
        }
        if let Some(tiers) = self.price_tiers {
            let tiers = tiers
                .into_iter()
                .map(TierForm::into_new_tier)
                .collect::<ProductFormResult<Vec<_>>>()?;
            updates = updates.price_tiers(tiers);
        }

        Ok(updates)
    }
}

/// One rejected row of a bulk upload, with a user-facing reason.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RowError {
    /// 1-based spreadsheet row number, header included.
    pub row: usize,
    pub reason: String,
}

/// Outcome of parsing an uploaded product sheet: payloads for the valid rows
/// plus per-row errors for the rest.
#[derive(Debug, Default)]
pub struct ParsedUpload {
    pub products: Vec<(usize, NewProduct)>,
    pub errors: Vec<RowError>,
}

/// Raw bulk-upload payload received from the multipart handler.
#[derive(Debug)]
pub struct UploadProductsForm {
    /// Optional filename provided by the client; picks the parser.
    pub file_name: Option<String>,
    /// Raw spreadsheet or CSV bytes.
    pub bytes: Vec<u8>,
}

impl UploadProductsForm {
    pub fn new(file_name: Option<String>, bytes: Vec<u8>) -> Self {
        Self { file_name, bytes }
    }

    /// Parse the upload into per-row product payloads. Excel workbooks are
    /// detected by extension; everything else is treated as CSV.
    pub fn parse(self, seller_id: i32) -> ProductFormResult<ParsedUpload> {
        let is_excel = self
            .file_name
            .as_deref()
            .map(str::to_ascii_lowercase)
            .is_some_and(|name| name.ends_with(".xlsx") || name.ends_with(".xls"));

        if is_excel {
            parse_excel_products(self.bytes, seller_id)
        } else {
            parse_csv_products(self.bytes, seller_id)
        }
    }
}

/// Column positions resolved from the header row via alias matching.
struct ProductColumns {
    name: usize,
    price: usize,
    stock: Option<usize>,
    description: Option<usize>,
    sku: Option<usize>,
    brand: Option<usize>,
    category: Option<usize>,
    min_order_qty: Option<usize>,
}

const NAME_ALIASES: &[&str] = &["name", "title", "product name"];
const PRICE_ALIASES: &[&str] = &["price", "mrp", "base price"];
const STOCK_ALIASES: &[&str] = &["stock", "quantity", "qty"];
const MIN_ORDER_ALIASES: &[&str] = &["min order qty", "minimum order quantity", "moq"];

fn locate_columns(headers: &[String]) -> ProductFormResult<ProductColumns> {
    let find = |aliases: &[&str]| {
        headers.iter().position(|header| {
            let normalized = sanitize_inline_text(header).to_ascii_lowercase();
            aliases.contains(&normalized.as_str())
        })
    };

    let name = find(NAME_ALIASES).ok_or(ProductFormError::MissingNameHeader)?;
    let price = find(PRICE_ALIASES).ok_or(ProductFormError::MissingPriceHeader)?;

    Ok(ProductColumns {
        name,
        price,
        stock: find(STOCK_ALIASES),
        description: find(&["description"]),
        sku: find(&["sku"]),
        brand: find(&["brand"]),
        category: find(&["category", "product type"]),
        min_order_qty: find(MIN_ORDER_ALIASES),
    })
}

/// Parse a price cell given in rupees (decimals allowed) into paise.
fn parse_price_cell(raw: &str) -> Option<i64> {
    let cleaned: String = raw
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '.' || *ch == '-')
        .collect();
    let rupees: f64 = cleaned.parse().ok()?;
    if !rupees.is_finite() || rupees < 0.0 {
        return None;
    }
    Some((rupees * 100.0).round() as i64)
}

fn build_row_product(
    seller_id: i32,
    columns: &ProductColumns,
    cells: &[String],
    row_number: usize,
) -> Result<NewProduct, RowError> {
    let cell = |index: usize| cells.get(index).map(String::as_str).unwrap_or("");

    let name = sanitize_inline_text(cell(columns.name));
    if name.is_empty() {
        return Err(RowError {
            row: row_number,
            reason: "missing product name".to_string(),
        });
    }

    let price_raw = cell(columns.price).trim();
    if price_raw.is_empty() {
        return Err(RowError {
            row: row_number,
            reason: "missing price".to_string(),
        });
    }
    let base_price_cents = parse_price_cell(price_raw).ok_or_else(|| RowError {
        row: row_number,
        reason: format!("invalid price `{price_raw}`"),
    })?;

    let mut product = NewProduct::new(seller_id, name, base_price_cents);

    if let Some(index) = columns.stock {
        let raw = cell(index).trim();
        if !raw.is_empty() {
            let stock = raw.parse::<f64>().map_err(|_| RowError {
                row: row_number,
                reason: format!("invalid stock `{raw}`"),
            })?;
            product = product.with_stock((stock.max(0.0)) as i32);
        }
    }

    if let Some(index) = columns.min_order_qty {
        let raw = cell(index).trim();
        if !raw.is_empty() {
            let quantity = raw.parse::<f64>().map_err(|_| RowError {
                row: row_number,
                reason: format!("invalid minimum order quantity `{raw}`"),
            })?;
            product = product.with_minimum_order_quantity(quantity as i32);
        }
    }

    if let Some(sku) = columns
        .sku
        .map(|index| sanitize_inline_text(cell(index)))
        .filter(|value| !value.is_empty())
    {
        product = product.with_sku(sku);
    }
    if let Some(description) = columns
        .description
        .map(|index| sanitize_multiline_text(cell(index)))
        .filter(|value| !value.is_empty())
    {
        product = product.with_description(description);
    }
    if let Some(brand) = columns
        .brand
        .map(|index| sanitize_inline_text(cell(index)))
        .filter(|value| !value.is_empty())
    {
        product = product.with_brand(brand);
    }
    if let Some(category) = columns
        .category
        .map(|index| sanitize_inline_text(cell(index)))
        .filter(|value| !value.is_empty())
    {
        product = product.with_product_type(category);
    }

    Ok(product)
}

fn parse_csv_products(bytes: Vec<u8>, seller_id: i32) -> ProductFormResult<ParsedUpload> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(Cursor::new(bytes));

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let columns = locate_columns(&headers)?;

    let mut parsed = ParsedUpload::default();
    let mut processed_rows = 0;

    for (index, row) in reader.records().enumerate() {
        processed_rows += 1;
        let row_number = index + 2; // account for header row
        let record = row?;
        let cells: Vec<String> = record.iter().map(str::to_string).collect();

        match build_row_product(seller_id, &columns, &cells, row_number) {
            Ok(product) => parsed.products.push((row_number, product)),
            Err(error) => parsed.errors.push(error),
        }
    }

    if processed_rows == 0 {
        return Err(ProductFormError::EmptyUpload);
    }

    Ok(parsed)
}

fn parse_excel_products(bytes: Vec<u8>, seller_id: i32) -> ProductFormResult<ParsedUpload> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|error| ProductFormError::Spreadsheet(error.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ProductFormError::EmptyWorkbook)?
        .map_err(|error| ProductFormError::Spreadsheet(error.to_string()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or(ProductFormError::EmptyUpload)?
        .iter()
        .map(cell_to_string)
        .collect();
    let columns = locate_columns(&headers)?;

    let mut parsed = ParsedUpload::default();
    let mut processed_rows = 0;

    for (index, row) in rows.enumerate() {
        let row_number = index + 2;
        let cells: Vec<String> = row.iter().map(cell_to_string).collect();
        if cells.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        processed_rows += 1;

        match build_row_product(seller_id, &columns, &cells, row_number) {
            Ok(product) => parsed.products.push((row_number, product)),
            Err(error) => parsed.errors.push(error),
        }
    }

    if processed_rows == 0 {
        return Err(ProductFormError::EmptyUpload);
    }

    Ok(parsed)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) => value.clone(),
        // Integral floats render without the trailing `.0` Excel adds.
        Data::Float(value) if value.fract() == 0.0 => format!("{}", *value as i64),
        other => other.as_string().unwrap_or_default(),
    }
}
