use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

/// A row from the `products` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub merchant_store_id: i32,
    pub sku: String,
    pub ref_sku: Option<String>,
    pub available: bool,
    pub shippable: bool,
    pub is_virtual: bool,
    pub pre_order: bool,
    pub sort_order: i32,
    pub date_available: Option<NaiveDate>,
    /// Kept at two decimals; refreshed whenever a review changes.
    pub review_average: Option<Decimal>,
    pub review_count: Option<i32>,
    pub length: Option<Decimal>,
    pub width: Option<Decimal>,
    pub height: Option<Decimal>,
    pub weight: Option<Decimal>,
    pub manufacturer_id: Option<i64>,
    pub product_type_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A `product_descriptions` row joined with its language.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductDescriptionRow {
    pub id: i64,
    pub language_id: i32,
    pub language_code: String,
    pub name: String,
    pub description: Option<String>,
    pub friendly_url: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub highlights: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AttributeRow {
    pub id: i64,
    pub option_id: i64,
    pub option_value_id: i64,
    pub display_only: bool,
    pub is_default: bool,
    pub price: Option<Decimal>,
    pub sort_order: i32,
}

/// A row from `product_variants`. Each variation is stored inline as a
/// code plus an option/value pair; a variation exists only when both ids do.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VariantRow {
    pub id: i64,
    pub sku: String,
    pub code: String,
    pub available: bool,
    pub default_selection: bool,
    pub sort_order: i32,
    pub variation_code: Option<String>,
    pub variation_option_id: Option<i64>,
    pub variation_value_id: Option<i64>,
    pub secondary_code: Option<String>,
    pub secondary_option_id: Option<i64>,
    pub secondary_value_id: Option<i64>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AvailabilityRow {
    pub id: i64,
    /// `NULL` for product-level availabilities.
    pub variant_id: Option<i64>,
    pub quantity: Option<i32>,
    pub min_order_quantity: Option<i32>,
    pub max_order_quantity: Option<i32>,
    pub region: String,
    pub region_variant: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PriceRow {
    pub id: i64,
    pub availability_id: i64,
    pub code: String,
    pub is_default: bool,
    pub amount: Decimal,
    pub special_amount: Option<Decimal>,
    pub special_start: Option<NaiveDate>,
    pub special_end: Option<NaiveDate>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PriceDescriptionRow {
    pub id: i64,
    pub price_id: i64,
    pub language_id: i32,
    pub language_code: String,
    pub name: Option<String>,
    pub price_appender: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ImageRow {
    pub id: i64,
    pub variant_id: Option<i64>,
    pub file_name: String,
    pub is_default: bool,
    /// `0` image, `1` video.
    pub image_type: i16,
    pub external_url: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OptionRow {
    pub id: i64,
    pub code: String,
    pub option_type: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OptionValueRow {
    pub id: i64,
    pub code: String,
    pub image: Option<String>,
    pub sort_order: Option<i32>,
}
