//! The `Product` aggregate and every entity it owns.
//!
//! Entities carry numeric ids; `0` marks an entity that has not been
//! persisted yet. Child collections are owned by value and saved together
//! with their product.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::reference::{Category, Language, Localized, Manufacturer, NamedDescription, ProductType};
use crate::CoreError;

/// Code of the price every availability is expected to carry.
pub const DEFAULT_PRICE_CODE: &str = "base";

/// Region marker for an availability that applies everywhere.
pub const ALL_REGIONS: &str = "*";

/// Manufacturer code assigned when a product is saved without one.
pub const DEFAULT_MANUFACTURER: &str = "DEFAULT";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    #[default]
    Select,
    Radio,
    Checkbox,
    Text,
}

impl OptionType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OptionType::Select => "select",
            OptionType::Radio => "radio",
            OptionType::Checkbox => "checkbox",
            OptionType::Text => "text",
        }
    }

    /// Case-insensitive lookup; `None` for unknown names.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "select" => Some(OptionType::Select),
            "radio" => Some(OptionType::Radio),
            "checkbox" => Some(OptionType::Checkbox),
            "text" => Some(OptionType::Text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    #[default]
    Image,
    Video,
}

impl ImageType {
    /// Stored discriminant: `0` image, `1` video.
    #[must_use]
    pub fn code(self) -> i16 {
        match self {
            ImageType::Image => 0,
            ImageType::Video => 1,
        }
    }

    #[must_use]
    pub fn from_code(code: i16) -> Self {
        if code == 1 {
            ImageType::Video
        } else {
            ImageType::Image
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    pub id: i64,
    pub code: String,
    pub option_type: OptionType,
    pub descriptions: Vec<NamedDescription>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOptionValue {
    pub id: i64,
    pub code: String,
    /// File name of the swatch image, relative to the store's attribute folder.
    pub image: Option<String>,
    pub sort_order: Option<i32>,
    pub descriptions: Vec<NamedDescription>,
}

/// Links a product to one option and one of its values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAttribute {
    pub id: i64,
    pub option: ProductOption,
    pub value: ProductOptionValue,
    /// Read-only attributes are shown as properties and never selected.
    pub display_only: bool,
    pub default: bool,
    /// Price adjustment applied when the value is selected.
    pub price: Option<Decimal>,
    pub sort_order: i32,
}

/// One option/value pair a variant is defined by.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariation {
    pub code: String,
    pub option: ProductOption,
    pub value: ProductOptionValue,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: i64,
    pub sku: String,
    pub code: String,
    pub available: bool,
    pub default_selection: bool,
    pub sort_order: i32,
    pub variation: Option<ProductVariation>,
    pub secondary_variation: Option<ProductVariation>,
    pub availabilities: Vec<ProductAvailability>,
    pub images: Vec<ProductImage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPriceDescription {
    pub id: i64,
    pub language: Language,
    pub name: Option<String>,
    /// Label printed after the amount, e.g. "per month".
    pub price_appender: Option<String>,
}

impl Localized for ProductPriceDescription {
    fn language(&self) -> &Language {
        &self.language
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPrice {
    pub id: i64,
    pub code: String,
    pub default: bool,
    pub amount: Decimal,
    pub special_amount: Option<Decimal>,
    pub special_start: Option<NaiveDate>,
    pub special_end: Option<NaiveDate>,
    pub descriptions: Vec<ProductPriceDescription>,
}

impl ProductPrice {
    /// A new default price carrying `amount`.
    #[must_use]
    pub fn base(amount: Decimal) -> Self {
        Self {
            code: DEFAULT_PRICE_CODE.to_string(),
            default: true,
            amount,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAvailability {
    pub id: i64,
    pub quantity: Option<i32>,
    pub min_order_quantity: Option<i32>,
    pub max_order_quantity: Option<i32>,
    pub region: String,
    pub region_variant: Option<String>,
    /// Set when the availability belongs to a variant rather than the product.
    pub variant_id: Option<i64>,
    pub prices: Vec<ProductPrice>,
}

impl Default for ProductAvailability {
    fn default() -> Self {
        Self {
            id: 0,
            quantity: None,
            min_order_quantity: None,
            max_order_quantity: None,
            region: ALL_REGIONS.to_string(),
            region_variant: None,
            variant_id: None,
            prices: Vec::new(),
        }
    }
}

impl ProductAvailability {
    /// True when the record applies to the product as a whole.
    #[must_use]
    pub fn is_product_wide(&self) -> bool {
        self.variant_id.is_none() && self.region_variant.as_deref().is_none_or(str::is_empty)
    }

    /// The price flagged default, falling back to the one coded
    /// [`DEFAULT_PRICE_CODE`] when no flag is set.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::AmbiguousDefaultPrice`] when more than one price
    /// carries the default flag.
    pub fn default_price(&self) -> Result<Option<&ProductPrice>, CoreError> {
        let flagged: Vec<&ProductPrice> = self.prices.iter().filter(|p| p.default).collect();
        match flagged.len() {
            0 => Ok(self.prices.iter().find(|p| p.code == DEFAULT_PRICE_CODE)),
            1 => Ok(flagged.first().copied()),
            count => Err(CoreError::AmbiguousDefaultPrice {
                availability_id: self.id,
                count,
            }),
        }
    }

    /// Mutable access to the default price, creating a `"base"` price when
    /// none exists.
    pub fn default_price_or_insert(&mut self) -> &mut ProductPrice {
        let idx = self
            .prices
            .iter()
            .position(|p| p.default)
            .or_else(|| self.prices.iter().position(|p| p.code == DEFAULT_PRICE_CODE));
        match idx {
            Some(i) => &mut self.prices[i],
            None => {
                self.prices.push(ProductPrice::base(Decimal::ZERO));
                let last = self.prices.len() - 1;
                &mut self.prices[last]
            }
        }
    }
}

/// The authoritative availability among `availabilities`: the first
/// product-wide one, otherwise the last one.
#[must_use]
pub fn select_availability(availabilities: &[ProductAvailability]) -> Option<&ProductAvailability> {
    availabilities
        .iter()
        .find(|a| a.is_product_wide())
        .or_else(|| availabilities.last())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub id: i64,
    pub file_name: String,
    pub default: bool,
    pub image_type: ImageType,
    pub external_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDescription {
    pub id: i64,
    pub language: Language,
    pub name: String,
    pub description: Option<String>,
    pub friendly_url: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub highlights: Option<String>,
}

impl Localized for ProductDescription {
    fn language(&self) -> &Language {
        &self.language
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub sku: String,
    pub ref_sku: Option<String>,
    pub merchant_store_id: i32,
    pub available: bool,
    pub shippable: bool,
    pub is_virtual: bool,
    pub pre_order: bool,
    pub sort_order: i32,
    pub date_available: Option<NaiveDate>,
    pub created_at: Option<DateTime<Utc>>,
    pub review_average: Option<Decimal>,
    pub review_count: Option<i32>,
    pub length: Option<Decimal>,
    pub width: Option<Decimal>,
    pub height: Option<Decimal>,
    pub weight: Option<Decimal>,
    pub manufacturer: Option<Manufacturer>,
    pub product_type: Option<ProductType>,
    pub descriptions: Vec<ProductDescription>,
    pub attributes: Vec<ProductAttribute>,
    pub variants: Vec<ProductVariant>,
    pub availabilities: Vec<ProductAvailability>,
    pub categories: Vec<Category>,
    pub images: Vec<ProductImage>,
}

impl Product {
    #[must_use]
    pub fn new(sku: impl Into<String>, merchant_store_id: i32) -> Self {
        Self {
            sku: sku.into(),
            merchant_store_id,
            available: true,
            shippable: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_new(&self) -> bool {
        self.id == 0
    }

    /// The variant flagged as default selection, if exactly one is.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::AmbiguousDefaultVariant`] when several variants
    /// claim the flag.
    pub fn default_variant(&self) -> Result<Option<&ProductVariant>, CoreError> {
        let mut flagged = self.variants.iter().filter(|v| v.default_selection);
        let first = flagged.next();
        let extra = flagged.count();
        if extra > 0 {
            return Err(CoreError::AmbiguousDefaultVariant {
                product_id: self.id,
                count: extra + 1,
            });
        }
        Ok(first)
    }

    #[must_use]
    pub fn has_category(&self, category_id: i64) -> bool {
        self.categories.iter().any(|c| c.id == category_id)
    }

    /// Returns `true` when a category was removed.
    pub fn remove_category(&mut self, category_id: i64) -> bool {
        let before = self.categories.len();
        self.categories.retain(|c| c.id != category_id);
        before != self.categories.len()
    }

    #[must_use]
    pub fn variant_by_sku(&self, sku: &str) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| v.sku == sku)
    }

    pub fn variant_by_sku_mut(&mut self, sku: &str) -> Option<&mut ProductVariant> {
        self.variants.iter_mut().find(|v| v.sku == sku)
    }

    /// Whether the product itself or one of its variants carries `sku`.
    #[must_use]
    pub fn matches_sku(&self, sku: &str) -> bool {
        self.sku == sku || self.variant_by_sku(sku).is_some()
    }

    /// The first product-wide availability, created on demand.
    pub fn product_wide_availability_mut(&mut self) -> &mut ProductAvailability {
        match self.availabilities.iter().position(ProductAvailability::is_product_wide) {
            Some(i) => &mut self.availabilities[i],
            None => {
                self.availabilities.push(ProductAvailability::default());
                let last = self.availabilities.len() - 1;
                &mut self.availabilities[last]
            }
        }
    }

    /// Every availability of the product and of its variants.
    pub fn all_availabilities_mut(&mut self) -> impl Iterator<Item = &mut ProductAvailability> {
        self.availabilities.iter_mut().chain(
            self.variants
                .iter_mut()
                .flat_map(|v| v.availabilities.iter_mut()),
        )
    }

    #[must_use]
    pub fn default_image(&self) -> Option<&ProductImage> {
        self.images.iter().find(|i| i.default)
    }

    #[must_use]
    pub fn authoritative_availability(&self) -> Option<&ProductAvailability> {
        select_availability(&self.availabilities)
    }
}
