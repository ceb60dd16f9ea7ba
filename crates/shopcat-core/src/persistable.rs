//! Inbound payloads accepted by the facade.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistableDescription {
    /// Language code, e.g. `"en"`.
    pub language: String,
    pub name: String,
    pub description: Option<String>,
    pub friendly_url: Option<String>,
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub keywords: Option<String>,
    pub highlights: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistableProduct {
    /// Absent or `0` for a new product.
    pub id: Option<i64>,
    pub sku: String,
    pub ref_sku: Option<String>,
    pub available: bool,
    pub product_shippable: bool,
    pub product_virtual: bool,
    pub pre_order: bool,
    pub sort_order: i32,
    /// `yyyy-MM-dd`.
    pub date_available: Option<String>,
    /// Manufacturer code.
    pub manufacturer: Option<String>,
    /// Product type code.
    #[serde(rename = "type")]
    pub product_type: Option<String>,
    /// Category ids.
    pub categories: Vec<i64>,
    pub descriptions: Vec<PersistableDescription>,
    pub length: Option<Decimal>,
    pub width: Option<Decimal>,
    pub height: Option<Decimal>,
    pub weight: Option<Decimal>,
    pub price: Option<Decimal>,
    pub quantity: Option<i32>,
}

impl Default for PersistableProduct {
    fn default() -> Self {
        Self {
            id: None,
            sku: String::new(),
            ref_sku: None,
            available: true,
            product_shippable: true,
            product_virtual: false,
            pre_order: false,
            sort_order: 0,
            date_available: None,
            manufacturer: None,
            product_type: None,
            categories: Vec::new(),
            descriptions: Vec::new(),
            length: None,
            width: None,
            height: None,
            weight: None,
            price: None,
            quantity: None,
        }
    }
}

impl PersistableProduct {
    /// The id when it designates an existing product.
    #[must_use]
    pub fn existing_id(&self) -> Option<i64> {
        self.id.filter(|id| *id > 0)
    }
}

/// Availability-only update: the flag, a quantity and an optional price.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightPersistableProduct {
    pub available: bool,
    pub quantity: i32,
    /// Decimal amount as text; blank means "leave prices alone".
    pub price: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductPriceEntity {
    pub price: Decimal,
    pub discounted: bool,
    pub discounted_price: Option<Decimal>,
    /// `yyyy-MM-dd`.
    pub discount_start_date: Option<String>,
    /// `yyyy-MM-dd`.
    pub discount_end_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistableProductReview {
    pub id: Option<i64>,
    pub product_id: i64,
    pub customer_id: i64,
    pub rating: f64,
    /// `yyyy-MM-dd`; today when absent.
    pub date: Option<String>,
    pub language: Option<String>,
    pub description: String,
}
