//! Client-facing projections. Built fresh per request, never persisted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{ImageType, OptionType};

/// Minimal `{id, code, name}` triple for entities shown by name only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadableCodeName {
    pub id: i64,
    pub code: String,
    pub name: Option<String>,
}

pub type ReadableProductType = ReadableCodeName;
pub type ReadablePropertyOption = ReadableCodeName;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadableCategory {
    pub id: i64,
    pub code: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadableManufacturer {
    pub id: i64,
    pub code: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadableDescription {
    pub id: i64,
    pub language: String,
    pub name: String,
    pub description: Option<String>,
    pub friendly_url: Option<String>,
    /// Meta title, or the name when the meta title is blank.
    pub title: String,
    pub meta_description: Option<String>,
    pub keywords: Option<String>,
    pub highlights: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadableValueDescription {
    pub id: i64,
    pub language: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadableImage {
    pub id: i64,
    pub image_name: String,
    pub image_url: String,
    pub external_url: Option<String>,
    pub video_url: Option<String>,
    pub image_type: ImageType,
    pub default_image: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadablePriceDescription {
    pub id: i64,
    pub language: String,
    pub price_appender: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadableProductPrice {
    /// Id of the default price the section was computed from.
    pub id: Option<i64>,
    pub price: Decimal,
    pub final_price: String,
    pub original_price: String,
    pub discounted: bool,
    pub description: Option<ReadablePriceDescription>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadableProductOptionValue {
    /// Attribute id for attribute-backed values, variant id for variant-backed ones.
    pub id: i64,
    pub code: String,
    pub sort_order: i32,
    pub default_value: bool,
    pub image: Option<String>,
    pub price: Option<String>,
    pub description: Option<ReadableValueDescription>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadableProductOption {
    pub id: i64,
    pub code: String,
    pub option_type: OptionType,
    pub lang: Option<String>,
    pub name: Option<String>,
    /// Set when at least one variant is defined by this option.
    pub variant: bool,
    pub option_values: Vec<ReadableProductOptionValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadablePropertyValue {
    pub id: i64,
    pub code: String,
    pub name: Option<String>,
    /// The value's description in every language.
    pub values: Vec<ReadableValueDescription>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadableProductProperty {
    /// Attribute id.
    pub id: i64,
    pub code: String,
    pub option_type: OptionType,
    pub read_only: bool,
    pub property: ReadablePropertyOption,
    pub property_value: ReadablePropertyValue,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadableVariation {
    pub option: ReadableCodeName,
    pub value: ReadableCodeName,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadableProductVariant {
    pub id: i64,
    pub sku: String,
    pub code: String,
    pub available: bool,
    pub default_selection: bool,
    pub sort_order: i32,
    pub variation: Option<ReadableVariation>,
    pub secondary_variation: Option<ReadableVariation>,
    pub quantity: i32,
    pub product_price: Option<ReadableProductPrice>,
    pub images: Vec<ReadableImage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionUnit {
    Cm,
    In,
}

impl DimensionUnit {
    /// Case-insensitive lookup of a store unit code.
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "cm" => Some(DimensionUnit::Cm),
            "in" => Some(DimensionUnit::In),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    Lb,
    Kg,
    G,
}

impl WeightUnit {
    /// Case-insensitive lookup of a store unit code.
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "lb" => Some(WeightUnit::Lb),
            "kg" => Some(WeightUnit::Kg),
            "g" => Some(WeightUnit::G),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSpecification {
    pub length: Option<Decimal>,
    pub width: Option<Decimal>,
    pub height: Option<Decimal>,
    pub weight: Option<Decimal>,
    pub dimension_unit_of_measure: Option<DimensionUnit>,
    pub weight_unit_of_measure: Option<WeightUnit>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadableProduct {
    pub id: i64,
    pub sku: String,
    pub ref_sku: Option<String>,
    pub available: bool,
    pub product_shippable: bool,
    pub product_virtual: bool,
    pub pre_order: bool,
    pub sort_order: i32,
    pub date_available: Option<String>,
    pub creation_date: Option<String>,
    pub can_be_purchased: bool,
    pub quantity: i32,
    pub quantity_order_minimum: i32,
    pub quantity_order_maximum: i32,
    pub price: Option<Decimal>,
    pub final_price: Option<String>,
    pub original_price: Option<String>,
    pub discounted: bool,
    pub product_price: Option<ReadableProductPrice>,
    pub rating: f64,
    pub rating_count: i32,
    pub description: Option<ReadableDescription>,
    #[serde(rename = "type")]
    pub product_type: Option<ReadableProductType>,
    pub manufacturer: Option<ReadableManufacturer>,
    /// Default image of the representative variant, else of the product.
    pub image: Option<ReadableImage>,
    pub images: Vec<ReadableImage>,
    pub properties: Vec<ReadableProductProperty>,
    pub options: Vec<ReadableProductOption>,
    pub variants: Vec<ReadableProductVariant>,
    pub categories: Vec<ReadableCategory>,
    pub product_specifications: ProductSpecification,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadableProductReview {
    pub id: i64,
    pub product_id: i64,
    pub customer_id: i64,
    pub rating: f64,
    pub date: String,
    pub language: Option<String>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units_parse_store_codes() {
        assert_eq!(DimensionUnit::parse("CM"), Some(DimensionUnit::Cm));
        assert_eq!(DimensionUnit::parse("mm"), None);
        assert_eq!(WeightUnit::parse("Kg"), Some(WeightUnit::Kg));
        assert_eq!(WeightUnit::parse("oz"), None);
    }

    #[test]
    fn readable_product_serializes_type_field() {
        let product = ReadableProduct {
            product_type: Some(ReadableCodeName {
                id: 1,
                code: "general".to_string(),
                name: None,
            }),
            ..ReadableProduct::default()
        };
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["type"]["code"], "general");
        assert!(json.get("product_type").is_none());
    }

    #[test]
    fn units_serialize_lowercase() {
        let spec = ProductSpecification {
            dimension_unit_of_measure: Some(DimensionUnit::In),
            weight_unit_of_measure: Some(WeightUnit::Lb),
            ..ProductSpecification::default()
        };
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["dimension_unit_of_measure"], "in");
        assert_eq!(json["weight_unit_of_measure"], "lb");
    }
}
