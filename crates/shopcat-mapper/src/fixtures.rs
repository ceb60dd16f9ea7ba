//! Sample catalog shared by the mapper tests.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shopcat_core::{
    Language, MerchantStore, NamedDescription, OptionType, Product, ProductAttribute,
    ProductAvailability, ProductDescription, ProductImage, ProductOption, ProductOptionValue,
    ProductPrice, ProductPriceDescription, ProductVariant, ProductVariation,
};

use crate::context::MappingContext;
use crate::images::StaticImagePaths;
use crate::pricing::DefaultPricingService;

/// Owns everything a [`MappingContext`] borrows.
pub struct TestEnv {
    pub store: MerchantStore,
    pub language: Language,
    pub pricing: DefaultPricingService,
    pub images: StaticImagePaths,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            store: store(),
            language: en(),
            pricing: DefaultPricingService::with_pricing_date(day(2024, 6, 15)),
            images: StaticImagePaths::new("/static"),
        }
    }

    pub fn with_language(language: Language) -> Self {
        Self {
            language,
            ..Self::new()
        }
    }

    pub fn ctx(&self) -> MappingContext<'_> {
        MappingContext {
            store: &self.store,
            language: &self.language,
            pricing: &self.pricing,
            images: &self.images,
        }
    }
}

pub fn en() -> Language {
    Language::new(1, "en")
}

pub fn fr() -> Language {
    Language::new(2, "fr")
}

pub fn store() -> MerchantStore {
    MerchantStore {
        id: 1,
        code: "DEFAULT".to_string(),
        currency_code: "USD".to_string(),
        default_language: "en".to_string(),
        dimension_unit_code: Some("CM".to_string()),
        weight_unit_code: Some("KG".to_string()),
    }
}

pub fn named(id: i64, language: Language, name: &str) -> NamedDescription {
    NamedDescription {
        id,
        language,
        name: name.to_string(),
        description: None,
    }
}

pub fn dec(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn option(id: i64, code: &str, en_name: &str) -> ProductOption {
    ProductOption {
        id,
        code: code.to_string(),
        option_type: OptionType::Select,
        descriptions: vec![named(id * 10, en(), en_name)],
    }
}

pub fn option_value(id: i64, code: &str, en_name: &str) -> ProductOptionValue {
    ProductOptionValue {
        id,
        code: code.to_string(),
        image: None,
        sort_order: None,
        descriptions: vec![named(id * 10, en(), en_name)],
    }
}

pub fn base_price(id: i64, cents: i64) -> ProductPrice {
    ProductPrice {
        id,
        descriptions: vec![ProductPriceDescription {
            id: id * 10,
            language: en(),
            name: None,
            price_appender: Some("each".to_string()),
        }],
        ..ProductPrice::base(dec(cents))
    }
}

pub fn availability(id: i64, quantity: Option<i32>, prices: Vec<ProductPrice>) -> ProductAvailability {
    ProductAvailability {
        id,
        quantity,
        prices,
        ..ProductAvailability::default()
    }
}

pub fn variant(id: i64, sku: &str, size: (i64, &str), default_selection: bool) -> ProductVariant {
    ProductVariant {
        id,
        sku: sku.to_string(),
        code: sku.to_lowercase(),
        available: true,
        default_selection,
        sort_order: 0,
        variation: Some(ProductVariation {
            code: format!("size-{}", size.1),
            option: option(1, "size", "Size"),
            value: option_value(size.0, size.1, &size.1.to_uppercase()),
        }),
        secondary_variation: None,
        availabilities: vec![],
        images: vec![],
    }
}

/// A t-shirt with one read-only material property, one selectable color
/// attribute, and a product-wide availability priced 19.99.
pub fn tshirt() -> Product {
    let mut product = Product::new("TSHIRT", 1);
    product.id = 100;
    product.sort_order = 3;
    product.descriptions = vec![ProductDescription {
        id: 1000,
        language: en(),
        name: "T-Shirt".to_string(),
        description: Some("Plain cotton tee".to_string()),
        friendly_url: Some("t-shirt".to_string()),
        meta_title: None,
        meta_description: None,
        meta_keywords: None,
        highlights: None,
    }];
    product.attributes = vec![
        ProductAttribute {
            id: 500,
            option: option(3, "material", "Material"),
            value: option_value(30, "cotton", "Cotton"),
            display_only: true,
            ..ProductAttribute::default()
        },
        ProductAttribute {
            id: 501,
            option: option(2, "color", "Color"),
            value: option_value(20, "red", "Red"),
            default: true,
            price: Some(dec(150)),
            ..ProductAttribute::default()
        },
    ];
    product.availabilities = vec![availability(200, Some(5), vec![base_price(300, 1999)])];
    product.images = vec![ProductImage {
        id: 700,
        file_name: "front.jpg".to_string(),
        default: true,
        ..ProductImage::default()
    }];
    product
}
