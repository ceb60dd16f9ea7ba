pub mod app_config;
pub mod catalog;
pub mod config;
pub mod dates;
pub mod persistable;
pub mod readable;
pub mod reference;
pub mod repository;
pub mod review;

pub use app_config::{AppConfig, Environment, StorageBackend};
pub use catalog::{
    select_availability, ImageType, OptionType, Product, ProductAttribute, ProductAvailability,
    ProductDescription, ProductImage, ProductOption, ProductOptionValue, ProductPrice,
    ProductPriceDescription, ProductVariant, ProductVariation, ALL_REGIONS, DEFAULT_MANUFACTURER,
    DEFAULT_PRICE_CODE,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use persistable::{
    LightPersistableProduct, PersistableDescription, PersistableProduct,
    PersistableProductReview, ProductPriceEntity,
};
pub use readable::{
    DimensionUnit, ProductSpecification, ReadableCategory, ReadableCodeName, ReadableDescription,
    ReadableImage, ReadableManufacturer, ReadablePriceDescription, ReadableProduct,
    ReadableProductOption, ReadableProductOptionValue, ReadableProductPrice,
    ReadableProductProperty, ReadableProductReview, ReadableProductType, ReadableProductVariant,
    ReadablePropertyOption, ReadablePropertyValue, ReadableValueDescription, ReadableVariation,
    WeightUnit,
};
pub use reference::{
    Category, Language, Localized, Manufacturer, MerchantStore, NamedDescription, ProductType,
};
pub use repository::{
    CatalogRepository, ProductRepository, ReferenceRepository, RepositoryError, RepositoryResult,
    ReviewRepository,
};
pub use review::{rating_summary, ProductReview, ReviewDescription};

use thiserror::Error;

/// Invariant violations detected on a loaded aggregate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("product {product_id} has {count} variants flagged as default selection")]
    AmbiguousDefaultVariant { product_id: i64, count: usize },

    #[error("availability {availability_id} has {count} prices flagged as default")]
    AmbiguousDefaultPrice { availability_id: i64, count: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
