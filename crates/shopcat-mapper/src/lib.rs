//! Projection of catalog entities into readable models, and of inbound
//! payloads into entities.

pub mod availability;
pub mod context;
pub mod error;
pub mod images;
pub mod locale;
pub mod options;
pub mod persistable;
pub mod price;
pub mod pricing;
pub mod product;
pub mod reference;
pub mod review;
pub mod variants;

#[cfg(test)]
mod fixtures;

pub use context::MappingContext;
pub use error::{ConversionError, PricingError};
pub use images::{ImageFilePath, StaticImagePaths};
pub use persistable::{merge_persistable, ResolvedReferences};
pub use pricing::{DefaultPricingService, FinalPrice, PricingService};
pub use product::ReadableProductMapper;
pub use review::{to_readable_review, to_review};
