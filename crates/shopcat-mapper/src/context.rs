//! Per-request inputs shared by the projection helpers.

use shopcat_core::{Language, MerchantStore};

use crate::images::ImageFilePath;
use crate::pricing::PricingService;

/// Collaborators and request settings threaded through one projection.
#[derive(Clone, Copy)]
pub struct MappingContext<'a> {
    pub store: &'a MerchantStore,
    pub language: &'a Language,
    pub pricing: &'a dyn PricingService,
    pub images: &'a dyn ImageFilePath,
}
