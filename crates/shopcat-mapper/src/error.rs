//! Pricing and conversion errors.

use shopcat_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PricingError {
    #[error("invalid amount \"{0}\"")]
    InvalidAmount(String),

    #[error("negative amount \"{0}\"")]
    NegativeAmount(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("{context}: {source}")]
    Pricing {
        context: &'static str,
        #[source]
        source: PricingError,
    },

    #[error("unknown dimension unit \"{0}\"")]
    UnknownDimensionUnit(String),

    #[error("unknown weight unit \"{0}\"")]
    UnknownWeightUnit(String),

    #[error("invalid date for {field}: \"{value}\"")]
    InvalidDate { field: &'static str, value: String },

    /// The inbound payload is unusable as given.
    #[error("validation failed: {0}")]
    Validation(String),
}

impl ConversionError {
    pub(crate) fn pricing(context: &'static str) -> impl FnOnce(PricingError) -> Self {
        move |source| ConversionError::Pricing { context, source }
    }
}
