//! Assembles a [`ReadableProduct`] from a loaded [`Product`] aggregate.

use std::sync::Arc;

use rust_decimal::prelude::ToPrimitive;
use shopcat_core::dates::{format_date, format_timestamp};
use shopcat_core::{
    DimensionUnit, Language, MerchantStore, Product, ProductDescription, ProductSpecification,
    ReadableDescription, ReadableProduct, WeightUnit,
};

use crate::availability::reduce_availability;
use crate::context::MappingContext;
use crate::error::ConversionError;
use crate::images::{readable_image, ImageFilePath};
use crate::locale::resolve_exact;
use crate::options::{classify_attributes, SelectableOptions};
use crate::price::price_section;
use crate::pricing::PricingService;
use crate::reference::{readable_category, readable_manufacturer, readable_product_type};
use crate::variants::{merge_variant_options, project_variant};

#[derive(Clone)]
pub struct ReadableProductMapper {
    pricing: Arc<dyn PricingService>,
    images: Arc<dyn ImageFilePath>,
}

impl ReadableProductMapper {
    #[must_use]
    pub fn new(pricing: Arc<dyn PricingService>, images: Arc<dyn ImageFilePath>) -> Self {
        Self { pricing, images }
    }

    /// Projects `source` into a fresh [`ReadableProduct`].
    ///
    /// # Errors
    ///
    /// See [`ReadableProductMapper::merge`].
    pub fn convert(
        &self,
        source: &Product,
        store: &MerchantStore,
        language: &Language,
    ) -> Result<ReadableProduct, ConversionError> {
        self.merge(source, ReadableProduct::default(), store, language)
    }

    /// Projects `source` over `destination` and returns it.
    ///
    /// When a variant is flagged as default selection its price section and
    /// default image represent the whole product.
    ///
    /// # Errors
    ///
    /// - [`ConversionError::Core`] when several variants are flagged default
    ///   or an availability has several default prices.
    /// - [`ConversionError::Pricing`] when the pricing service fails.
    /// - [`ConversionError::UnknownDimensionUnit`] /
    ///   [`ConversionError::UnknownWeightUnit`] for unrecognized store units.
    pub fn merge(
        &self,
        source: &Product,
        mut destination: ReadableProduct,
        store: &MerchantStore,
        language: &Language,
    ) -> Result<ReadableProduct, ConversionError> {
        let ctx = MappingContext {
            store,
            language,
            pricing: self.pricing.as_ref(),
            images: self.images.as_ref(),
        };

        destination.id = source.id;
        destination.sku.clone_from(&source.sku);
        destination.ref_sku.clone_from(&source.ref_sku);
        destination.available = source.available;
        destination.product_shippable = source.shippable;
        destination.product_virtual = source.is_virtual;
        destination.pre_order = source.pre_order;
        destination.sort_order = source.sort_order;
        destination.date_available = source.date_available.map(format_date);
        destination.creation_date = source.created_at.map(format_timestamp);

        destination.product_type = source
            .product_type
            .as_ref()
            .map(|t| readable_product_type(t, language));
        destination.manufacturer = source
            .manufacturer
            .as_ref()
            .map(|m| readable_manufacturer(m, language));

        destination.images = source
            .images
            .iter()
            .map(|i| readable_image(i, &source.sku, &ctx))
            .collect();
        destination.image = source
            .default_image()
            .map(|i| readable_image(i, &source.sku, &ctx));

        let mut options = SelectableOptions::new();
        destination.properties = classify_attributes(&source.attributes, &ctx, &mut options);

        let representative_id = source.default_variant()?.map(|v| v.id);
        destination.variants = source
            .variants
            .iter()
            .map(|v| project_variant(v, source, &ctx))
            .collect::<Result<Vec<_>, _>>()?;
        for variant in &source.variants {
            merge_variant_options(&mut options, variant, &ctx);
        }
        destination.options = options.into_values().collect();

        let (availability, summary) = reduce_availability(source);
        destination.quantity = summary.quantity;
        destination.quantity_order_minimum = summary.min_order_quantity;
        destination.quantity_order_maximum = summary.max_order_quantity;
        destination.can_be_purchased = summary.can_be_purchased;

        let price = self
            .pricing
            .calculate_product_price(source)
            .map_err(ConversionError::pricing("pricing product"))?;
        if let Some(price) = price {
            let section = price_section(&price, availability, &ctx)?;
            destination.price = Some(section.price);
            destination.final_price = Some(section.final_price.clone());
            destination.original_price = Some(section.original_price.clone());
            destination.discounted = section.discounted;
            destination.product_price = Some(section);
        }

        if let Some(representative) = representative_id
            .and_then(|id| destination.variants.iter().find(|v| v.id == id))
        {
            if let Some(section) = &representative.product_price {
                destination.price = Some(section.price);
                destination.final_price = Some(section.final_price.clone());
                destination.original_price = Some(section.original_price.clone());
                destination.discounted = section.discounted;
                destination.product_price = Some(section.clone());
            }
            if let Some(image) = representative.images.iter().find(|i| i.default_image) {
                destination.image = Some(image.clone());
            }
        }

        if let Some(average) = source.review_average.and_then(|a| a.to_f64()) {
            destination.rating = (average * 2.0).round() / 2.0;
        }
        if let Some(count) = source.review_count {
            destination.rating_count = count;
        }

        destination.description = resolve_exact(&source.descriptions, language).map(readable_description);

        destination.categories = source
            .categories
            .iter()
            .map(|c| readable_category(c, language))
            .collect();

        destination.product_specifications = specification(source, store)?;

        tracing::debug!(
            product_id = source.id,
            variants = destination.variants.len(),
            options = destination.options.len(),
            "projected product"
        );

        Ok(destination)
    }
}

fn readable_description(description: &ProductDescription) -> ReadableDescription {
    let title = description
        .meta_title
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(description.name.as_str())
        .to_string();

    ReadableDescription {
        id: description.id,
        language: description.language.code.clone(),
        name: description.name.clone(),
        description: description.description.clone(),
        friendly_url: description.friendly_url.clone(),
        title,
        meta_description: description.meta_description.clone(),
        keywords: description.meta_keywords.clone(),
        highlights: description.highlights.clone(),
    }
}

fn specification(
    source: &Product,
    store: &MerchantStore,
) -> Result<ProductSpecification, ConversionError> {
    let dimension_unit_of_measure = match non_blank(store.dimension_unit_code.as_deref()) {
        Some(code) => Some(
            DimensionUnit::parse(code)
                .ok_or_else(|| ConversionError::UnknownDimensionUnit(code.to_string()))?,
        ),
        None => None,
    };
    let weight_unit_of_measure = match non_blank(store.weight_unit_code.as_deref()) {
        Some(code) => Some(
            WeightUnit::parse(code)
                .ok_or_else(|| ConversionError::UnknownWeightUnit(code.to_string()))?,
        ),
        None => None,
    };

    Ok(ProductSpecification {
        length: source.length,
        width: source.width,
        height: source.height,
        weight: source.weight,
        dimension_unit_of_measure,
        weight_unit_of_measure,
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[path = "product_test.rs"]
mod tests;
