//! Applies an inbound [`PersistableProduct`] to a new or loaded [`Product`].

use rust_decimal::Decimal;
use shopcat_core::dates::parse_date;
use shopcat_core::{
    Category, Language, Manufacturer, MerchantStore, PersistableDescription, PersistableProduct,
    Product, ProductDescription, ProductType,
};

use crate::error::ConversionError;

/// References named by the payload, already looked up by the caller.
#[derive(Debug, Clone, Default)]
pub struct ResolvedReferences {
    /// Every language the payload's descriptions may use.
    pub languages: Vec<Language>,
    pub manufacturer: Option<Manufacturer>,
    pub product_type: Option<ProductType>,
    /// Replaces the product's categories when non-empty.
    pub categories: Vec<Category>,
}

/// Merges `source` into `target`.
///
/// Descriptions replace the existing description of the same language.
/// When a price or quantity is given the product-wide availability and its
/// default price are created or updated.
///
/// # Errors
///
/// Returns [`ConversionError::Validation`] for a blank sku, a description
/// without name or with an unknown language, or a negative price, and
/// [`ConversionError::InvalidDate`] for a malformed availability date.
pub fn merge_persistable(
    source: &PersistableProduct,
    target: &mut Product,
    refs: &ResolvedReferences,
    store: &MerchantStore,
) -> Result<(), ConversionError> {
    let sku = source.sku.trim();
    if sku.is_empty() {
        return Err(ConversionError::Validation("product sku is required".into()));
    }

    target.sku = sku.to_string();
    target.ref_sku = source
        .ref_sku
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    target.merchant_store_id = store.id;
    target.available = source.available;
    target.shippable = source.product_shippable;
    target.is_virtual = source.product_virtual;
    target.pre_order = source.pre_order;
    target.sort_order = source.sort_order;

    if let Some(raw) = source.date_available.as_deref().filter(|d| !d.trim().is_empty()) {
        target.date_available = Some(parse_date(raw).map_err(|_| ConversionError::InvalidDate {
            field: "date_available",
            value: raw.to_string(),
        })?);
    }

    if let Some(manufacturer) = &refs.manufacturer {
        target.manufacturer = Some(manufacturer.clone());
    }
    if let Some(product_type) = &refs.product_type {
        target.product_type = Some(product_type.clone());
    }
    if !refs.categories.is_empty() {
        target.categories.clone_from(&refs.categories);
    }

    for (field, value) in [
        (&mut target.length, source.length),
        (&mut target.width, source.width),
        (&mut target.height, source.height),
        (&mut target.weight, source.weight),
    ] {
        if value.is_some() {
            *field = value;
        }
    }

    for description in &source.descriptions {
        merge_description(description, target, &refs.languages)?;
    }

    if let Some(price) = source.price {
        if price < Decimal::ZERO {
            return Err(ConversionError::Validation(format!(
                "price must not be negative, got {price}"
            )));
        }
    }
    if source.price.is_some() || source.quantity.is_some() {
        let availability = target.product_wide_availability_mut();
        if let Some(quantity) = source.quantity {
            availability.quantity = Some(quantity);
        }
        if let Some(price) = source.price {
            availability.default_price_or_insert().amount = price;
        }
    }

    Ok(())
}

fn merge_description(
    source: &PersistableDescription,
    target: &mut Product,
    languages: &[Language],
) -> Result<(), ConversionError> {
    let language = languages
        .iter()
        .find(|l| l.code.eq_ignore_ascii_case(source.language.trim()))
        .ok_or_else(|| {
            ConversionError::Validation(format!("unknown language \"{}\"", source.language))
        })?;

    if source.name.trim().is_empty() {
        return Err(ConversionError::Validation(format!(
            "description name is required for language \"{}\"",
            language.code
        )));
    }

    let existing_id = target
        .descriptions
        .iter()
        .find(|d| d.language.code == language.code)
        .map_or(0, |d| d.id);
    target.descriptions.retain(|d| d.language.code != language.code);

    target.descriptions.push(ProductDescription {
        id: existing_id,
        language: language.clone(),
        name: source.name.trim().to_string(),
        description: source.description.clone(),
        friendly_url: source.friendly_url.clone(),
        meta_title: source.title.clone(),
        meta_description: source.meta_description.clone(),
        meta_keywords: source.keywords.clone(),
        highlights: source.highlights.clone(),
    });
    Ok(())
}

#[cfg(test)]
#[path = "persistable_test.rs"]
mod tests;
