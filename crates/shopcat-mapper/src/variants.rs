//! Variant projection and the merge of variant option pairs into the
//! selectable-option map.

use shopcat_core::{
    select_availability, Language, Product, ProductVariant, ProductVariation, ReadableCodeName,
    ReadableProductVariant, ReadableVariation,
};

use crate::context::MappingContext;
use crate::error::ConversionError;
use crate::images::readable_image;
use crate::locale::resolve;
use crate::options::{add_option_value, option_entry, project_option_value, SelectableOptions};
use crate::price::price_section;

/// Projects one variant of `product`.
///
/// # Errors
///
/// Returns [`ConversionError`] when the variant cannot be priced.
pub fn project_variant(
    variant: &ProductVariant,
    product: &Product,
    ctx: &MappingContext<'_>,
) -> Result<ReadableProductVariant, ConversionError> {
    let own_availability = select_availability(&variant.availabilities);
    let availability = own_availability.or_else(|| product.authoritative_availability());

    let quantity = availability.map_or(0, |a| a.quantity.unwrap_or(1));

    let product_price = ctx
        .pricing
        .calculate_variant_price(variant, product)
        .map_err(ConversionError::pricing("pricing variant"))?
        .map(|price| price_section(&price, availability, ctx))
        .transpose()?;

    Ok(ReadableProductVariant {
        id: variant.id,
        sku: variant.sku.clone(),
        code: variant.code.clone(),
        available: variant.available,
        default_selection: variant.default_selection,
        sort_order: variant.sort_order,
        variation: variant
            .variation
            .as_ref()
            .map(|v| project_variation(v, ctx.language)),
        secondary_variation: variant
            .secondary_variation
            .as_ref()
            .map(|v| project_variation(v, ctx.language)),
        quantity,
        product_price,
        images: variant
            .images
            .iter()
            .map(|i| readable_image(i, &product.sku, ctx))
            .collect(),
    })
}

fn project_variation(variation: &ProductVariation, language: &Language) -> ReadableVariation {
    ReadableVariation {
        option: ReadableCodeName {
            id: variation.option.id,
            code: variation.option.code.clone(),
            name: resolve(&variation.option.descriptions, language).map(|d| d.name.clone()),
        },
        value: ReadableCodeName {
            id: variation.value.id,
            code: variation.value.code.clone(),
            name: resolve(&variation.value.descriptions, language).map(|d| d.name.clone()),
        },
    }
}

/// Merges the primary and secondary variation of `variant` into `options`.
/// Values contributed this way carry the variant id.
pub fn merge_variant_options(
    options: &mut SelectableOptions,
    variant: &ProductVariant,
    ctx: &MappingContext<'_>,
) {
    let variations = [variant.variation.as_ref(), variant.secondary_variation.as_ref()];
    for variation in variations.into_iter().flatten() {
        let mut value = project_option_value(&variation.value, ctx);
        value.id = variant.id;
        value.default_value = variant.default_selection;

        let option = option_entry(options, &variation.option, ctx.language);
        option.variant = true;
        add_option_value(option, value);
    }
}

#[cfg(test)]
#[path = "variants_test.rs"]
mod tests;
