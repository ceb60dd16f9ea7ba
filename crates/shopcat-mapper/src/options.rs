//! Splits product attributes into read-only properties and selectable
//! options, and accumulates selectable options keyed by option id.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use shopcat_core::{
    Language, NamedDescription, ProductAttribute, ProductOption, ProductOptionValue,
    ReadableCodeName, ReadableProductOption, ReadableProductOptionValue, ReadableProductProperty,
    ReadablePropertyValue, ReadableValueDescription,
};

use crate::context::MappingContext;
use crate::locale::resolve;

/// Selectable options ordered by option id.
pub type SelectableOptions = BTreeMap<i64, ReadableProductOption>;

/// Returns the projection of `option`, building and inserting it on first use.
///
/// An option without any usable description is still projected, with no name.
pub fn option_entry<'m>(
    options: &'m mut SelectableOptions,
    option: &ProductOption,
    language: &Language,
) -> &'m mut ReadableProductOption {
    options
        .entry(option.id)
        .or_insert_with(|| project_option(option, language))
}

fn project_option(option: &ProductOption, language: &Language) -> ReadableProductOption {
    let name = resolve(&option.descriptions, language).map(|d| d.name.clone());
    ReadableProductOption {
        id: option.id,
        code: option.code.clone(),
        option_type: option.option_type,
        lang: name.as_ref().map(|_| language.code.clone()),
        name,
        variant: false,
        option_values: Vec::new(),
    }
}

/// Appends `value` unless the option already holds a value with that code.
pub fn add_option_value(option: &mut ReadableProductOption, value: ReadableProductOptionValue) {
    if !option.option_values.iter().any(|v| v.code == value.code) {
        option.option_values.push(value);
    }
}

/// Projects a raw option value. Callers override `id`, `default_value` and
/// `price` as their source dictates.
#[must_use]
pub fn project_option_value(
    value: &ProductOptionValue,
    ctx: &MappingContext<'_>,
) -> ReadableProductOptionValue {
    let image = value
        .image
        .as_deref()
        .filter(|f| !f.trim().is_empty())
        .map(|f| ctx.images.property_image_path(ctx.store, f));

    ReadableProductOptionValue {
        id: value.id,
        code: value.code.clone(),
        sort_order: value.sort_order.unwrap_or(0),
        default_value: false,
        image,
        price: None,
        description: resolve(&value.descriptions, ctx.language)
            .map(|d| value_description(d, &ctx.language.code)),
    }
}

fn value_description(desc: &NamedDescription, language: &str) -> ReadableValueDescription {
    ReadableValueDescription {
        id: desc.id,
        language: language.to_string(),
        name: Some(desc.name.clone()),
        description: desc.description.clone(),
    }
}

/// Projects a display-only attribute as a name/value property carrying the
/// value's description in every language.
#[must_use]
pub fn project_property(attribute: &ProductAttribute, language: &Language) -> ReadableProductProperty {
    let option = &attribute.option;
    let value = &attribute.value;

    ReadableProductProperty {
        id: attribute.id,
        code: option.code.clone(),
        option_type: option.option_type,
        read_only: true,
        property: ReadableCodeName {
            id: option.id,
            code: option.code.clone(),
            name: resolve(&option.descriptions, language).map(|d| d.name.clone()),
        },
        property_value: ReadablePropertyValue {
            id: value.id,
            code: value.code.clone(),
            name: resolve(&value.descriptions, language).map(|d| d.name.clone()),
            values: value
                .descriptions
                .iter()
                .map(|d| value_description(d, &d.language.code))
                .collect(),
        },
    }
}

/// Partitions `attributes`: display-only ones are returned as properties,
/// the rest are merged into `options`.
pub fn classify_attributes(
    attributes: &[ProductAttribute],
    ctx: &MappingContext<'_>,
    options: &mut SelectableOptions,
) -> Vec<ReadableProductProperty> {
    let mut properties = Vec::new();

    for attribute in attributes {
        if attribute.display_only {
            properties.push(project_property(attribute, ctx.language));
            continue;
        }

        let mut value = project_option_value(&attribute.value, ctx);
        value.id = attribute.id;
        value.default_value = attribute.default;
        value.price = attribute
            .price
            .filter(|p| *p > Decimal::ZERO)
            .map(|p| ctx.pricing.display_amount(p, ctx.store));

        let option = option_entry(options, &attribute.option, ctx.language);
        add_option_value(option, value);
    }

    properties
}

#[cfg(test)]
#[path = "options_test.rs"]
mod tests;
