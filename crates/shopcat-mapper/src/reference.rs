use shopcat_core::{
    Category, Language, Manufacturer, ProductType, ReadableCategory, ReadableCodeName,
    ReadableManufacturer, ReadableProductType,
};

use crate::locale::resolve;

#[must_use]
pub fn readable_category(category: &Category, language: &Language) -> ReadableCategory {
    let description = resolve(&category.descriptions, language);
    ReadableCategory {
        id: category.id,
        code: category.code.clone(),
        name: description.map(|d| d.name.clone()),
        description: description.and_then(|d| d.description.clone()),
    }
}

#[must_use]
pub fn readable_manufacturer(manufacturer: &Manufacturer, language: &Language) -> ReadableManufacturer {
    let description = resolve(&manufacturer.descriptions, language);
    ReadableManufacturer {
        id: manufacturer.id,
        code: manufacturer.code.clone(),
        name: description.map(|d| d.name.clone()),
        description: description.and_then(|d| d.description.clone()),
    }
}

#[must_use]
pub fn readable_product_type(product_type: &ProductType, language: &Language) -> ReadableProductType {
    ReadableCodeName {
        id: product_type.id,
        code: product_type.code.clone(),
        name: resolve(&product_type.descriptions, language).map(|d| d.name.clone()),
    }
}
