use shopcat_core::ProductImage;

use super::*;
use crate::fixtures::{availability, base_price, option, option_value, tshirt, variant, TestEnv};

fn with_color(mut v: ProductVariant, value_id: i64, code: &str) -> ProductVariant {
    v.secondary_variation = Some(ProductVariation {
        code: format!("color-{code}"),
        option: option(2, "color", "Color"),
        value: option_value(value_id, code, code),
    });
    v
}

#[test]
fn project_variant_copies_identity_and_variations() {
    let env = TestEnv::new();
    let product = tshirt();
    let v = with_color(variant(1, "TSHIRT-S", (10, "s"), true), 20, "red");
    let projected = project_variant(&v, &product, &env.ctx()).unwrap();

    assert_eq!(projected.id, 1);
    assert_eq!(projected.sku, "TSHIRT-S");
    assert!(projected.default_selection);
    let variation = projected.variation.unwrap();
    assert_eq!(variation.option.code, "size");
    assert_eq!(variation.value.name.as_deref(), Some("S"));
    assert_eq!(projected.secondary_variation.unwrap().value.code, "red");
}

#[test]
fn project_variant_prices_from_own_availability() {
    let env = TestEnv::new();
    let product = tshirt();
    let mut v = variant(1, "TSHIRT-XL", (13, "xl"), false);
    v.availabilities = vec![availability(210, Some(7), vec![base_price(310, 2299)])];
    let projected = project_variant(&v, &product, &env.ctx()).unwrap();

    assert_eq!(projected.quantity, 7);
    let price = projected.product_price.unwrap();
    assert_eq!(price.final_price, "$22.99");
    assert_eq!(price.id, Some(310));
}

#[test]
fn project_variant_without_availability_inherits_product_stock_and_price() {
    let env = TestEnv::new();
    let product = tshirt();
    let v = variant(1, "TSHIRT-S", (10, "s"), false);
    let projected = project_variant(&v, &product, &env.ctx()).unwrap();

    assert_eq!(projected.quantity, 5);
    let price = projected.product_price.unwrap();
    assert_eq!(price.final_price, "$19.99");
    assert_eq!(price.id, Some(300));
}

#[test]
fn project_variant_images_live_under_product_sku() {
    let env = TestEnv::new();
    let product = tshirt();
    let mut v = variant(1, "TSHIRT-S", (10, "s"), false);
    v.images = vec![ProductImage {
        id: 1,
        file_name: "small.jpg".to_string(),
        default: true,
        ..ProductImage::default()
    }];
    let projected = project_variant(&v, &product, &env.ctx()).unwrap();
    assert_eq!(
        projected.images[0].image_url,
        "/static/products/DEFAULT/TSHIRT/small.jpg"
    );
}

#[test]
fn project_variant_without_any_availability_has_no_stock() {
    let env = TestEnv::new();
    let mut product = tshirt();
    product.availabilities.clear();
    let v = variant(1, "TSHIRT-S", (10, "s"), false);
    let projected = project_variant(&v, &product, &env.ctx()).unwrap();

    assert_eq!(projected.quantity, 0);
}

#[test]
fn merge_marks_options_as_variant_and_uses_variant_id() {
    let env = TestEnv::new();
    let mut options = SelectableOptions::new();
    merge_variant_options(
        &mut options,
        &with_color(variant(7, "TSHIRT-S", (10, "s"), true), 20, "red"),
        &env.ctx(),
    );

    assert_eq!(options.len(), 2);
    assert!(options[&1].variant);
    assert!(options[&2].variant);
    let size_value = &options[&1].option_values[0];
    assert_eq!(size_value.id, 7);
    assert!(size_value.default_value);
}

#[test]
fn merge_deduplicates_values_by_code_across_variants() {
    let env = TestEnv::new();
    let mut options = SelectableOptions::new();
    let variants = [
        with_color(variant(1, "S-RED", (10, "s"), false), 20, "red"),
        with_color(variant(2, "S-BLUE", (10, "s"), false), 21, "blue"),
        with_color(variant(3, "M-RED", (11, "m"), false), 20, "red"),
    ];
    for v in &variants {
        merge_variant_options(&mut options, v, &env.ctx());
    }

    let sizes: Vec<&str> = options[&1]
        .option_values
        .iter()
        .map(|v| v.code.as_str())
        .collect();
    let colors: Vec<&str> = options[&2]
        .option_values
        .iter()
        .map(|v| v.code.as_str())
        .collect();
    assert_eq!(sizes, vec!["s", "m"]);
    assert_eq!(colors, vec!["red", "blue"]);
}

#[test]
fn variant_without_variation_contributes_nothing() {
    let env = TestEnv::new();
    let mut options = SelectableOptions::new();
    let mut v = variant(1, "PLAIN", (10, "s"), false);
    v.variation = None;
    merge_variant_options(&mut options, &v, &env.ctx());
    assert!(options.is_empty());
}
