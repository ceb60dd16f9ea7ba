use std::collections::HashMap;

use shopcat_core::{
    ImageType, Language, OptionType, Product, ProductAttribute, ProductAvailability,
    ProductDescription, ProductImage, ProductOption, ProductOptionValue, ProductPrice,
    ProductPriceDescription, ProductVariant, ProductVariation,
};
use sqlx::PgPool;

use super::types::{
    AttributeRow, AvailabilityRow, ImageRow, OptionRow, OptionValueRow, PriceDescriptionRow,
    PriceRow, ProductDescriptionRow, ProductRow, VariantRow,
};
use crate::descriptions::{self, load_named};
use crate::reference::{categories_of_product, find_manufacturer_by_id, find_product_type_by_id};
use crate::DbError;

/// Loads the full product aggregate.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if a query fails, or [`DbError::InvalidValue`]
/// if a stored option type is unknown.
pub async fn find_product(pool: &PgPool, id: i64) -> Result<Option<Product>, DbError> {
    let row = sqlx::query_as::<_, ProductRow>(
        "SELECT id, merchant_store_id, sku, ref_sku, available, shippable, is_virtual, \
                pre_order, sort_order, date_available, review_average, review_count, \
                length, width, height, weight, manufacturer_id, product_type_id, \
                created_at, updated_at \
         FROM products \
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => Ok(Some(assemble(pool, row).await?)),
        None => Ok(None),
    }
}

/// Returns the id of the product in `store_id` whose own sku is `sku`, or
/// failing that, the product owning a variant with that sku.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_product_id_by_sku(
    pool: &PgPool,
    store_id: i32,
    sku: &str,
) -> Result<Option<i64>, DbError> {
    let id = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM ( \
             SELECT p.id, 0 AS priority \
             FROM products p \
             WHERE p.merchant_store_id = $1 AND p.sku = $2 \
             UNION ALL \
             SELECT v.product_id AS id, 1 AS priority \
             FROM product_variants v \
             JOIN products p ON p.id = v.product_id \
             WHERE p.merchant_store_id = $1 AND v.sku = $2 \
         ) matches \
         ORDER BY priority, id \
         LIMIT 1",
    )
    .bind(store_id)
    .bind(sku)
    .fetch_optional(pool)
    .await?;

    Ok(id)
}

/// Whether a product or variant in `store_id` already uses `sku`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn sku_exists(pool: &PgPool, store_id: i32, sku: &str) -> Result<bool, DbError> {
    Ok(find_product_id_by_sku(pool, store_id, sku).await?.is_some())
}

// ---------------------------------------------------------------------------
// Aggregate assembly
// ---------------------------------------------------------------------------

async fn assemble(pool: &PgPool, row: ProductRow) -> Result<Product, DbError> {
    let descriptions = load_descriptions(pool, row.id).await?;
    let attribute_rows = load_attribute_rows(pool, row.id).await?;
    let variant_rows = load_variant_rows(pool, row.id).await?;

    let mut option_ids: Vec<i64> = attribute_rows.iter().map(|a| a.option_id).collect();
    let mut value_ids: Vec<i64> = attribute_rows.iter().map(|a| a.option_value_id).collect();
    for v in &variant_rows {
        option_ids.extend(v.variation_option_id);
        option_ids.extend(v.secondary_option_id);
        value_ids.extend(v.variation_value_id);
        value_ids.extend(v.secondary_value_id);
    }
    option_ids.sort_unstable();
    option_ids.dedup();
    value_ids.sort_unstable();
    value_ids.dedup();

    let options = load_options(pool, &option_ids).await?;
    let values = load_option_values(pool, &value_ids).await?;

    let mut availabilities = load_availabilities(pool, row.id).await?;
    let mut images = load_images(pool, row.id).await?;

    let attributes = attribute_rows
        .into_iter()
        .map(|a| {
            Ok(ProductAttribute {
                id: a.id,
                option: lookup(&options, a.option_id, "product option")?,
                value: lookup(&values, a.option_value_id, "option value")?,
                display_only: a.display_only,
                default: a.is_default,
                price: a.price,
                sort_order: a.sort_order,
            })
        })
        .collect::<Result<Vec<_>, DbError>>()?;

    let mut variants = Vec::with_capacity(variant_rows.len());
    for v in variant_rows {
        let variation = build_variation(
            v.variation_code,
            v.variation_option_id,
            v.variation_value_id,
            &options,
            &values,
        )?;
        let secondary_variation = build_variation(
            v.secondary_code,
            v.secondary_option_id,
            v.secondary_value_id,
            &options,
            &values,
        )?;
        variants.push(ProductVariant {
            id: v.id,
            availabilities: availabilities.remove(&Some(v.id)).unwrap_or_default(),
            images: images.remove(&Some(v.id)).unwrap_or_default(),
            sku: v.sku,
            code: v.code,
            available: v.available,
            default_selection: v.default_selection,
            sort_order: v.sort_order,
            variation,
            secondary_variation,
        });
    }

    let manufacturer = match row.manufacturer_id {
        Some(id) => find_manufacturer_by_id(pool, id).await?,
        None => None,
    };
    let product_type = match row.product_type_id {
        Some(id) => find_product_type_by_id(pool, id).await?,
        None => None,
    };
    let categories = categories_of_product(pool, row.id).await?;

    Ok(Product {
        id: row.id,
        sku: row.sku,
        ref_sku: row.ref_sku,
        merchant_store_id: row.merchant_store_id,
        available: row.available,
        shippable: row.shippable,
        is_virtual: row.is_virtual,
        pre_order: row.pre_order,
        sort_order: row.sort_order,
        date_available: row.date_available,
        created_at: Some(row.created_at),
        review_average: row.review_average,
        review_count: row.review_count,
        length: row.length,
        width: row.width,
        height: row.height,
        weight: row.weight,
        manufacturer,
        product_type,
        descriptions,
        attributes,
        variants,
        availabilities: availabilities.remove(&None).unwrap_or_default(),
        categories,
        images: images.remove(&None).unwrap_or_default(),
    })
}

fn lookup<T: Clone>(map: &HashMap<i64, T>, id: i64, what: &str) -> Result<T, DbError> {
    map.get(&id)
        .cloned()
        .ok_or_else(|| DbError::InvalidValue(format!("{what} {id} does not exist")))
}

fn build_variation(
    code: Option<String>,
    option_id: Option<i64>,
    value_id: Option<i64>,
    options: &HashMap<i64, ProductOption>,
    values: &HashMap<i64, ProductOptionValue>,
) -> Result<Option<ProductVariation>, DbError> {
    let (Some(option_id), Some(value_id)) = (option_id, value_id) else {
        return Ok(None);
    };
    Ok(Some(ProductVariation {
        code: code.unwrap_or_default(),
        option: lookup(options, option_id, "product option")?,
        value: lookup(values, value_id, "option value")?,
    }))
}

// ---------------------------------------------------------------------------
// Child tables
// ---------------------------------------------------------------------------

async fn load_descriptions(
    pool: &PgPool,
    product_id: i64,
) -> Result<Vec<ProductDescription>, DbError> {
    let rows = sqlx::query_as::<_, ProductDescriptionRow>(
        "SELECT d.id, l.id AS language_id, l.code AS language_code, d.name, d.description, \
                d.friendly_url, d.meta_title, d.meta_description, d.meta_keywords, d.highlights \
         FROM product_descriptions d \
         JOIN languages l ON l.id = d.language_id \
         WHERE d.product_id = $1 \
         ORDER BY d.id",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| ProductDescription {
            id: r.id,
            language: Language::new(r.language_id, r.language_code),
            name: r.name,
            description: r.description,
            friendly_url: r.friendly_url,
            meta_title: r.meta_title,
            meta_description: r.meta_description,
            meta_keywords: r.meta_keywords,
            highlights: r.highlights,
        })
        .collect())
}

async fn load_attribute_rows(pool: &PgPool, product_id: i64) -> Result<Vec<AttributeRow>, DbError> {
    let rows = sqlx::query_as::<_, AttributeRow>(
        "SELECT id, option_id, option_value_id, display_only, is_default, price, sort_order \
         FROM product_attributes \
         WHERE product_id = $1 \
         ORDER BY id",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

async fn load_variant_rows(pool: &PgPool, product_id: i64) -> Result<Vec<VariantRow>, DbError> {
    let rows = sqlx::query_as::<_, VariantRow>(
        "SELECT id, sku, code, available, default_selection, sort_order, \
                variation_code, variation_option_id, variation_value_id, \
                secondary_code, secondary_option_id, secondary_value_id \
         FROM product_variants \
         WHERE product_id = $1 \
         ORDER BY id",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

async fn load_options(
    pool: &PgPool,
    ids: &[i64],
) -> Result<HashMap<i64, ProductOption>, DbError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = sqlx::query_as::<_, OptionRow>(
        "SELECT id, code, option_type FROM product_options WHERE id = ANY($1)",
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;
    let mut descriptions = load_named(pool, descriptions::OPTION, ids).await?;

    let mut options = HashMap::with_capacity(rows.len());
    for row in rows {
        let option_type = OptionType::parse(&row.option_type).ok_or_else(|| {
            DbError::InvalidValue(format!("unknown option type '{}'", row.option_type))
        })?;
        options.insert(
            row.id,
            ProductOption {
                id: row.id,
                code: row.code,
                option_type,
                descriptions: descriptions.remove(&row.id).unwrap_or_default(),
            },
        );
    }
    Ok(options)
}

async fn load_option_values(
    pool: &PgPool,
    ids: &[i64],
) -> Result<HashMap<i64, ProductOptionValue>, DbError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = sqlx::query_as::<_, OptionValueRow>(
        "SELECT id, code, image, sort_order FROM product_option_values WHERE id = ANY($1)",
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;
    let mut descriptions = load_named(pool, descriptions::OPTION_VALUE, ids).await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let value = ProductOptionValue {
                id: row.id,
                descriptions: descriptions.remove(&row.id).unwrap_or_default(),
                code: row.code,
                image: row.image,
                sort_order: row.sort_order,
            };
            (value.id, value)
        })
        .collect())
}

/// Availabilities of the product and its variants, keyed by owning variant
/// (`None` for product-level records), each with its prices.
async fn load_availabilities(
    pool: &PgPool,
    product_id: i64,
) -> Result<HashMap<Option<i64>, Vec<ProductAvailability>>, DbError> {
    let rows = sqlx::query_as::<_, AvailabilityRow>(
        "SELECT id, variant_id, quantity, min_order_quantity, max_order_quantity, \
                region, region_variant \
         FROM product_availabilities \
         WHERE product_id = $1 \
         ORDER BY id",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let mut prices = load_prices(pool, &ids).await?;

    let mut grouped: HashMap<Option<i64>, Vec<ProductAvailability>> = HashMap::new();
    for row in rows {
        grouped
            .entry(row.variant_id)
            .or_default()
            .push(ProductAvailability {
                id: row.id,
                quantity: row.quantity,
                min_order_quantity: row.min_order_quantity,
                max_order_quantity: row.max_order_quantity,
                region: row.region,
                region_variant: row.region_variant,
                variant_id: row.variant_id,
                prices: prices.remove(&row.id).unwrap_or_default(),
            });
    }
    Ok(grouped)
}

async fn load_prices(
    pool: &PgPool,
    availability_ids: &[i64],
) -> Result<HashMap<i64, Vec<ProductPrice>>, DbError> {
    if availability_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = sqlx::query_as::<_, PriceRow>(
        "SELECT id, availability_id, code, is_default, amount, special_amount, \
                special_start, special_end \
         FROM product_prices \
         WHERE availability_id = ANY($1) \
         ORDER BY id",
    )
    .bind(availability_ids)
    .fetch_all(pool)
    .await?;

    let price_ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let description_rows = if price_ids.is_empty() {
        Vec::new()
    } else {
        sqlx::query_as::<_, PriceDescriptionRow>(
            "SELECT d.id, d.price_id, l.id AS language_id, l.code AS language_code, \
                    d.name, d.price_appender \
             FROM product_price_descriptions d \
             JOIN languages l ON l.id = d.language_id \
             WHERE d.price_id = ANY($1) \
             ORDER BY d.id",
        )
        .bind(&price_ids)
        .fetch_all(pool)
        .await?
    };

    let mut descriptions: HashMap<i64, Vec<ProductPriceDescription>> = HashMap::new();
    for d in description_rows {
        descriptions
            .entry(d.price_id)
            .or_default()
            .push(ProductPriceDescription {
                id: d.id,
                language: Language::new(d.language_id, d.language_code),
                name: d.name,
                price_appender: d.price_appender,
            });
    }

    let mut grouped: HashMap<i64, Vec<ProductPrice>> = HashMap::new();
    for row in rows {
        grouped
            .entry(row.availability_id)
            .or_default()
            .push(ProductPrice {
                id: row.id,
                descriptions: descriptions.remove(&row.id).unwrap_or_default(),
                code: row.code,
                default: row.is_default,
                amount: row.amount,
                special_amount: row.special_amount,
                special_start: row.special_start,
                special_end: row.special_end,
            });
    }
    Ok(grouped)
}

async fn load_images(
    pool: &PgPool,
    product_id: i64,
) -> Result<HashMap<Option<i64>, Vec<ProductImage>>, DbError> {
    let rows = sqlx::query_as::<_, ImageRow>(
        "SELECT id, variant_id, file_name, is_default, image_type, external_url \
         FROM product_images \
         WHERE product_id = $1 \
         ORDER BY id",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    let mut grouped: HashMap<Option<i64>, Vec<ProductImage>> = HashMap::new();
    for row in rows {
        grouped.entry(row.variant_id).or_default().push(ProductImage {
            id: row.id,
            file_name: row.file_name,
            default: row.is_default,
            image_type: ImageType::from_code(row.image_type),
            external_url: row.external_url,
        });
    }
    Ok(grouped)
}
