use shopcat_core::{
    Product, ProductAttribute, ProductAvailability, ProductDescription, ProductImage,
    ProductVariant,
};
use sqlx::{PgConnection, PgPool};

use crate::DbError;

/// `Some(id)` for persisted entities; `None` lets the sequence pick one.
fn kept_id(id: i64) -> Option<i64> {
    (id > 0).then_some(id)
}

/// Inserts a new product (`id == 0`) or replaces an existing one, child rows
/// included, in a single transaction.
///
/// Child rows keep their ids across saves; new children get fresh ids.
///
/// Returns the product id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if `product.id` names no stored product, or
/// [`DbError::Sqlx`] if a statement fails (a sku already used in the store
/// surfaces as a unique violation).
pub async fn save_product(pool: &PgPool, product: &Product) -> Result<i64, DbError> {
    let mut tx = pool.begin().await?;

    let id = if product.is_new() {
        insert_product_row(&mut tx, product).await?
    } else {
        update_product_row(&mut tx, product)
            .await?
            .ok_or(DbError::NotFound)?
    };

    clear_children(&mut tx, id).await?;

    for description in &product.descriptions {
        insert_description(&mut tx, id, description).await?;
    }
    for attribute in &product.attributes {
        insert_attribute(&mut tx, id, attribute).await?;
    }
    for variant in &product.variants {
        let variant_id = insert_variant(&mut tx, id, variant).await?;
        for availability in &variant.availabilities {
            insert_availability(&mut tx, id, Some(variant_id), availability).await?;
        }
        for image in &variant.images {
            insert_image(&mut tx, id, Some(variant_id), image).await?;
        }
    }
    for availability in &product.availabilities {
        insert_availability(&mut tx, id, None, availability).await?;
    }
    for image in &product.images {
        insert_image(&mut tx, id, None, image).await?;
    }
    for category in &product.categories {
        sqlx::query(
            "INSERT INTO product_categories (product_id, category_id) \
             VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(id)
        .bind(category.id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    tracing::debug!(product_id = id, sku = %product.sku, "product saved");
    Ok(id)
}

/// Deletes a product and, through cascades, everything it owns.
///
/// Returns `false` when no such product exists.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_product(pool: &PgPool, id: i64) -> Result<bool, DbError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ---------------------------------------------------------------------------
// products row
// ---------------------------------------------------------------------------

async fn insert_product_row(conn: &mut PgConnection, p: &Product) -> Result<i64, DbError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO products \
             (merchant_store_id, sku, ref_sku, available, shippable, is_virtual, pre_order, \
              sort_order, date_available, review_average, review_count, \
              length, width, height, weight, manufacturer_id, product_type_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, \
                 $8, $9, $10, $11, \
                 $12, $13, $14, $15, $16, $17) \
         RETURNING id",
    )
    .bind(p.merchant_store_id)
    .bind(&p.sku)
    .bind(&p.ref_sku)
    .bind(p.available)
    .bind(p.shippable)
    .bind(p.is_virtual)
    .bind(p.pre_order)
    .bind(p.sort_order)
    .bind(p.date_available)
    .bind(p.review_average)
    .bind(p.review_count)
    .bind(p.length)
    .bind(p.width)
    .bind(p.height)
    .bind(p.weight)
    .bind(p.manufacturer.as_ref().map(|m| m.id))
    .bind(p.product_type.as_ref().map(|t| t.id))
    .fetch_one(&mut *conn)
    .await?;
    Ok(id)
}

async fn update_product_row(conn: &mut PgConnection, p: &Product) -> Result<Option<i64>, DbError> {
    let id = sqlx::query_scalar::<_, i64>(
        "UPDATE products SET \
             merchant_store_id = $2, \
             sku               = $3, \
             ref_sku           = $4, \
             available         = $5, \
             shippable         = $6, \
             is_virtual        = $7, \
             pre_order         = $8, \
             sort_order        = $9, \
             date_available    = $10, \
             review_average    = $11, \
             review_count      = $12, \
             length            = $13, \
             width             = $14, \
             height            = $15, \
             weight            = $16, \
             manufacturer_id   = $17, \
             product_type_id   = $18, \
             updated_at        = NOW() \
         WHERE id = $1 \
         RETURNING id",
    )
    .bind(p.id)
    .bind(p.merchant_store_id)
    .bind(&p.sku)
    .bind(&p.ref_sku)
    .bind(p.available)
    .bind(p.shippable)
    .bind(p.is_virtual)
    .bind(p.pre_order)
    .bind(p.sort_order)
    .bind(p.date_available)
    .bind(p.review_average)
    .bind(p.review_count)
    .bind(p.length)
    .bind(p.width)
    .bind(p.height)
    .bind(p.weight)
    .bind(p.manufacturer.as_ref().map(|m| m.id))
    .bind(p.product_type.as_ref().map(|t| t.id))
    .fetch_optional(&mut *conn)
    .await?;
    Ok(id)
}

// ---------------------------------------------------------------------------
// child rows
// ---------------------------------------------------------------------------

async fn clear_children(conn: &mut PgConnection, product_id: i64) -> Result<(), DbError> {
    // Prices and price descriptions cascade from availabilities.
    for sql in [
        "DELETE FROM product_availabilities WHERE product_id = $1",
        "DELETE FROM product_images WHERE product_id = $1",
        "DELETE FROM product_variants WHERE product_id = $1",
        "DELETE FROM product_attributes WHERE product_id = $1",
        "DELETE FROM product_descriptions WHERE product_id = $1",
        "DELETE FROM product_categories WHERE product_id = $1",
    ] {
        sqlx::query(sql).bind(product_id).execute(&mut *conn).await?;
    }
    Ok(())
}

async fn insert_description(
    conn: &mut PgConnection,
    product_id: i64,
    d: &ProductDescription,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO product_descriptions \
             (id, product_id, language_id, name, description, friendly_url, \
              meta_title, meta_description, meta_keywords, highlights) \
         VALUES (COALESCE($1, nextval('product_descriptions_id_seq')), $2, $3, $4, $5, $6, \
                 $7, $8, $9, $10)",
    )
    .bind(kept_id(d.id))
    .bind(product_id)
    .bind(d.language.id)
    .bind(&d.name)
    .bind(&d.description)
    .bind(&d.friendly_url)
    .bind(&d.meta_title)
    .bind(&d.meta_description)
    .bind(&d.meta_keywords)
    .bind(&d.highlights)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

async fn insert_attribute(
    conn: &mut PgConnection,
    product_id: i64,
    a: &ProductAttribute,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO product_attributes \
             (id, product_id, option_id, option_value_id, display_only, is_default, \
              price, sort_order) \
         VALUES (COALESCE($1, nextval('product_attributes_id_seq')), $2, $3, $4, $5, $6, \
                 $7, $8)",
    )
    .bind(kept_id(a.id))
    .bind(product_id)
    .bind(a.option.id)
    .bind(a.value.id)
    .bind(a.display_only)
    .bind(a.default)
    .bind(a.price)
    .bind(a.sort_order)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

async fn insert_variant(
    conn: &mut PgConnection,
    product_id: i64,
    v: &ProductVariant,
) -> Result<i64, DbError> {
    let primary = v.variation.as_ref();
    let secondary = v.secondary_variation.as_ref();

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO product_variants \
             (id, product_id, sku, code, available, default_selection, sort_order, \
              variation_code, variation_option_id, variation_value_id, \
              secondary_code, secondary_option_id, secondary_value_id) \
         VALUES (COALESCE($1, nextval('product_variants_id_seq')), $2, $3, $4, $5, $6, $7, \
                 $8, $9, $10, \
                 $11, $12, $13) \
         RETURNING id",
    )
    .bind(kept_id(v.id))
    .bind(product_id)
    .bind(&v.sku)
    .bind(&v.code)
    .bind(v.available)
    .bind(v.default_selection)
    .bind(v.sort_order)
    .bind(primary.map(|x| x.code.as_str()))
    .bind(primary.map(|x| x.option.id))
    .bind(primary.map(|x| x.value.id))
    .bind(secondary.map(|x| x.code.as_str()))
    .bind(secondary.map(|x| x.option.id))
    .bind(secondary.map(|x| x.value.id))
    .fetch_one(&mut *conn)
    .await?;
    Ok(id)
}

async fn insert_availability(
    conn: &mut PgConnection,
    product_id: i64,
    variant_id: Option<i64>,
    a: &ProductAvailability,
) -> Result<(), DbError> {
    let availability_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO product_availabilities \
             (id, product_id, variant_id, quantity, min_order_quantity, max_order_quantity, \
              region, region_variant) \
         VALUES (COALESCE($1, nextval('product_availabilities_id_seq')), $2, $3, $4, $5, $6, \
                 $7, $8) \
         RETURNING id",
    )
    .bind(kept_id(a.id))
    .bind(product_id)
    .bind(variant_id)
    .bind(a.quantity)
    .bind(a.min_order_quantity)
    .bind(a.max_order_quantity)
    .bind(&a.region)
    .bind(&a.region_variant)
    .fetch_one(&mut *conn)
    .await?;

    for price in &a.prices {
        let price_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO product_prices \
                 (id, availability_id, code, is_default, amount, special_amount, \
                  special_start, special_end) \
             VALUES (COALESCE($1, nextval('product_prices_id_seq')), $2, $3, $4, $5, $6, \
                     $7, $8) \
             RETURNING id",
        )
        .bind(kept_id(price.id))
        .bind(availability_id)
        .bind(&price.code)
        .bind(price.default)
        .bind(price.amount)
        .bind(price.special_amount)
        .bind(price.special_start)
        .bind(price.special_end)
        .fetch_one(&mut *conn)
        .await?;

        for d in &price.descriptions {
            sqlx::query(
                "INSERT INTO product_price_descriptions \
                     (id, price_id, language_id, name, price_appender) \
                 VALUES (COALESCE($1, nextval('product_price_descriptions_id_seq')), \
                         $2, $3, $4, $5)",
            )
            .bind(kept_id(d.id))
            .bind(price_id)
            .bind(d.language.id)
            .bind(&d.name)
            .bind(&d.price_appender)
            .execute(&mut *conn)
            .await?;
        }
    }
    Ok(())
}

async fn insert_image(
    conn: &mut PgConnection,
    product_id: i64,
    variant_id: Option<i64>,
    image: &ProductImage,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO product_images \
             (id, product_id, variant_id, file_name, is_default, image_type, external_url) \
         VALUES (COALESCE($1, nextval('product_images_id_seq')), $2, $3, $4, $5, $6, $7)",
    )
    .bind(kept_id(image.id))
    .bind(product_id)
    .bind(variant_id)
    .bind(&image.file_name)
    .bind(image.default)
    .bind(image.image_type.code())
    .bind(&image.external_url)
    .execute(&mut *conn)
    .await?;
    Ok(())
}
