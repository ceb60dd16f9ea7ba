//! Database reads for languages, stores, categories, manufacturers and
//! product types. Reference data is maintained through migrations.

use shopcat_core::{Category, Language, Manufacturer, MerchantStore, ProductType};
use sqlx::PgPool;

use crate::descriptions::{self, load_named};
use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LanguageRow {
    pub id: i32,
    pub code: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MerchantStoreRow {
    pub id: i32,
    pub code: String,
    pub currency_code: String,
    pub default_language: String,
    pub dimension_unit_code: Option<String>,
    pub weight_unit_code: Option<String>,
}

/// A row from `manufacturers` or `product_types`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct CodeRow {
    pub id: i64,
    pub code: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct CategoryRow {
    pub id: i64,
    pub merchant_store_id: i32,
    pub code: String,
}

impl From<LanguageRow> for Language {
    fn from(row: LanguageRow) -> Self {
        Language::new(row.id, row.code)
    }
}

impl From<MerchantStoreRow> for MerchantStore {
    fn from(row: MerchantStoreRow) -> Self {
        MerchantStore {
            id: row.id,
            code: row.code,
            currency_code: row.currency_code,
            default_language: row.default_language,
            dimension_unit_code: row.dimension_unit_code,
            weight_unit_code: row.weight_unit_code,
        }
    }
}

// ---------------------------------------------------------------------------
// Stores and languages
// ---------------------------------------------------------------------------

/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_store_by_code(pool: &PgPool, code: &str) -> Result<Option<MerchantStore>, DbError> {
    let row = sqlx::query_as::<_, MerchantStoreRow>(
        "SELECT id, code, currency_code, default_language, dimension_unit_code, weight_unit_code \
         FROM merchant_stores \
         WHERE code = $1",
    )
    .bind(code)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(MerchantStore::from))
}

/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_language_by_code(pool: &PgPool, code: &str) -> Result<Option<Language>, DbError> {
    let row = sqlx::query_as::<_, LanguageRow>("SELECT id, code FROM languages WHERE code = $1")
        .bind(code)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(Language::from))
}

/// Returns every language ordered by id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_languages(pool: &PgPool) -> Result<Vec<Language>, DbError> {
    let rows = sqlx::query_as::<_, LanguageRow>("SELECT id, code FROM languages ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(Language::from).collect())
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Loads a category with its descriptions. Categories of other stores are
/// treated as absent.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if a query fails.
pub async fn find_category(
    pool: &PgPool,
    store_id: i32,
    id: i64,
) -> Result<Option<Category>, DbError> {
    let row = sqlx::query_as::<_, CategoryRow>(
        "SELECT id, merchant_store_id, code \
         FROM categories \
         WHERE id = $1 AND merchant_store_id = $2",
    )
    .bind(id)
    .bind(store_id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => Ok(assemble_categories(pool, vec![row]).await?.pop()),
        None => Ok(None),
    }
}

/// Categories a product is attached to, ordered by id.
pub(crate) async fn categories_of_product(
    pool: &PgPool,
    product_id: i64,
) -> Result<Vec<Category>, DbError> {
    let rows = sqlx::query_as::<_, CategoryRow>(
        "SELECT c.id, c.merchant_store_id, c.code \
         FROM categories c \
         JOIN product_categories pc ON pc.category_id = c.id \
         WHERE pc.product_id = $1 \
         ORDER BY c.id",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    assemble_categories(pool, rows).await
}

async fn assemble_categories(
    pool: &PgPool,
    rows: Vec<CategoryRow>,
) -> Result<Vec<Category>, DbError> {
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let mut descriptions = load_named(pool, descriptions::CATEGORY, &ids).await?;

    Ok(rows
        .into_iter()
        .map(|row| Category {
            id: row.id,
            merchant_store_id: row.merchant_store_id,
            descriptions: descriptions.remove(&row.id).unwrap_or_default(),
            code: row.code,
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Manufacturers and product types
// ---------------------------------------------------------------------------

/// # Errors
///
/// Returns [`DbError::Sqlx`] if a query fails.
pub async fn find_manufacturer_by_code(
    pool: &PgPool,
    code: &str,
) -> Result<Option<Manufacturer>, DbError> {
    let row = sqlx::query_as::<_, CodeRow>("SELECT id, code FROM manufacturers WHERE code = $1")
        .bind(code)
        .fetch_optional(pool)
        .await?;
    manufacturer_from_row(pool, row).await
}

pub(crate) async fn find_manufacturer_by_id(
    pool: &PgPool,
    id: i64,
) -> Result<Option<Manufacturer>, DbError> {
    let row = sqlx::query_as::<_, CodeRow>("SELECT id, code FROM manufacturers WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    manufacturer_from_row(pool, row).await
}

async fn manufacturer_from_row(
    pool: &PgPool,
    row: Option<CodeRow>,
) -> Result<Option<Manufacturer>, DbError> {
    let Some(row) = row else {
        return Ok(None);
    };
    let mut descriptions = load_named(pool, descriptions::MANUFACTURER, &[row.id]).await?;
    Ok(Some(Manufacturer {
        id: row.id,
        descriptions: descriptions.remove(&row.id).unwrap_or_default(),
        code: row.code,
    }))
}

/// # Errors
///
/// Returns [`DbError::Sqlx`] if a query fails.
pub async fn find_product_type_by_code(
    pool: &PgPool,
    code: &str,
) -> Result<Option<ProductType>, DbError> {
    let row = sqlx::query_as::<_, CodeRow>("SELECT id, code FROM product_types WHERE code = $1")
        .bind(code)
        .fetch_optional(pool)
        .await?;
    product_type_from_row(pool, row).await
}

pub(crate) async fn find_product_type_by_id(
    pool: &PgPool,
    id: i64,
) -> Result<Option<ProductType>, DbError> {
    let row = sqlx::query_as::<_, CodeRow>("SELECT id, code FROM product_types WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    product_type_from_row(pool, row).await
}

async fn product_type_from_row(
    pool: &PgPool,
    row: Option<CodeRow>,
) -> Result<Option<ProductType>, DbError> {
    let Some(row) = row else {
        return Ok(None);
    };
    let mut descriptions = load_named(pool, descriptions::PRODUCT_TYPE, &[row.id]).await?;
    Ok(Some(ProductType {
        id: row.id,
        descriptions: descriptions.remove(&row.id).unwrap_or_default(),
        code: row.code,
    }))
}
