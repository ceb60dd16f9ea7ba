//! Database operations for `product_reviews` and their descriptions.

use chrono::{DateTime, NaiveDate, Utc};
use shopcat_core::{Language, ProductReview, ReviewDescription};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `product_reviews` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReviewRow {
    pub id: i64,
    pub product_id: i64,
    pub customer_id: i64,
    pub rating: f64,
    pub review_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct ReviewDescriptionRow {
    id: i64,
    review_id: i64,
    language_id: i32,
    language_code: String,
    name: Option<String>,
    description: String,
}

/// Returns every review of a product, oldest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if a query fails.
pub async fn list_reviews(pool: &PgPool, product_id: i64) -> Result<Vec<ProductReview>, DbError> {
    let rows = sqlx::query_as::<_, ReviewRow>(
        "SELECT id, product_id, customer_id, rating, review_date, created_at, updated_at \
         FROM product_reviews \
         WHERE product_id = $1 \
         ORDER BY review_date, id",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    with_descriptions(pool, rows).await
}

/// # Errors
///
/// Returns [`DbError::Sqlx`] if a query fails.
pub async fn find_review(pool: &PgPool, id: i64) -> Result<Option<ProductReview>, DbError> {
    let row = sqlx::query_as::<_, ReviewRow>(
        "SELECT id, product_id, customer_id, rating, review_date, created_at, updated_at \
         FROM product_reviews \
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => Ok(with_descriptions(pool, vec![row]).await?.pop()),
        None => Ok(None),
    }
}

/// Inserts a review (`id == 0`) or updates an existing one, replacing its
/// descriptions. Returns the review id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] when updating an unknown review, or
/// [`DbError::Sqlx`] if a statement fails.
pub async fn save_review(pool: &PgPool, review: &ProductReview) -> Result<i64, DbError> {
    let mut tx = pool.begin().await?;

    let id = if review.id == 0 {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO product_reviews (product_id, customer_id, rating, review_date) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id",
        )
        .bind(review.product_id)
        .bind(review.customer_id)
        .bind(review.rating)
        .bind(review.review_date)
        .fetch_one(&mut *tx)
        .await?
    } else {
        sqlx::query_scalar::<_, i64>(
            "UPDATE product_reviews SET \
                 product_id  = $2, \
                 customer_id = $3, \
                 rating      = $4, \
                 review_date = $5, \
                 updated_at  = NOW() \
             WHERE id = $1 \
             RETURNING id",
        )
        .bind(review.id)
        .bind(review.product_id)
        .bind(review.customer_id)
        .bind(review.rating)
        .bind(review.review_date)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(DbError::NotFound)?
    };

    sqlx::query("DELETE FROM product_review_descriptions WHERE review_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    for d in &review.descriptions {
        sqlx::query(
            "INSERT INTO product_review_descriptions \
                 (id, review_id, language_id, name, description) \
             VALUES (COALESCE($1, nextval('product_review_descriptions_id_seq')), \
                     $2, $3, $4, $5)",
        )
        .bind((d.id > 0).then_some(d.id))
        .bind(id)
        .bind(d.language.id)
        .bind(&d.name)
        .bind(&d.description)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    tracing::debug!(review_id = id, product_id = review.product_id, "review saved");
    Ok(id)
}

/// Returns `false` when no such review exists.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_review(pool: &PgPool, id: i64) -> Result<bool, DbError> {
    let result = sqlx::query("DELETE FROM product_reviews WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

async fn with_descriptions(
    pool: &PgPool,
    rows: Vec<ReviewRow>,
) -> Result<Vec<ProductReview>, DbError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let descriptions = sqlx::query_as::<_, ReviewDescriptionRow>(
        "SELECT d.id, d.review_id, l.id AS language_id, l.code AS language_code, \
                d.name, d.description \
         FROM product_review_descriptions d \
         JOIN languages l ON l.id = d.language_id \
         WHERE d.review_id = ANY($1) \
         ORDER BY d.id",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| ProductReview {
            id: row.id,
            product_id: row.product_id,
            customer_id: row.customer_id,
            rating: row.rating,
            review_date: row.review_date,
            descriptions: descriptions
                .iter()
                .filter(|d| d.review_id == row.id)
                .map(|d| ReviewDescription {
                    id: d.id,
                    language: Language::new(d.language_id, d.language_code.clone()),
                    name: d.name.clone(),
                    description: d.description.clone(),
                })
                .collect(),
        })
        .collect())
}
