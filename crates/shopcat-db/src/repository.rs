//! Postgres-backed implementation of the catalog repository traits.

use async_trait::async_trait;
use shopcat_core::{
    Category, Language, Manufacturer, MerchantStore, Product, ProductRepository, ProductReview,
    ProductType, ReferenceRepository, RepositoryError, RepositoryResult, ReviewRepository,
};
use sqlx::PgPool;

use crate::{products, reference, reviews, DbError};

#[derive(Debug, Clone)]
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ProductRepository for PgCatalogRepository {
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Product>> {
        Ok(products::find_product(&self.pool, id).await?)
    }

    async fn find_by_sku(&self, store_id: i32, sku: &str) -> RepositoryResult<Option<Product>> {
        match products::find_product_id_by_sku(&self.pool, store_id, sku).await? {
            Some(id) => self.find_by_id(id).await,
            None => Ok(None),
        }
    }

    async fn exists_by_sku(&self, store_id: i32, sku: &str) -> RepositoryResult<bool> {
        Ok(products::sku_exists(&self.pool, store_id, sku).await?)
    }

    async fn save(&self, product: &Product) -> RepositoryResult<i64> {
        products::save_product(&self.pool, product)
            .await
            .map_err(|e| match e {
                DbError::NotFound => RepositoryError::Missing {
                    entity: "product",
                    id: product.id,
                },
                other => other.into(),
            })
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        if products::delete_product(&self.pool, id).await? {
            Ok(())
        } else {
            Err(RepositoryError::Missing {
                entity: "product",
                id,
            })
        }
    }
}

#[async_trait]
impl ReviewRepository for PgCatalogRepository {
    async fn list_reviews(&self, product_id: i64) -> RepositoryResult<Vec<ProductReview>> {
        Ok(reviews::list_reviews(&self.pool, product_id).await?)
    }

    async fn find_review(&self, id: i64) -> RepositoryResult<Option<ProductReview>> {
        Ok(reviews::find_review(&self.pool, id).await?)
    }

    async fn save_review(&self, review: &ProductReview) -> RepositoryResult<i64> {
        reviews::save_review(&self.pool, review)
            .await
            .map_err(|e| match e {
                DbError::NotFound => RepositoryError::Missing {
                    entity: "review",
                    id: review.id,
                },
                other => other.into(),
            })
    }

    async fn delete_review(&self, id: i64) -> RepositoryResult<()> {
        if reviews::delete_review(&self.pool, id).await? {
            Ok(())
        } else {
            Err(RepositoryError::Missing {
                entity: "review",
                id,
            })
        }
    }
}

#[async_trait]
impl ReferenceRepository for PgCatalogRepository {
    async fn find_store(&self, code: &str) -> RepositoryResult<Option<MerchantStore>> {
        Ok(reference::find_store_by_code(&self.pool, code).await?)
    }

    async fn find_language(&self, code: &str) -> RepositoryResult<Option<Language>> {
        Ok(reference::find_language_by_code(&self.pool, code).await?)
    }

    async fn list_languages(&self) -> RepositoryResult<Vec<Language>> {
        Ok(reference::list_languages(&self.pool).await?)
    }

    async fn find_category(&self, store_id: i32, id: i64) -> RepositoryResult<Option<Category>> {
        Ok(reference::find_category(&self.pool, store_id, id).await?)
    }

    async fn find_manufacturer(&self, code: &str) -> RepositoryResult<Option<Manufacturer>> {
        Ok(reference::find_manufacturer_by_code(&self.pool, code).await?)
    }

    async fn find_product_type(&self, code: &str) -> RepositoryResult<Option<ProductType>> {
        Ok(reference::find_product_type_by_code(&self.pool, code).await?)
    }
}
