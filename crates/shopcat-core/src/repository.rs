//! Storage seams. The facade only ever talks to these traits; `shopcat-db`
//! provides the Postgres and in-memory implementations.

use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::Product;
use crate::reference::{Category, Language, Manufacturer, MerchantStore, ProductType};
use crate::review::ProductReview;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{entity} {id} not found")]
    Missing { entity: &'static str, id: i64 },

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Loads the full aggregate.
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Product>>;

    /// Loads the product whose own sku, or one of whose variants' sku, is `sku`.
    async fn find_by_sku(&self, store_id: i32, sku: &str) -> RepositoryResult<Option<Product>>;

    async fn exists_by_sku(&self, store_id: i32, sku: &str) -> RepositoryResult<bool>;

    /// Inserts when `product.id == 0`, otherwise replaces the stored
    /// aggregate. Returns the product id.
    async fn save(&self, product: &Product) -> RepositoryResult<i64>;

    async fn delete(&self, id: i64) -> RepositoryResult<()>;
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn list_reviews(&self, product_id: i64) -> RepositoryResult<Vec<ProductReview>>;

    async fn find_review(&self, id: i64) -> RepositoryResult<Option<ProductReview>>;

    /// Inserts when `review.id == 0`, otherwise updates. Returns the review id.
    async fn save_review(&self, review: &ProductReview) -> RepositoryResult<i64>;

    async fn delete_review(&self, id: i64) -> RepositoryResult<()>;
}

#[async_trait]
pub trait ReferenceRepository: Send + Sync {
    async fn find_store(&self, code: &str) -> RepositoryResult<Option<MerchantStore>>;

    async fn find_language(&self, code: &str) -> RepositoryResult<Option<Language>>;

    async fn list_languages(&self) -> RepositoryResult<Vec<Language>>;

    async fn find_category(&self, store_id: i32, id: i64) -> RepositoryResult<Option<Category>>;

    async fn find_manufacturer(&self, code: &str) -> RepositoryResult<Option<Manufacturer>>;

    async fn find_product_type(&self, code: &str) -> RepositoryResult<Option<ProductType>>;
}

/// Everything the facade needs from storage, as one object.
pub trait CatalogRepository: ProductRepository + ReviewRepository + ReferenceRepository {}

impl<T> CatalogRepository for T where T: ProductRepository + ReviewRepository + ReferenceRepository {}
