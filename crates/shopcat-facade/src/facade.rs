use std::sync::Arc;

use shopcat_core::{CatalogRepository, Language, MerchantStore, Product, ReadableProduct};
use shopcat_mapper::{ImageFilePath, PricingService, ReadableProductMapper};

use crate::error::{FacadeError, FacadeResult};

/// Entry point for every catalog operation. Each call loads what it needs,
/// mutates, persists through the repository and re-projects.
#[derive(Clone)]
pub struct ProductCommonFacade {
    pub(crate) repository: Arc<dyn CatalogRepository>,
    pub(crate) pricing: Arc<dyn PricingService>,
    pub(crate) mapper: ReadableProductMapper,
}

impl ProductCommonFacade {
    #[must_use]
    pub fn new(
        repository: Arc<dyn CatalogRepository>,
        pricing: Arc<dyn PricingService>,
        images: Arc<dyn ImageFilePath>,
    ) -> Self {
        Self {
            mapper: ReadableProductMapper::new(Arc::clone(&pricing), images),
            repository,
            pricing,
        }
    }

    /// Looks a store up by code.
    ///
    /// # Errors
    ///
    /// [`FacadeError::NotFound`] for an unknown code.
    pub async fn resolve_store(&self, code: &str) -> FacadeResult<MerchantStore> {
        self.repository
            .find_store(code)
            .await
            .map_err(FacadeError::storage("Cannot load store"))?
            .ok_or_else(|| {
                tracing::warn!(store = code, "store not found");
                FacadeError::NotFound(format!("store [{code}]"))
            })
    }

    /// The requested language, or the store's default when none is given.
    ///
    /// # Errors
    ///
    /// [`FacadeError::Validation`] for an unknown language code.
    pub async fn resolve_language(
        &self,
        code: Option<&str>,
        store: &MerchantStore,
    ) -> FacadeResult<Language> {
        let code = code
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(store.default_language.as_str());
        self.repository
            .find_language(code)
            .await
            .map_err(FacadeError::storage("Cannot load language"))?
            .ok_or_else(|| FacadeError::Validation(format!("unknown language \"{code}\"")))
    }

    /// Loads a product, treating products of other stores as absent.
    pub(crate) async fn load_in_store(
        &self,
        id: i64,
        store: &MerchantStore,
    ) -> FacadeResult<Product> {
        let product = self
            .repository
            .find_by_id(id)
            .await
            .map_err(FacadeError::storage(format!("Cannot load product [{id}]")))?;

        match product {
            Some(p) if p.merchant_store_id == store.id => Ok(p),
            Some(_) => {
                tracing::warn!(product_id = id, store = %store.code, "product belongs to another store");
                Err(FacadeError::NotFound(format!(
                    "product [{id}] for store [{}]",
                    store.code
                )))
            }
            None => {
                tracing::warn!(product_id = id, "product not found");
                Err(FacadeError::NotFound(format!("product [{id}]")))
            }
        }
    }

    pub(crate) async fn persist(&self, product: &Product, context: &str) -> FacadeResult<i64> {
        self.repository
            .save(product)
            .await
            .map_err(FacadeError::storage(context))
    }

    pub(crate) fn project(
        &self,
        product: &Product,
        store: &MerchantStore,
        language: &Language,
    ) -> FacadeResult<ReadableProduct> {
        self.mapper
            .convert(product, store, language)
            .map_err(FacadeError::conversion(format!(
                "Error converting product [{}]",
                product.id
            )))
    }

    /// Saves and reloads, so the projection carries stored ids.
    pub(crate) async fn persist_and_project(
        &self,
        product: &Product,
        store: &MerchantStore,
        language: &Language,
        context: &str,
    ) -> FacadeResult<ReadableProduct> {
        let id = self.persist(product, context).await?;
        let saved = self.load_in_store(id, store).await?;
        self.project(&saved, store, language)
    }
}
