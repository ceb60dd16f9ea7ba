use shopcat_core::{Language, MerchantStore, ReadableProduct};

use crate::error::{FacadeError, FacadeResult};
use crate::facade::ProductCommonFacade;

impl ProductCommonFacade {
    /// # Errors
    ///
    /// - [`FacadeError::NotFound`] for an unknown product or category.
    /// - [`FacadeError::OperationNotAllowed`] when the product is already in
    ///   the category.
    /// - [`FacadeError::Service`] when storage fails.
    pub async fn add_product_to_category(
        &self,
        store: &MerchantStore,
        category_id: i64,
        product_id: i64,
        language: &Language,
    ) -> FacadeResult<ReadableProduct> {
        let mut product = self.load_in_store(product_id, store).await?;
        if product.has_category(category_id) {
            return Err(FacadeError::OperationNotAllowed(format!(
                "product [{product_id}] already attached to category [{category_id}]"
            )));
        }

        let category = self
            .repository
            .find_category(store.id, category_id)
            .await
            .map_err(FacadeError::storage("Cannot load category"))?
            .ok_or_else(|| {
                tracing::warn!(category_id, store = %store.code, "category not found");
                FacadeError::NotFound(format!("category [{category_id}]"))
            })?;
        product.categories.push(category);

        let readable = self
            .persist_and_project(&product, store, language, "Cannot add product to category")
            .await?;
        tracing::info!(product_id, category_id, "product added to category");
        Ok(readable)
    }

    /// Detaching a category the product is not in leaves it unchanged.
    ///
    /// # Errors
    ///
    /// [`FacadeError::NotFound`] for an unknown product,
    /// [`FacadeError::Service`] when storage fails.
    pub async fn remove_product_from_category(
        &self,
        store: &MerchantStore,
        category_id: i64,
        product_id: i64,
        language: &Language,
    ) -> FacadeResult<ReadableProduct> {
        let mut product = self.load_in_store(product_id, store).await?;
        if !product.remove_category(category_id) {
            tracing::debug!(product_id, category_id, "product not in category");
            return self.project(&product, store, language);
        }

        let readable = self
            .persist_and_project(
                &product,
                store,
                language,
                "Cannot remove product from category",
            )
            .await?;
        tracing::info!(product_id, category_id, "product removed from category");
        Ok(readable)
    }
}
