use shopcat_core::{
    Language, MerchantStore, PersistableProduct, Product, ReadableProduct, DEFAULT_MANUFACTURER,
};
use shopcat_mapper::{merge_persistable, ResolvedReferences};

use crate::error::{FacadeError, FacadeResult};
use crate::facade::ProductCommonFacade;

impl ProductCommonFacade {
    /// Creates a product, or updates it when the payload carries an existing
    /// id. Returns the product id.
    ///
    /// # Errors
    ///
    /// - [`FacadeError::NotFound`] when the payload id names no product of
    ///   this store.
    /// - [`FacadeError::Validation`] for an unusable payload or unknown
    ///   manufacturer, product type or category.
    /// - [`FacadeError::OperationNotAllowed`] when the sku is already taken.
    /// - [`FacadeError::Service`] when storage fails.
    pub async fn save_product(
        &self,
        store: &MerchantStore,
        product: &PersistableProduct,
        language: &Language,
    ) -> FacadeResult<i64> {
        let target = match product.existing_id() {
            Some(id) => self.load_in_store(id, store).await?,
            None => Product::new(product.sku.trim(), store.id),
        };
        self.apply_and_save(store, product, target, language).await
    }

    /// Updates an existing product from the payload.
    ///
    /// # Errors
    ///
    /// [`FacadeError::Validation`] when the payload has no id; otherwise as
    /// [`ProductCommonFacade::save_product`].
    pub async fn update_product(
        &self,
        store: &MerchantStore,
        product: &PersistableProduct,
        language: &Language,
    ) -> FacadeResult<()> {
        let id = product
            .existing_id()
            .ok_or_else(|| FacadeError::Validation("product id must not be null".into()))?;
        let target = self.load_in_store(id, store).await?;
        self.apply_and_save(store, product, target, language).await?;
        Ok(())
    }

    async fn apply_and_save(
        &self,
        store: &MerchantStore,
        source: &PersistableProduct,
        mut target: Product,
        language: &Language,
    ) -> FacadeResult<i64> {
        let refs = self.resolve_references(store, source).await?;
        merge_persistable(source, &mut target, &refs, store)
            .map_err(FacadeError::conversion("Cannot merge product"))?;

        let created = target.is_new();
        let id = self.persist(&target, "Cannot save product").await?;
        tracing::info!(
            product_id = id,
            sku = %target.sku,
            store = %store.code,
            language = %language.code,
            created,
            "product saved"
        );
        Ok(id)
    }

    async fn resolve_references(
        &self,
        store: &MerchantStore,
        source: &PersistableProduct,
    ) -> FacadeResult<ResolvedReferences> {
        let languages = self
            .repository
            .list_languages()
            .await
            .map_err(FacadeError::storage("Cannot load languages"))?;

        let requested = source
            .manufacturer
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());
        let manufacturer_code = requested.unwrap_or(DEFAULT_MANUFACTURER);
        let manufacturer = self
            .repository
            .find_manufacturer(manufacturer_code)
            .await
            .map_err(FacadeError::storage("Cannot load manufacturer"))?;
        if manufacturer.is_none() && requested.is_some() {
            return Err(FacadeError::Validation(format!(
                "unknown manufacturer \"{manufacturer_code}\""
            )));
        }

        let product_type = match source.product_type.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => Some(
                self.repository
                    .find_product_type(code)
                    .await
                    .map_err(FacadeError::storage("Cannot load product type"))?
                    .ok_or_else(|| {
                        FacadeError::Validation(format!("unknown product type \"{code}\""))
                    })?,
            ),
            _ => None,
        };

        let mut categories = Vec::with_capacity(source.categories.len());
        for &category_id in &source.categories {
            let category = self
                .repository
                .find_category(store.id, category_id)
                .await
                .map_err(FacadeError::storage("Cannot load category"))?
                .ok_or_else(|| {
                    FacadeError::Validation(format!("unknown category [{category_id}]"))
                })?;
            categories.push(category);
        }

        Ok(ResolvedReferences {
            languages,
            manufacturer,
            product_type,
            categories,
        })
    }

    /// # Errors
    ///
    /// - [`FacadeError::NotFound`] when the product is missing or belongs to
    ///   another store.
    /// - [`FacadeError::Conversion`] when projection fails.
    pub async fn get_product(
        &self,
        store: &MerchantStore,
        id: i64,
        language: &Language,
    ) -> FacadeResult<ReadableProduct> {
        let product = self.load_in_store(id, store).await?;
        self.project(&product, store, language)
    }

    /// The raw entity, when it exists in `store`.
    ///
    /// # Errors
    ///
    /// [`FacadeError::Service`] when storage fails.
    pub async fn get_product_entity(
        &self,
        id: i64,
        store: &MerchantStore,
    ) -> FacadeResult<Option<Product>> {
        let product = self
            .repository
            .find_by_id(id)
            .await
            .map_err(FacadeError::storage(format!("Cannot load product [{id}]")))?;
        Ok(product.filter(|p| p.merchant_store_id == store.id))
    }

    /// Projects the product whose sku, or one of whose variants' sku, is
    /// `sku`.
    ///
    /// # Errors
    ///
    /// As [`ProductCommonFacade::get_product`].
    pub async fn get_product_by_code(
        &self,
        store: &MerchantStore,
        sku: &str,
        language: &Language,
    ) -> FacadeResult<ReadableProduct> {
        let product = self.find_by_sku(store, sku).await?;
        self.project(&product, store, language)
    }

    pub(crate) async fn find_by_sku(
        &self,
        store: &MerchantStore,
        sku: &str,
    ) -> FacadeResult<Product> {
        self.repository
            .find_by_sku(store.id, sku)
            .await
            .map_err(FacadeError::storage(format!("Cannot load product [{sku}]")))?
            .ok_or_else(|| {
                tracing::warn!(sku, store = %store.code, "product not found by sku");
                FacadeError::NotFound(format!("product with sku [{sku}]"))
            })
    }

    /// # Errors
    ///
    /// [`FacadeError::NotFound`] when the product no longer exists,
    /// [`FacadeError::Service`] when storage fails.
    pub async fn delete_product(&self, product: &Product) -> FacadeResult<()> {
        self.repository
            .delete(product.id)
            .await
            .map_err(FacadeError::storage(format!(
                "Error while deleting product with id [{}]",
                product.id
            )))?;
        tracing::info!(product_id = product.id, sku = %product.sku, "product deleted");
        Ok(())
    }

    /// # Errors
    ///
    /// [`FacadeError::NotFound`] when the product is missing or belongs to
    /// another store, [`FacadeError::Service`] when the delete fails.
    pub async fn delete_product_by_id(&self, id: i64, store: &MerchantStore) -> FacadeResult<()> {
        let product = self.load_in_store(id, store).await?;
        self.delete_product(&product).await
    }

    /// Whether a product or variant of `store` uses `sku`.
    ///
    /// # Errors
    ///
    /// [`FacadeError::Service`] when storage fails.
    pub async fn exists(&self, sku: &str, store: &MerchantStore) -> FacadeResult<bool> {
        self.repository
            .exists_by_sku(store.id, sku)
            .await
            .map_err(FacadeError::storage("Cannot check sku"))
    }
}
