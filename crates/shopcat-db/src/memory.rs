//! In-memory catalog backend, used when `SHOPCAT_STORAGE=memory` and by
//! tests that should not need a database.
//!
//! Mirrors the Postgres backend: ids are assigned on save, skus are unique
//! per store, and deleting a product drops its reviews.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use shopcat_core::{
    Category, Language, Manufacturer, MerchantStore, NamedDescription, Product,
    ProductRepository, ProductReview, ProductType, ReferenceRepository, RepositoryError,
    RepositoryResult, ReviewRepository, DEFAULT_MANUFACTURER,
};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct CatalogState {
    last_id: i64,
    languages: Vec<Language>,
    stores: Vec<MerchantStore>,
    categories: Vec<Category>,
    manufacturers: Vec<Manufacturer>,
    product_types: Vec<ProductType>,
    products: BTreeMap<i64, Product>,
    reviews: BTreeMap<i64, ProductReview>,
}

impl CatalogState {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    /// Replaces every `0` id in the aggregate with a fresh one.
    fn assign_ids(&mut self, product: &mut Product) {
        for d in &mut product.descriptions {
            if d.id == 0 {
                d.id = self.next_id();
            }
        }
        for a in &mut product.attributes {
            if a.id == 0 {
                a.id = self.next_id();
            }
        }
        for v in &mut product.variants {
            if v.id == 0 {
                v.id = self.next_id();
            }
            for a in &mut v.availabilities {
                a.variant_id = Some(v.id);
            }
        }
        for a in &mut product.availabilities {
            a.variant_id = None;
        }

        let mut availabilities: Vec<_> = product.availabilities.iter_mut().collect();
        availabilities.extend(
            product
                .variants
                .iter_mut()
                .flat_map(|v| v.availabilities.iter_mut()),
        );
        for a in availabilities {
            if a.id == 0 {
                a.id = self.next_id();
            }
            for p in &mut a.prices {
                if p.id == 0 {
                    p.id = self.next_id();
                }
                for d in &mut p.descriptions {
                    if d.id == 0 {
                        d.id = self.next_id();
                    }
                }
            }
        }

        let mut images: Vec<_> = product.images.iter_mut().collect();
        images.extend(product.variants.iter_mut().flat_map(|v| v.images.iter_mut()));
        for i in images {
            if i.id == 0 {
                i.id = self.next_id();
            }
        }
    }

    fn sku_taken(&self, store_id: i32, sku: &str, except: i64) -> bool {
        self.products
            .values()
            .any(|p| p.id != except && p.merchant_store_id == store_id && p.sku == sku)
    }
}

/// Catalog kept behind a single async lock.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    state: RwLock<CatalogState>,
}

impl InMemoryCatalog {
    /// An empty catalog with no reference data.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog holding the same baseline reference data the migrations
    /// seed: languages `en` and `fr`, the `DEFAULT` store (USD, CM, KG), the
    /// `DEFAULT` manufacturer and the `GENERAL` product type.
    #[must_use]
    pub fn seeded() -> Self {
        let en = Language::new(1, "en");
        let fr = Language::new(2, "fr");
        Self::new()
            .with_language(en.clone())
            .with_language(fr)
            .with_store(MerchantStore {
                id: 1,
                code: "DEFAULT".to_string(),
                currency_code: "USD".to_string(),
                default_language: "en".to_string(),
                dimension_unit_code: Some("CM".to_string()),
                weight_unit_code: Some("KG".to_string()),
            })
            .with_manufacturer(Manufacturer {
                id: 1,
                code: DEFAULT_MANUFACTURER.to_string(),
                descriptions: vec![NamedDescription {
                    id: 1,
                    language: en.clone(),
                    name: "Default".to_string(),
                    description: None,
                }],
            })
            .with_product_type(ProductType {
                id: 1,
                code: "GENERAL".to_string(),
                descriptions: vec![NamedDescription {
                    id: 2,
                    language: en,
                    name: "General".to_string(),
                    description: None,
                }],
            })
    }

    #[must_use]
    pub fn with_language(mut self, language: Language) -> Self {
        let state = self.state.get_mut();
        state.last_id = state.last_id.max(i64::from(language.id));
        state.languages.push(language);
        self
    }

    #[must_use]
    pub fn with_store(mut self, store: MerchantStore) -> Self {
        let state = self.state.get_mut();
        state.last_id = state.last_id.max(i64::from(store.id));
        state.stores.push(store);
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        let state = self.state.get_mut();
        state.last_id = state.last_id.max(category.id);
        state.categories.push(category);
        self
    }

    #[must_use]
    pub fn with_manufacturer(mut self, manufacturer: Manufacturer) -> Self {
        let state = self.state.get_mut();
        state.last_id = state.last_id.max(manufacturer.id);
        state.manufacturers.push(manufacturer);
        self
    }

    #[must_use]
    pub fn with_product_type(mut self, product_type: ProductType) -> Self {
        let state = self.state.get_mut();
        state.last_id = state.last_id.max(product_type.id);
        state.product_types.push(product_type);
        self
    }
}

#[async_trait]
impl ProductRepository for InMemoryCatalog {
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Product>> {
        Ok(self.state.read().await.products.get(&id).cloned())
    }

    async fn find_by_sku(&self, store_id: i32, sku: &str) -> RepositoryResult<Option<Product>> {
        let state = self.state.read().await;
        let in_store: Vec<&Product> = state
            .products
            .values()
            .filter(|p| p.merchant_store_id == store_id)
            .collect();
        let found = in_store
            .iter()
            .find(|p| p.sku == sku)
            .or_else(|| in_store.iter().find(|p| p.variant_by_sku(sku).is_some()));
        Ok(found.map(|p| (*p).clone()))
    }

    async fn exists_by_sku(&self, store_id: i32, sku: &str) -> RepositoryResult<bool> {
        let state = self.state.read().await;
        Ok(state
            .products
            .values()
            .any(|p| p.merchant_store_id == store_id && p.matches_sku(sku)))
    }

    async fn save(&self, product: &Product) -> RepositoryResult<i64> {
        let mut state = self.state.write().await;

        if state.sku_taken(product.merchant_store_id, &product.sku, product.id) {
            return Err(RepositoryError::Conflict(format!(
                "sku '{}' already exists in store {}",
                product.sku, product.merchant_store_id
            )));
        }

        let mut stored = product.clone();
        if stored.is_new() {
            stored.id = state.next_id();
            stored.created_at = Some(Utc::now());
        } else {
            let Some(existing) = state.products.get(&stored.id) else {
                return Err(RepositoryError::Missing {
                    entity: "product",
                    id: stored.id,
                });
            };
            stored.created_at = existing.created_at;
        }
        state.assign_ids(&mut stored);

        let id = stored.id;
        tracing::debug!(product_id = id, sku = %stored.sku, "product saved in memory");
        state.products.insert(id, stored);
        Ok(id)
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        let mut state = self.state.write().await;
        if state.products.remove(&id).is_none() {
            return Err(RepositoryError::Missing {
                entity: "product",
                id,
            });
        }
        state.reviews.retain(|_, r| r.product_id != id);
        Ok(())
    }
}

#[async_trait]
impl ReviewRepository for InMemoryCatalog {
    async fn list_reviews(&self, product_id: i64) -> RepositoryResult<Vec<ProductReview>> {
        let state = self.state.read().await;
        let mut reviews: Vec<ProductReview> = state
            .reviews
            .values()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect();
        reviews.sort_by_key(|r| (r.review_date, r.id));
        Ok(reviews)
    }

    async fn find_review(&self, id: i64) -> RepositoryResult<Option<ProductReview>> {
        Ok(self.state.read().await.reviews.get(&id).cloned())
    }

    async fn save_review(&self, review: &ProductReview) -> RepositoryResult<i64> {
        let mut state = self.state.write().await;
        if !state.products.contains_key(&review.product_id) {
            return Err(RepositoryError::Missing {
                entity: "product",
                id: review.product_id,
            });
        }

        let mut stored = review.clone();
        if stored.id == 0 {
            stored.id = state.next_id();
        } else if !state.reviews.contains_key(&stored.id) {
            return Err(RepositoryError::Missing {
                entity: "review",
                id: stored.id,
            });
        }
        for d in &mut stored.descriptions {
            if d.id == 0 {
                d.id = state.next_id();
            }
        }

        let id = stored.id;
        state.reviews.insert(id, stored);
        Ok(id)
    }

    async fn delete_review(&self, id: i64) -> RepositoryResult<()> {
        match self.state.write().await.reviews.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepositoryError::Missing {
                entity: "review",
                id,
            }),
        }
    }
}

#[async_trait]
impl ReferenceRepository for InMemoryCatalog {
    async fn find_store(&self, code: &str) -> RepositoryResult<Option<MerchantStore>> {
        let state = self.state.read().await;
        Ok(state.stores.iter().find(|s| s.code == code).cloned())
    }

    async fn find_language(&self, code: &str) -> RepositoryResult<Option<Language>> {
        let state = self.state.read().await;
        Ok(state.languages.iter().find(|l| l.code == code).cloned())
    }

    async fn list_languages(&self) -> RepositoryResult<Vec<Language>> {
        Ok(self.state.read().await.languages.clone())
    }

    async fn find_category(&self, store_id: i32, id: i64) -> RepositoryResult<Option<Category>> {
        let state = self.state.read().await;
        Ok(state
            .categories
            .iter()
            .find(|c| c.id == id && c.merchant_store_id == store_id)
            .cloned())
    }

    async fn find_manufacturer(&self, code: &str) -> RepositoryResult<Option<Manufacturer>> {
        let state = self.state.read().await;
        Ok(state.manufacturers.iter().find(|m| m.code == code).cloned())
    }

    async fn find_product_type(&self, code: &str) -> RepositoryResult<Option<ProductType>> {
        let state = self.state.read().await;
        Ok(state.product_types.iter().find(|t| t.code == code).cloned())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use shopcat_core::{ProductAvailability, ProductPrice, ProductVariant, ReviewDescription};

    use super::*;

    fn product(sku: &str) -> Product {
        let mut p = Product::new(sku, 1);
        p.availabilities.push(ProductAvailability {
            quantity: Some(3),
            prices: vec![ProductPrice::base(rust_decimal::Decimal::new(1000, 2))],
            ..ProductAvailability::default()
        });
        p
    }

    fn review(product_id: i64, rating: f64) -> ProductReview {
        ProductReview {
            id: 0,
            product_id,
            customer_id: 9,
            rating,
            review_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            descriptions: vec![ReviewDescription {
                id: 0,
                language: Language::new(1, "en"),
                name: None,
                description: "ok".to_string(),
            }],
        }
    }

    #[tokio::test]
    async fn save_assigns_ids_to_the_whole_aggregate() {
        let catalog = InMemoryCatalog::seeded();
        let id = catalog.save(&product("MUG")).await.unwrap();
        let stored = catalog.find_by_id(id).await.unwrap().unwrap();

        assert!(id > 0);
        assert!(stored.created_at.is_some());
        let availability = &stored.availabilities[0];
        assert!(availability.id > 0);
        assert!(availability.prices[0].id > 0);
    }

    #[tokio::test]
    async fn save_preserves_existing_ids_on_update() {
        let catalog = InMemoryCatalog::seeded();
        let id = catalog.save(&product("MUG")).await.unwrap();
        let mut stored = catalog.find_by_id(id).await.unwrap().unwrap();
        let price_id = stored.availabilities[0].prices[0].id;

        stored.available = false;
        assert_eq!(catalog.save(&stored).await.unwrap(), id);
        let reloaded = catalog.find_by_id(id).await.unwrap().unwrap();
        assert!(!reloaded.available);
        assert_eq!(reloaded.availabilities[0].prices[0].id, price_id);
    }

    #[tokio::test]
    async fn duplicate_sku_in_store_conflicts() {
        let catalog = InMemoryCatalog::seeded();
        catalog.save(&product("MUG")).await.unwrap();
        let err = catalog.save(&product("MUG")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn updating_unknown_product_is_missing() {
        let catalog = InMemoryCatalog::seeded();
        let mut p = product("MUG");
        p.id = 77;
        assert!(matches!(
            catalog.save(&p).await,
            Err(RepositoryError::Missing { id: 77, .. })
        ));
    }

    #[tokio::test]
    async fn find_by_sku_prefers_product_sku_then_variant_sku() {
        let catalog = InMemoryCatalog::seeded();
        let mut shirt = product("SHIRT");
        shirt.variants.push(ProductVariant {
            sku: "SHIRT-RED".to_string(),
            ..ProductVariant::default()
        });
        let shirt_id = catalog.save(&shirt).await.unwrap();

        let by_variant = catalog.find_by_sku(1, "SHIRT-RED").await.unwrap().unwrap();
        assert_eq!(by_variant.id, shirt_id);
        assert!(catalog.exists_by_sku(1, "SHIRT-RED").await.unwrap());
        assert!(!catalog.exists_by_sku(2, "SHIRT").await.unwrap());
        assert!(catalog.find_by_sku(1, "NOPE").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deleting_product_drops_its_reviews() {
        let catalog = InMemoryCatalog::seeded();
        let id = catalog.save(&product("MUG")).await.unwrap();
        let review_id = catalog.save_review(&review(id, 4.0)).await.unwrap();

        catalog.delete(id).await.unwrap();
        assert!(catalog.find_review(review_id).await.unwrap().is_none());
        assert!(matches!(
            catalog.delete(id).await,
            Err(RepositoryError::Missing { entity: "product", .. })
        ));
    }

    #[tokio::test]
    async fn review_for_unknown_product_is_rejected() {
        let catalog = InMemoryCatalog::seeded();
        assert!(matches!(
            catalog.save_review(&review(404, 3.0)).await,
            Err(RepositoryError::Missing { entity: "product", id: 404 })
        ));
    }

    #[tokio::test]
    async fn seeded_reference_data() {
        let catalog = InMemoryCatalog::seeded();
        let store = catalog.find_store("DEFAULT").await.unwrap().unwrap();
        assert_eq!(store.currency_code, "USD");
        assert_eq!(catalog.list_languages().await.unwrap().len(), 2);
        assert!(catalog
            .find_manufacturer(DEFAULT_MANUFACTURER)
            .await
            .unwrap()
            .is_some());
        assert!(catalog.find_category(1, 5).await.unwrap().is_none());
    }
}
