use rust_decimal::Decimal;
use shopcat_core::dates::parse_date;
use shopcat_core::{
    Language, LightPersistableProduct, MerchantStore, Product, ProductAvailability,
    ProductPriceEntity, ReadableProduct,
};

use crate::error::{FacadeError, FacadeResult};
use crate::facade::ProductCommonFacade;

impl ProductCommonFacade {
    /// Sets the default price of every availability, variant-bound ones
    /// included, with an optional discount window.
    ///
    /// # Errors
    ///
    /// - [`FacadeError::NotFound`] when the product is missing or belongs to
    ///   another store.
    /// - [`FacadeError::Validation`] for a malformed discount date.
    /// - [`FacadeError::Service`] when storage fails.
    pub async fn update_product_price(
        &self,
        store: &MerchantStore,
        product_id: i64,
        price: &ProductPriceEntity,
        language: &Language,
    ) -> FacadeResult<ReadableProduct> {
        let start = discount_date("discountStartDate", price.discount_start_date.as_deref())?;
        let end = discount_date("discountEndDate", price.discount_end_date.as_deref())?;

        let mut product = self.load_in_store(product_id, store).await?;
        for availability in every_availability(&mut product) {
            let target = availability.default_price_or_insert();
            target.amount = price.price;
            if price.discounted {
                target.special_amount = price.discounted_price;
                target.special_start = start;
                target.special_end = end;
            } else {
                target.special_amount = None;
                target.special_start = None;
                target.special_end = None;
            }
        }

        let readable = self
            .persist_and_project(&product, store, language, "Cannot update product price")
            .await?;
        tracing::info!(
            product_id,
            price = %price.price,
            discounted = price.discounted,
            "product price updated"
        );
        Ok(readable)
    }

    /// # Errors
    ///
    /// As [`ProductCommonFacade::update_product_price`], minus date
    /// validation.
    pub async fn update_product_quantity(
        &self,
        store: &MerchantStore,
        product_id: i64,
        quantity: i32,
        language: &Language,
    ) -> FacadeResult<ReadableProduct> {
        let mut product = self.load_in_store(product_id, store).await?;
        for availability in every_availability(&mut product) {
            availability.quantity = Some(quantity);
        }

        let readable = self
            .persist_and_project(&product, store, language, "Cannot update product quantity")
            .await?;
        tracing::info!(product_id, quantity, "product quantity updated");
        Ok(readable)
    }

    /// Light update of availability, stock and (optionally) price.
    ///
    /// # Errors
    ///
    /// - [`FacadeError::NotFound`] when the product is missing or belongs to
    ///   another store.
    /// - [`FacadeError::Service`] with context `"Invalid product price
    ///   format"` for an unparsable price, or when storage fails.
    pub async fn update(
        &self,
        product_id: i64,
        light: &LightPersistableProduct,
        store: &MerchantStore,
        language: &Language,
    ) -> FacadeResult<()> {
        let amount = self.light_amount(light)?;
        let mut product = self.load_in_store(product_id, store).await?;
        product.available = light.available;
        apply_light(every_availability(&mut product), light.quantity, amount);

        self.persist(&product, &format!("Cannot update product {product_id}"))
            .await?;
        tracing::info!(
            product_id,
            language = %language.code,
            available = light.available,
            quantity = light.quantity,
            "product updated"
        );
        Ok(())
    }

    /// Like [`ProductCommonFacade::update`], addressed by sku. When a variant
    /// carries the sku only that variant changes.
    ///
    /// # Errors
    ///
    /// [`FacadeError::NotFound`] when no product or variant of `store` has
    /// the sku; otherwise as [`ProductCommonFacade::update`].
    pub async fn update_by_sku(
        &self,
        sku: &str,
        light: &LightPersistableProduct,
        store: &MerchantStore,
        language: &Language,
    ) -> FacadeResult<()> {
        let amount = self.light_amount(light)?;
        let mut product = self.find_by_sku(store, sku).await?;

        let variant_id = match product.variant_by_sku_mut(sku) {
            Some(variant) => {
                variant.available = light.available;
                let variant_id = variant.id;
                if variant.availabilities.is_empty() {
                    variant.availabilities.push(ProductAvailability {
                        variant_id: Some(variant_id),
                        ..ProductAvailability::default()
                    });
                }
                apply_light(variant.availabilities.iter_mut(), light.quantity, amount);
                Some(variant_id)
            }
            None => {
                product.available = light.available;
                apply_light(every_availability(&mut product), light.quantity, amount);
                None
            }
        };

        self.persist(&product, &format!("Cannot update product {}", product.id))
            .await?;
        tracing::info!(
            product_id = product.id,
            sku,
            variant_id,
            language = %language.code,
            "product updated by sku"
        );
        Ok(())
    }

    fn light_amount(&self, light: &LightPersistableProduct) -> FacadeResult<Option<Decimal>> {
        match light.price.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => self
                .pricing
                .parse_amount(raw)
                .map(Some)
                .map_err(FacadeError::pricing("Invalid product price format")),
            _ => Ok(None),
        }
    }
}

/// Every availability of the product and its variants, creating a
/// product-wide one when there is none at all.
fn every_availability(product: &mut Product) -> impl Iterator<Item = &mut ProductAvailability> {
    let none = product.availabilities.is_empty()
        && product.variants.iter().all(|v| v.availabilities.is_empty());
    if none {
        product.product_wide_availability_mut();
    }
    product.all_availabilities_mut()
}

fn apply_light<'a>(
    availabilities: impl Iterator<Item = &'a mut ProductAvailability>,
    quantity: i32,
    amount: Option<Decimal>,
) {
    for availability in availabilities {
        availability.quantity = Some(quantity);
        if let Some(amount) = amount {
            availability.default_price_or_insert().amount = amount;
        }
    }
}

fn discount_date(
    field: &str,
    raw: Option<&str>,
) -> FacadeResult<Option<chrono::NaiveDate>> {
    match raw.map(str::trim) {
        Some(value) if !value.is_empty() => parse_date(value).map(Some).map_err(|_| {
            FacadeError::Validation(format!("invalid date for {field}: \"{value}\""))
        }),
        _ => Ok(None),
    }
}
