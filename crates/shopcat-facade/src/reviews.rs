use chrono::Utc;
use rust_decimal::Decimal;
use shopcat_core::{
    rating_summary, Language, MerchantStore, PersistableProductReview, ReadableProductReview,
};
use shopcat_mapper::{to_readable_review, to_review};

use crate::error::{FacadeError, FacadeResult};
use crate::facade::ProductCommonFacade;

impl ProductCommonFacade {
    /// Creates the review when it has no id, otherwise updates it. The
    /// assigned id is written back into `review`, and the product's rating
    /// is recomputed.
    ///
    /// # Errors
    ///
    /// - [`FacadeError::NotFound`] for an unknown product or review.
    /// - [`FacadeError::Validation`] for a bad rating, date, text or language.
    /// - [`FacadeError::Service`] when storage fails.
    pub async fn save_or_update_review(
        &self,
        review: &mut PersistableProductReview,
        store: &MerchantStore,
        language: &Language,
    ) -> FacadeResult<i64> {
        self.load_in_store(review.product_id, store).await?;

        let written_in = match review.language.as_deref() {
            Some(code) if !code.trim().is_empty() => {
                self.resolve_language(Some(code), store).await?
            }
            _ => language.clone(),
        };

        if let Some(id) = review.id.filter(|id| *id > 0) {
            let existing = self
                .repository
                .find_review(id)
                .await
                .map_err(FacadeError::storage("Cannot load review"))?;
            if existing.is_none_or(|r| r.product_id != review.product_id) {
                tracing::warn!(review_id = id, product_id = review.product_id, "review not found");
                return Err(FacadeError::NotFound(format!("review [{id}]")));
            }
        }

        let entity = to_review(review, &written_in, Utc::now().date_naive())
            .map_err(FacadeError::conversion("Cannot convert review"))?;
        let created = entity.id == 0;
        let id = self
            .repository
            .save_review(&entity)
            .await
            .map_err(FacadeError::storage("Cannot save review"))?;
        review.id = Some(id);
        tracing::info!(review_id = id, product_id = review.product_id, created, "review saved");

        self.refresh_rating(review.product_id, store).await?;
        Ok(id)
    }

    /// # Errors
    ///
    /// [`FacadeError::NotFound`] when the review is missing or reviews a
    /// product of another store, [`FacadeError::Service`] when storage fails.
    pub async fn delete_review(&self, store: &MerchantStore, review_id: i64) -> FacadeResult<()> {
        let review = self
            .repository
            .find_review(review_id)
            .await
            .map_err(FacadeError::storage("Cannot load review"))?
            .ok_or_else(|| {
                tracing::warn!(review_id, "review not found");
                FacadeError::NotFound(format!("review [{review_id}]"))
            })?;
        self.load_in_store(review.product_id, store).await?;

        self.repository
            .delete_review(review_id)
            .await
            .map_err(FacadeError::storage("Cannot delete review"))?;
        tracing::info!(review_id, product_id = review.product_id, "review deleted");

        self.refresh_rating(review.product_id, store).await
    }

    /// # Errors
    ///
    /// [`FacadeError::NotFound`] for an unknown product,
    /// [`FacadeError::Service`] when storage fails.
    pub async fn get_product_reviews(
        &self,
        store: &MerchantStore,
        product_id: i64,
        language: &Language,
    ) -> FacadeResult<Vec<ReadableProductReview>> {
        self.load_in_store(product_id, store).await?;
        let reviews = self
            .repository
            .list_reviews(product_id)
            .await
            .map_err(FacadeError::storage("Cannot load reviews"))?;
        Ok(reviews
            .iter()
            .map(|r| to_readable_review(r, language))
            .collect())
    }

    async fn refresh_rating(&self, product_id: i64, store: &MerchantStore) -> FacadeResult<()> {
        let reviews = self
            .repository
            .list_reviews(product_id)
            .await
            .map_err(FacadeError::storage("Cannot load reviews"))?;
        let mut product = self.load_in_store(product_id, store).await?;

        match rating_summary(&reviews) {
            Some((average, count)) => {
                let average = Decimal::try_from(average)
                    .map_err(|e| FacadeError::service("Cannot compute rating", e))?;
                product.review_average = Some(average.round_dp(2));
                product.review_count = Some(count);
            }
            None => {
                product.review_average = None;
                product.review_count = Some(0);
            }
        }

        self.persist(&product, "Cannot update product rating").await?;
        tracing::debug!(
            product_id,
            average = ?product.review_average,
            count = ?product.review_count,
            "product rating refreshed"
        );
        Ok(())
    }
}
