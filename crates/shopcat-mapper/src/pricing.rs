//! Final-price calculation and currency display.

use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use shopcat_core::{select_availability, MerchantStore, Product, ProductPrice, ProductVariant};

use crate::error::PricingError;

/// Outcome of pricing one default price on a given day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalPrice {
    /// Id of the price record the amounts come from.
    pub price_id: i64,
    pub final_price: Decimal,
    pub original_price: Decimal,
    pub discounted: bool,
}

pub trait PricingService: Send + Sync {
    /// Prices the product's authoritative availability. `None` when the
    /// product carries no default price.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Core`] when the availability has several
    /// default prices.
    fn calculate_product_price(&self, product: &Product) -> Result<Option<FinalPrice>, PricingError>;

    /// Prices a variant from its own availabilities, falling back to the
    /// parent product when it has none.
    ///
    /// # Errors
    ///
    /// Same as [`PricingService::calculate_product_price`].
    fn calculate_variant_price(
        &self,
        variant: &ProductVariant,
        product: &Product,
    ) -> Result<Option<FinalPrice>, PricingError>;

    fn display_amount(&self, amount: Decimal, store: &MerchantStore) -> String;

    /// Parses a user-supplied amount.
    ///
    /// # Errors
    ///
    /// Rejects blank, non-numeric and negative input.
    fn parse_amount(&self, raw: &str) -> Result<Decimal, PricingError>;
}

/// Special amounts apply when lower than the amount and inside their
/// (optionally open-ended) date window.
#[derive(Debug, Clone, Default)]
pub struct DefaultPricingService {
    pricing_date: Option<NaiveDate>,
}

impl DefaultPricingService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluates special-price windows against `date` instead of today.
    #[must_use]
    pub fn with_pricing_date(date: NaiveDate) -> Self {
        Self {
            pricing_date: Some(date),
        }
    }

    fn today(&self) -> NaiveDate {
        self.pricing_date.unwrap_or_else(|| Utc::now().date_naive())
    }

    fn price(&self, price: &ProductPrice) -> FinalPrice {
        let today = self.today();
        let special = price.special_amount.filter(|special| {
            *special < price.amount
                && price.special_start.is_none_or(|start| start <= today)
                && price.special_end.is_none_or(|end| end >= today)
        });

        match special {
            Some(special) => FinalPrice {
                price_id: price.id,
                final_price: special,
                original_price: price.amount,
                discounted: true,
            },
            None => FinalPrice {
                price_id: price.id,
                final_price: price.amount,
                original_price: price.amount,
                discounted: false,
            },
        }
    }
}

impl PricingService for DefaultPricingService {
    fn calculate_product_price(&self, product: &Product) -> Result<Option<FinalPrice>, PricingError> {
        let Some(availability) = product.authoritative_availability() else {
            return Ok(None);
        };
        Ok(availability.default_price()?.map(|p| self.price(p)))
    }

    fn calculate_variant_price(
        &self,
        variant: &ProductVariant,
        product: &Product,
    ) -> Result<Option<FinalPrice>, PricingError> {
        if let Some(availability) = select_availability(&variant.availabilities) {
            if let Some(price) = availability.default_price()? {
                return Ok(Some(self.price(price)));
            }
        }
        self.calculate_product_price(product)
    }

    fn display_amount(&self, amount: Decimal, store: &MerchantStore) -> String {
        let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(2);
        format!("{}{rounded}", currency_symbol(&store.currency_code))
    }

    fn parse_amount(&self, raw: &str) -> Result<Decimal, PricingError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PricingError::InvalidAmount(raw.to_string()));
        }
        let amount = Decimal::from_str(trimmed)
            .map_err(|_| PricingError::InvalidAmount(raw.to_string()))?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PricingError::NegativeAmount(raw.to_string()));
        }
        Ok(amount)
    }
}

/// Display prefix for an ISO 4217 code; unknown codes print as `"XYZ "`.
fn currency_symbol(code: &str) -> String {
    match code.to_ascii_uppercase().as_str() {
        "USD" => "$".to_string(),
        "EUR" => "€".to_string(),
        "GBP" => "£".to_string(),
        "CAD" => "CA$".to_string(),
        "JPY" => "¥".to_string(),
        other => format!("{other} "),
    }
}

#[cfg(test)]
#[path = "pricing_test.rs"]
mod tests;
