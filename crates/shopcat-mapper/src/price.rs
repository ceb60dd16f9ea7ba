//! Builds the displayed price section of a product or variant.

use shopcat_core::{ProductAvailability, ReadablePriceDescription, ReadableProductPrice};

use crate::context::MappingContext;
use crate::error::ConversionError;
use crate::locale::resolve_exact;
use crate::pricing::FinalPrice;

/// Formats `price` for display and attaches the default price's id and
/// localized appender from `availability`.
///
/// # Errors
///
/// Returns [`ConversionError::Core`] when `availability` has several
/// default prices.
pub fn price_section(
    price: &FinalPrice,
    availability: Option<&ProductAvailability>,
    ctx: &MappingContext<'_>,
) -> Result<ReadableProductPrice, ConversionError> {
    let mut section = ReadableProductPrice {
        id: None,
        price: price.final_price,
        final_price: ctx.pricing.display_amount(price.final_price, ctx.store),
        original_price: ctx.pricing.display_amount(price.original_price, ctx.store),
        discounted: price.discounted,
        description: None,
    };

    let default_price = match availability {
        Some(a) => a.default_price()?,
        None => None,
    };

    if let Some(default_price) = default_price {
        section.id = Some(default_price.id);
        section.description =
            resolve_exact(&default_price.descriptions, ctx.language).map(|d| ReadablePriceDescription {
                id: d.id,
                language: ctx.language.code.clone(),
                price_appender: d.price_appender.clone(),
            });
    }

    Ok(section)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{base_price, dec, fr, tshirt, TestEnv};

    fn final_price(final_cents: i64, original_cents: i64) -> FinalPrice {
        FinalPrice {
            price_id: 300,
            final_price: dec(final_cents),
            original_price: dec(original_cents),
            discounted: final_cents < original_cents,
        }
    }

    #[test]
    fn section_carries_display_amounts_and_appender() {
        let env = TestEnv::new();
        let product = tshirt();
        let section =
            price_section(&final_price(1499, 1999), product.availabilities.first(), &env.ctx())
                .unwrap();

        assert_eq!(section.final_price, "$14.99");
        assert_eq!(section.original_price, "$19.99");
        assert_eq!(section.price, dec(1499));
        assert!(section.discounted);
        assert_eq!(section.id, Some(300));
        let description = section.description.unwrap();
        assert_eq!(description.language, "en");
        assert_eq!(description.price_appender.as_deref(), Some("each"));
    }

    #[test]
    fn appender_requires_exact_language() {
        let env = TestEnv::with_language(fr());
        let product = tshirt();
        let section =
            price_section(&final_price(1999, 1999), product.availabilities.first(), &env.ctx())
                .unwrap();
        assert_eq!(section.id, Some(300));
        assert!(section.description.is_none());
    }

    #[test]
    fn section_without_availability_has_no_id() {
        let env = TestEnv::new();
        let section = price_section(&final_price(1999, 1999), None, &env.ctx()).unwrap();
        assert!(section.id.is_none());
        assert!(!section.discounted);
    }

    #[test]
    fn ambiguous_default_price_is_an_error() {
        let env = TestEnv::new();
        let mut product = tshirt();
        product.availabilities[0].prices.push(base_price(301, 999));
        let result =
            price_section(&final_price(1999, 1999), product.availabilities.first(), &env.ctx());
        assert!(matches!(result, Err(ConversionError::Core(_))));
    }
}
