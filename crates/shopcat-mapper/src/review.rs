use chrono::NaiveDate;
use shopcat_core::dates::{format_date, parse_date};
use shopcat_core::{
    Language, PersistableProductReview, ProductReview, ReadableProductReview, ReviewDescription,
};

use crate::error::ConversionError;
use crate::locale::resolve;

/// Builds a [`ProductReview`] from the inbound payload, written in `language`.
/// A missing date means `today`.
///
/// # Errors
///
/// Returns [`ConversionError::Validation`] for a rating outside `0..=5` or a
/// blank text, and [`ConversionError::InvalidDate`] for a malformed date.
pub fn to_review(
    source: &PersistableProductReview,
    language: &Language,
    today: NaiveDate,
) -> Result<ProductReview, ConversionError> {
    if !(0.0..=5.0).contains(&source.rating) {
        return Err(ConversionError::Validation(format!(
            "rating must be between 0 and 5, got {}",
            source.rating
        )));
    }
    if source.description.trim().is_empty() {
        return Err(ConversionError::Validation("review text is required".into()));
    }

    let review_date = match source.date.as_deref().filter(|d| !d.trim().is_empty()) {
        Some(raw) => parse_date(raw).map_err(|_| ConversionError::InvalidDate {
            field: "date",
            value: raw.to_string(),
        })?,
        None => today,
    };

    Ok(ProductReview {
        id: source.id.unwrap_or(0),
        product_id: source.product_id,
        customer_id: source.customer_id,
        rating: source.rating,
        review_date,
        descriptions: vec![ReviewDescription {
            id: 0,
            language: language.clone(),
            name: None,
            description: source.description.trim().to_string(),
        }],
    })
}

#[must_use]
pub fn to_readable_review(review: &ProductReview, language: &Language) -> ReadableProductReview {
    let description = resolve(&review.descriptions, language);
    ReadableProductReview {
        id: review.id,
        product_id: review.product_id,
        customer_id: review.customer_id,
        rating: review.rating,
        date: format_date(review.review_date),
        language: description.map(|d| d.language.code.clone()),
        description: description.map(|d| d.description.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{day, en, fr};

    fn payload(rating: f64) -> PersistableProductReview {
        PersistableProductReview {
            product_id: 100,
            customer_id: 7,
            rating,
            description: "Fits well".to_string(),
            ..PersistableProductReview::default()
        }
    }

    #[test]
    fn to_review_defaults_date_to_today() {
        let review = to_review(&payload(4.5), &en(), day(2024, 6, 15)).unwrap();
        assert_eq!(review.id, 0);
        assert_eq!(review.review_date, day(2024, 6, 15));
        assert_eq!(review.descriptions[0].language.code, "en");
        assert_eq!(review.descriptions[0].description, "Fits well");
    }

    #[test]
    fn to_review_parses_given_date() {
        let mut source = payload(3.0);
        source.id = Some(12);
        source.date = Some("2024-01-02".to_string());
        let review = to_review(&source, &en(), day(2024, 6, 15)).unwrap();
        assert_eq!(review.id, 12);
        assert_eq!(review.review_date, day(2024, 1, 2));
    }

    #[test]
    fn to_review_rejects_out_of_range_rating() {
        assert!(matches!(
            to_review(&payload(5.5), &en(), day(2024, 6, 15)),
            Err(ConversionError::Validation(_))
        ));
        assert!(matches!(
            to_review(&payload(-1.0), &en(), day(2024, 6, 15)),
            Err(ConversionError::Validation(_))
        ));
    }

    #[test]
    fn to_review_rejects_bad_date() {
        let mut source = payload(3.0);
        source.date = Some("yesterday".to_string());
        assert!(matches!(
            to_review(&source, &en(), day(2024, 6, 15)),
            Err(ConversionError::InvalidDate { field: "date", .. })
        ));
    }

    #[test]
    fn readable_review_formats_date_and_falls_back_to_only_text() {
        let review = to_review(&payload(4.0), &en(), day(2024, 6, 15)).unwrap();
        let readable = to_readable_review(&review, &fr());
        assert_eq!(readable.date, "2024-06-15");
        assert_eq!(readable.language.as_deref(), Some("en"));
        assert_eq!(readable.description.as_deref(), Some("Fits well"));
        assert_eq!(readable.customer_id, 7);
    }
}
