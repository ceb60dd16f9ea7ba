use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::reference::{Language, Localized};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewDescription {
    pub id: i64,
    pub language: Language,
    pub name: Option<String>,
    pub description: String,
}

impl Localized for ReviewDescription {
    fn language(&self) -> &Language {
        &self.language
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductReview {
    pub id: i64,
    pub product_id: i64,
    pub customer_id: i64,
    /// Between 0 and 5 inclusive; half stars allowed.
    pub rating: f64,
    pub review_date: NaiveDate,
    pub descriptions: Vec<ReviewDescription>,
}

/// Average and count of a product's ratings, or `None` when it has no reviews.
#[must_use]
pub fn rating_summary(reviews: &[ProductReview]) -> Option<(f64, i32)> {
    if reviews.is_empty() {
        return None;
    }
    let total: f64 = reviews.iter().map(|r| r.rating).sum();
    let count = i32::try_from(reviews.len()).unwrap_or(i32::MAX);
    Some((total / f64::from(count), count))
}
