//! Reduction of a product's availabilities to stock figures.

use shopcat_core::{Product, ProductAvailability};

/// Stock figures projected from the authoritative availability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AvailabilitySummary {
    pub quantity: i32,
    pub min_order_quantity: i32,
    pub max_order_quantity: i32,
    pub can_be_purchased: bool,
}

/// Picks the product's authoritative availability and summarizes it.
///
/// Absent quantities default to 1. A product without availabilities yields
/// an all-zero, non-purchasable summary.
#[must_use]
pub fn reduce_availability(product: &Product) -> (Option<&ProductAvailability>, AvailabilitySummary) {
    let Some(availability) = product.authoritative_availability() else {
        return (None, AvailabilitySummary::default());
    };

    let quantity = availability.quantity.unwrap_or(1);
    let summary = AvailabilitySummary {
        quantity,
        min_order_quantity: availability.min_order_quantity.unwrap_or(1),
        max_order_quantity: availability.max_order_quantity.unwrap_or(1),
        can_be_purchased: quantity > 0 && product.available,
    };
    (Some(availability), summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{availability, tshirt};

    #[test]
    fn summary_from_product_wide_row() {
        let product = tshirt();
        let (row, summary) = reduce_availability(&product);
        assert_eq!(row.unwrap().id, 200);
        assert_eq!(summary.quantity, 5);
        assert_eq!(summary.min_order_quantity, 1);
        assert_eq!(summary.max_order_quantity, 1);
        assert!(summary.can_be_purchased);
    }

    #[test]
    fn variant_rows_are_skipped_in_favor_of_product_wide() {
        let mut product = tshirt();
        let mut variant_row = availability(201, Some(0), vec![]);
        variant_row.variant_id = Some(1);
        product.availabilities.insert(0, variant_row);
        let (row, _) = reduce_availability(&product);
        assert_eq!(row.unwrap().id, 200);
    }

    #[test]
    fn last_row_used_when_none_is_product_wide() {
        let mut product = tshirt();
        let mut a = availability(201, Some(3), vec![]);
        a.region_variant = Some("QC".to_string());
        let mut b = availability(202, Some(8), vec![]);
        b.variant_id = Some(4);
        product.availabilities = vec![a, b];
        let (row, summary) = reduce_availability(&product);
        assert_eq!(row.unwrap().id, 202);
        assert_eq!(summary.quantity, 8);
    }

    #[test]
    fn absent_quantities_default_to_one() {
        let mut product = tshirt();
        product.availabilities = vec![availability(201, None, vec![])];
        let (_, summary) = reduce_availability(&product);
        assert_eq!(summary.quantity, 1);
        assert!(summary.can_be_purchased);
    }

    #[test]
    fn unavailable_product_cannot_be_purchased() {
        let mut product = tshirt();
        product.available = false;
        let (_, summary) = reduce_availability(&product);
        assert!(!summary.can_be_purchased);
    }

    #[test]
    fn zero_stock_cannot_be_purchased() {
        let mut product = tshirt();
        product.availabilities[0].quantity = Some(0);
        let (_, summary) = reduce_availability(&product);
        assert_eq!(summary.quantity, 0);
        assert!(!summary.can_be_purchased);
    }

    #[test]
    fn no_availability_gives_empty_summary() {
        let mut product = tshirt();
        product.availabilities.clear();
        let (row, summary) = reduce_availability(&product);
        assert!(row.is_none());
        assert_eq!(summary, AvailabilitySummary::default());
    }
}
