use super::*;
use crate::fixtures::{availability, base_price, day, dec, store, tshirt, variant};

fn service() -> DefaultPricingService {
    DefaultPricingService::with_pricing_date(day(2024, 6, 15))
}

fn store_with_currency(code: &str) -> MerchantStore {
    MerchantStore {
        currency_code: code.to_string(),
        ..store()
    }
}

// -----------------------------------------------------------------------
// calculate_product_price
// -----------------------------------------------------------------------

#[test]
fn product_price_without_special() {
    let price = service().calculate_product_price(&tshirt()).unwrap().unwrap();
    assert_eq!(price.price_id, 300);
    assert_eq!(price.final_price, dec(1999));
    assert_eq!(price.original_price, dec(1999));
    assert!(!price.discounted);
}

#[test]
fn product_price_applies_active_special() {
    let mut product = tshirt();
    let p = &mut product.availabilities[0].prices[0];
    p.special_amount = Some(dec(1499));
    p.special_start = Some(day(2024, 6, 1));
    p.special_end = Some(day(2024, 6, 30));

    let price = service().calculate_product_price(&product).unwrap().unwrap();
    assert_eq!(price.final_price, dec(1499));
    assert_eq!(price.original_price, dec(1999));
    assert!(price.discounted);
}

#[test]
fn product_price_open_ended_special_is_active() {
    let mut product = tshirt();
    product.availabilities[0].prices[0].special_amount = Some(dec(999));
    let price = service().calculate_product_price(&product).unwrap().unwrap();
    assert!(price.discounted);
    assert_eq!(price.final_price, dec(999));
}

#[test]
fn product_price_ignores_expired_special() {
    let mut product = tshirt();
    let p = &mut product.availabilities[0].prices[0];
    p.special_amount = Some(dec(1499));
    p.special_end = Some(day(2024, 6, 14));
    let price = service().calculate_product_price(&product).unwrap().unwrap();
    assert!(!price.discounted);
    assert_eq!(price.final_price, dec(1999));
}

#[test]
fn product_price_ignores_special_not_lower() {
    let mut product = tshirt();
    product.availabilities[0].prices[0].special_amount = Some(dec(2500));
    let price = service().calculate_product_price(&product).unwrap().unwrap();
    assert!(!price.discounted);
}

#[test]
fn product_price_none_without_availability() {
    let mut product = tshirt();
    product.availabilities.clear();
    assert!(service().calculate_product_price(&product).unwrap().is_none());
}

#[test]
fn product_price_rejects_two_default_prices() {
    let mut product = tshirt();
    product.availabilities[0].prices.push(base_price(301, 1500));
    let err = service().calculate_product_price(&product).unwrap_err();
    assert!(matches!(err, PricingError::Core(_)));
}

// -----------------------------------------------------------------------
// calculate_variant_price
// -----------------------------------------------------------------------

#[test]
fn variant_price_uses_own_availability() {
    let product = tshirt();
    let mut v = variant(1, "TSHIRT-S", (10, "s"), false);
    v.availabilities = vec![availability(201, Some(2), vec![base_price(310, 2199)])];
    let price = service().calculate_variant_price(&v, &product).unwrap().unwrap();
    assert_eq!(price.price_id, 310);
    assert_eq!(price.final_price, dec(2199));
}

#[test]
fn variant_price_falls_back_to_product() {
    let product = tshirt();
    let v = variant(1, "TSHIRT-S", (10, "s"), false);
    let price = service().calculate_variant_price(&v, &product).unwrap().unwrap();
    assert_eq!(price.price_id, 300);
}

// -----------------------------------------------------------------------
// display_amount / parse_amount
// -----------------------------------------------------------------------

#[test]
fn display_amount_known_symbols() {
    let svc = service();
    assert_eq!(svc.display_amount(dec(1999), &store_with_currency("USD")), "$19.99");
    assert_eq!(svc.display_amount(dec(500), &store_with_currency("EUR")), "€5.00");
    assert_eq!(svc.display_amount(dec(500), &store_with_currency("GBP")), "£5.00");
    assert_eq!(svc.display_amount(dec(500), &store_with_currency("cad")), "CA$5.00");
    assert_eq!(svc.display_amount(dec(500), &store_with_currency("JPY")), "¥5.00");
}

#[test]
fn display_amount_unknown_currency_uses_code_prefix() {
    assert_eq!(
        service().display_amount(dec(1234), &store_with_currency("CHF")),
        "CHF 12.34"
    );
}

#[test]
fn display_amount_rounds_half_away_from_zero() {
    let usd = store_with_currency("USD");
    assert_eq!(service().display_amount(Decimal::new(10_005, 3), &usd), "$10.01");
    assert_eq!(service().display_amount(Decimal::new(7, 0), &usd), "$7.00");
}

#[test]
fn parse_amount_accepts_decimal_text() {
    assert_eq!(service().parse_amount(" 12.50 ").unwrap(), dec(1250));
    assert_eq!(service().parse_amount("0").unwrap(), Decimal::ZERO);
}

#[test]
fn parse_amount_rejects_bad_input() {
    let svc = service();
    assert!(matches!(svc.parse_amount("  "), Err(PricingError::InvalidAmount(_))));
    assert!(matches!(svc.parse_amount("12,50"), Err(PricingError::InvalidAmount(_))));
    assert!(matches!(svc.parse_amount("abc"), Err(PricingError::InvalidAmount(_))));
    assert!(matches!(svc.parse_amount("-3"), Err(PricingError::NegativeAmount(_))));
}
