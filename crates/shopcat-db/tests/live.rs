//! Live integration tests for shopcat-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/shopcat-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory. Run with `DATABASE_URL` set and `--ignored`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shopcat_core::{
    Language, OptionType, Product, ProductAttribute, ProductAvailability, ProductDescription,
    ProductOption, ProductOptionValue, ProductPrice, ProductRepository, ProductReview,
    ProductVariant, ProductVariation, ReferenceRepository, RepositoryError, ReviewDescription,
    ReviewRepository,
};
use shopcat_db::{find_store_by_code, PgCatalogRepository};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn default_store_id(pool: &sqlx::PgPool) -> i32 {
    find_store_by_code(pool, "DEFAULT")
        .await
        .expect("store lookup failed")
        .expect("DEFAULT store is seeded")
        .id
}

async fn insert_option(pool: &sqlx::PgPool, store_id: i32, code: &str) -> ProductOption {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO product_options (merchant_store_id, code, option_type) \
         VALUES ($1, $2, 'select') RETURNING id",
    )
    .bind(store_id)
    .bind(code)
    .fetch_one(pool)
    .await
    .unwrap_or_else(|e| panic!("insert_option failed for '{code}': {e}"));

    ProductOption {
        id,
        code: code.to_string(),
        option_type: OptionType::Select,
        descriptions: vec![],
    }
}

async fn insert_value(pool: &sqlx::PgPool, store_id: i32, code: &str) -> ProductOptionValue {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO product_option_values (merchant_store_id, code, sort_order) \
         VALUES ($1, $2, 1) RETURNING id",
    )
    .bind(store_id)
    .bind(code)
    .fetch_one(pool)
    .await
    .unwrap_or_else(|e| panic!("insert_value failed for '{code}': {e}"));

    ProductOptionValue {
        id,
        code: code.to_string(),
        sort_order: Some(1),
        ..ProductOptionValue::default()
    }
}

fn english() -> Language {
    Language::new(1, "en")
}

async fn shirt(pool: &sqlx::PgPool) -> Product {
    let store_id = default_store_id(pool).await;
    let size = insert_option(pool, store_id, "size").await;
    let small = insert_value(pool, store_id, "s").await;
    let color = insert_option(pool, store_id, "color").await;
    let red = insert_value(pool, store_id, "red").await;

    let mut p = Product::new("SHIRT", store_id);
    p.descriptions.push(ProductDescription {
        id: 0,
        language: english(),
        name: "Shirt".to_string(),
        description: None,
        friendly_url: Some("shirt".to_string()),
        meta_title: None,
        meta_description: None,
        meta_keywords: None,
        highlights: None,
    });
    p.attributes.push(ProductAttribute {
        id: 0,
        option: color,
        value: red,
        display_only: false,
        default: true,
        price: Some(Decimal::new(150, 2)),
        sort_order: 0,
    });
    p.availabilities.push(ProductAvailability {
        quantity: Some(8),
        prices: vec![ProductPrice::base(Decimal::new(2500, 2))],
        ..ProductAvailability::default()
    });
    p.variants.push(ProductVariant {
        sku: "SHIRT-S".to_string(),
        available: true,
        default_selection: true,
        variation: Some(ProductVariation {
            code: "size-s".to_string(),
            option: size,
            value: small,
        }),
        availabilities: vec![ProductAvailability {
            quantity: Some(2),
            prices: vec![ProductPrice::base(Decimal::new(2200, 2))],
            ..ProductAvailability::default()
        }],
        ..ProductVariant::default()
    });
    p
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn product_aggregate_round_trips(pool: sqlx::PgPool) {
    let repo = PgCatalogRepository::new(pool.clone());
    let product = shirt(&pool).await;
    let id = repo.save(&product).await.expect("save failed");

    let stored = repo.find_by_id(id).await.unwrap().expect("product exists");
    assert_eq!(stored.sku, "SHIRT");
    assert!(stored.created_at.is_some());
    assert_eq!(stored.descriptions[0].name, "Shirt");
    assert_eq!(stored.attributes[0].value.code, "red");
    assert_eq!(stored.attributes[0].price, Some(Decimal::new(150, 2)));

    let variant = &stored.variants[0];
    assert_eq!(variant.variation.as_ref().unwrap().option.code, "size");
    assert_eq!(variant.availabilities[0].variant_id, Some(variant.id));
    assert_eq!(
        variant.availabilities[0].prices[0].amount,
        Decimal::new(2200, 2)
    );
    assert_eq!(stored.availabilities[0].quantity, Some(8));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn save_preserves_child_ids(pool: sqlx::PgPool) {
    let repo = PgCatalogRepository::new(pool.clone());
    let id = repo.save(&shirt(&pool).await).await.unwrap();
    let mut stored = repo.find_by_id(id).await.unwrap().unwrap();
    let price_id = stored.availabilities[0].prices[0].id;

    stored.availabilities[0].prices[0].amount = Decimal::new(1999, 2);
    repo.save(&stored).await.unwrap();

    let reloaded = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(reloaded.availabilities[0].prices[0].id, price_id);
    assert_eq!(
        reloaded.availabilities[0].prices[0].amount,
        Decimal::new(1999, 2)
    );
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn duplicate_sku_is_a_conflict(pool: sqlx::PgPool) {
    let repo = PgCatalogRepository::new(pool.clone());
    let store_id = default_store_id(&pool).await;
    repo.save(&Product::new("DUP", store_id)).await.unwrap();
    let err = repo.save(&Product::new("DUP", store_id)).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict(_)));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn sku_lookup_covers_variants(pool: sqlx::PgPool) {
    let repo = PgCatalogRepository::new(pool.clone());
    let id = repo.save(&shirt(&pool).await).await.unwrap();
    let store_id = default_store_id(&pool).await;

    assert_eq!(
        repo.find_by_sku(store_id, "SHIRT-S").await.unwrap().unwrap().id,
        id
    );
    assert!(repo.exists_by_sku(store_id, "SHIRT").await.unwrap());
    assert!(!repo.exists_by_sku(store_id, "NOPE").await.unwrap());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn delete_missing_product_reports_missing(pool: sqlx::PgPool) {
    let repo = PgCatalogRepository::new(pool);
    assert!(matches!(
        repo.delete(9999).await,
        Err(RepositoryError::Missing { id: 9999, .. })
    ));
}

// ---------------------------------------------------------------------------
// Reviews and reference data
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn review_lifecycle(pool: sqlx::PgPool) {
    let repo = PgCatalogRepository::new(pool.clone());
    let product_id = repo.save(&shirt(&pool).await).await.unwrap();

    let mut review = ProductReview {
        id: 0,
        product_id,
        customer_id: 3,
        rating: 4.5,
        review_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        descriptions: vec![ReviewDescription {
            id: 0,
            language: english(),
            name: None,
            description: "Great".to_string(),
        }],
    };
    review.id = repo.save_review(&review).await.unwrap();
    review.rating = 3.0;
    repo.save_review(&review).await.unwrap();

    let reviews = repo.list_reviews(product_id).await.unwrap();
    assert_eq!(reviews.len(), 1);
    assert!((reviews[0].rating - 3.0).abs() < f64::EPSILON);
    assert_eq!(reviews[0].descriptions[0].description, "Great");

    repo.delete_review(review.id).await.unwrap();
    assert!(repo.find_review(review.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn seeded_reference_data_is_readable(pool: sqlx::PgPool) {
    let repo = PgCatalogRepository::new(pool);
    let store = repo.find_store("DEFAULT").await.unwrap().unwrap();
    assert_eq!(store.currency_code, "USD");
    assert_eq!(store.weight_unit_code.as_deref(), Some("KG"));

    let languages = repo.list_languages().await.unwrap();
    let codes: Vec<&str> = languages.iter().map(|l| l.code.as_str()).collect();
    assert_eq!(codes, vec!["en", "fr"]);

    let manufacturer = repo.find_manufacturer("DEFAULT").await.unwrap().unwrap();
    assert_eq!(manufacturer.descriptions[0].name, "Default");
}
