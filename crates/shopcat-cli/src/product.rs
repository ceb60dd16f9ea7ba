//! `product` subcommands: read-only lookups through the catalog facade.

use std::sync::Arc;

use clap::Subcommand;
use shopcat_core::AppConfig;
use shopcat_db::PgCatalogRepository;
use shopcat_facade::ProductCommonFacade;
use shopcat_mapper::{DefaultPricingService, StaticImagePaths};

#[derive(Debug, Subcommand)]
pub enum ProductCommands {
    /// Print the readable projection of a product as JSON
    Show {
        /// Store code (e.g., DEFAULT)
        #[arg(long)]
        store: String,
        /// Product id
        #[arg(long)]
        id: i64,
        /// Language code; defaults to the store's language
        #[arg(long)]
        lang: Option<String>,
    },
    /// Report whether a product or variant sku is in use
    Exists {
        /// Store code (e.g., DEFAULT)
        #[arg(long)]
        store: String,
        #[arg(long)]
        sku: String,
    },
}

/// # Errors
///
/// Returns an error when the store, language or product cannot be resolved,
/// or when the database query fails.
pub(crate) async fn run(
    pool: sqlx::PgPool,
    config: &AppConfig,
    command: ProductCommands,
) -> anyhow::Result<()> {
    let facade = ProductCommonFacade::new(
        Arc::new(PgCatalogRepository::new(pool)),
        Arc::new(DefaultPricingService::new()),
        Arc::new(StaticImagePaths::new(config.image_base_url.clone())),
    );

    match command {
        ProductCommands::Show { store, id, lang } => {
            let store = facade.resolve_store(&store).await?;
            let language = facade.resolve_language(lang.as_deref(), &store).await?;
            let product = facade.get_product(&store, id, &language).await?;
            println!("{}", serde_json::to_string_pretty(&product)?);
        }
        ProductCommands::Exists { store, sku } => {
            let store = facade.resolve_store(&store).await?;
            let exists = facade.exists(&sku, &store).await?;
            if exists {
                println!("sku {sku} exists in store {}", store.code);
            } else {
                println!("sku {sku} not found in store {}", store.code);
            }
        }
    }

    Ok(())
}
