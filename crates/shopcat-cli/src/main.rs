mod product;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::product::ProductCommands;

#[derive(Debug, Parser)]
#[command(name = "shopcat-cli")]
#[command(about = "Shopcat catalog command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Inspect catalog products
    Product {
        #[command(subcommand)]
        command: ProductCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = shopcat_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let pool = shopcat_db::connect_pool_from_config(&config).await?;

    match cli.command {
        Commands::Migrate => {
            let applied = shopcat_db::run_migrations(&pool).await?;
            tracing::info!(applied, "database migrations up to date");
            println!("migrations applied: {applied}");
        }
        Commands::Product { command } => product::run(pool, &config, command).await?,
    }

    Ok(())
}
