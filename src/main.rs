use clap::Parser;
use lodgebook::{jobs, settings, storage, web};
use miette::Result;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "lodgebook",
    version,
    about = "Short-term rental property management service"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // logging
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    // load settings
    let settings = settings::Settings::load(&cli.config)?;
    tracing::info!(?settings, "Loaded configuration");

    // init storage (database, runs pending migrations)
    let db = storage::init(&settings.database).await?;

    // start background jobs
    let _scheduler = jobs::init_scheduler(db.clone(), Arc::new(settings.clone())).await?;

    // start web server
    web::serve(settings, db).await?;
    Ok(())
}
