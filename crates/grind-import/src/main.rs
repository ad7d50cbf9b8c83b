//! grind-import: Command-line importer for LeetCode solution files.
//!
//! Scans a directory of `<id>-<slug>.js` files, runs pending database
//! migrations, and seeds the parsed problems with their categories.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use grind_core::defaults;
use grind_db::Database;
use grind_import::import_directory;

#[derive(Parser)]
#[command(name = "grind-import")]
#[command(author, version, about = "Seed the problem catalog from solution files")]
struct Cli {
    /// Directory holding the solution files
    #[arg(long, default_value = defaults::IMPORT_DIR)]
    dir: PathBuf,

    /// Database connection string (default: DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "grind_import=info,grind_db=info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let database_url = cli
        .database_url
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| "postgres://localhost/grind".to_string());

    info!("Connecting to database...");
    let db = Database::connect(&database_url).await?;

    info!("Running database migrations...");
    db.migrate().await?;

    let summary = import_directory(&db, &cli.dir).await?;

    println!(
        "Imported {} problems ({} category links) from {}",
        summary.problems,
        summary.links,
        cli.dir.display()
    );

    Ok(())
}
