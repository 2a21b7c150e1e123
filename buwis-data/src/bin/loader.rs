use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use buwis_data::BracketTableLoader;
use buwis_db_sqlite::SqliteBracketStore;

/// Load bracket table data from a CSV file into the bracket store.
///
/// The CSV file should have the following columns:
/// - tax_year: the tax year the schedule applies to
/// - bracket_order: 1-based position in the schedule
/// - min_income: the bracket floor
/// - max_income: the bracket ceiling (empty for the open-ended top bracket)
/// - base_tax: cumulative tax below the floor
/// - rate: the marginal rate as a decimal (e.g., 0.25)
#[derive(Parser, Debug)]
#[command(name = "buwis-data-loader")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing bracket table data
    #[arg(short, long)]
    file: PathBuf,

    /// SQLite database URL (e.g., sqlite:brackets.db?mode=rwc to create if missing)
    #[arg(short, long, default_value = "sqlite:brackets.db?mode=rwc")]
    database: String,

    /// Run database migrations before loading data
    #[arg(short, long, default_value_t = false)]
    migrate: bool,

    /// Run seed files from the specified directory after migrations
    #[arg(short, long)]
    seeds: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let store = SqliteBracketStore::new(&args.database)
        .await
        .with_context(|| format!("Failed to connect to database: {}", args.database))?;

    if args.migrate {
        println!("Running migrations...");
        store
            .run_migrations()
            .await
            .context("Failed to run migrations")?;
        println!("Migrations complete.");
    }

    if let Some(seeds_dir) = &args.seeds {
        println!("Running seeds from: {}", seeds_dir.display());
        store
            .run_seeds(seeds_dir)
            .await
            .with_context(|| format!("Failed to run seeds from: {}", seeds_dir.display()))?;
        println!("Seeds complete.");
    }

    println!("Loading bracket tables from: {}", args.file.display());

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let records = BracketTableLoader::parse(file)
        .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;

    println!("Parsed {} records from CSV", records.len());

    let written = BracketTableLoader::load(&store, &records)
        .await
        .context("Failed to load bracket tables into the store")?;

    println!("Successfully loaded {} bracket rows into the store.", written);

    Ok(())
}
