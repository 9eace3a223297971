pub mod cli;
pub mod data;
pub mod dataset;
pub mod ingest;
pub mod price;
pub mod schema;
pub mod store;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{LevelFilter, info};

use crate::cli::{Cli, Commands};
use crate::price::PriceSource;

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("retail_ingest", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Init(args) => handle_init(&args),
        Commands::Ingest(args) => ingest::execute(&args),
        Commands::Price(args) => handle_price(&args),
    }
}

fn handle_init(args: &cli::InitArgs) -> Result<()> {
    let conn = store::open(&args.db)?;
    store::create_tables(&conn)
        .with_context(|| format!("Initializing destination tables in {:?}", args.db))?;
    info!("Destination tables ready in {:?}", args.db);
    Ok(())
}

fn handle_price(args: &cli::PriceArgs) -> Result<()> {
    let source: Box<dyn PriceSource> = match (&args.url, &args.selector) {
        (Some(url), Some(selector)) => {
            Box::new(price::LiveSource::new(url.clone(), selector.clone()))
        }
        (None, None) => Box::new(price::SimulatedSource::new(args.failure_probability)),
        _ => bail!("--url and --selector must be provided together"),
    };
    match source.fetch(&args.product_id) {
        Some(price) => println!("{price:.2}"),
        None => println!("not found"),
    }
    Ok(())
}
