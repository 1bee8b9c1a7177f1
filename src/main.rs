use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use sajang_match::config::{self, Settings};
use sajang_match::core::Matcher;
use sajang_match::io::{load_buyers, load_product_meta, load_sellers, write_match_csv};
use sajang_match::models::{MatchRequest, MatchWeights, ProductCatalog};

/// Score 양도자 listings against 양수자 inquiries and write both ranked tables
#[derive(Parser, Debug)]
#[command(name = "sajang-match", version)]
struct Cli {
    /// Seller (양도자) CSV export
    #[arg(long)]
    yangdo: PathBuf,

    /// Buyer (양수자) CSV export
    #[arg(long)]
    yangsu: PathBuf,

    /// Product catalog XLSX (or a CSV with the same header)
    #[arg(long)]
    meta: PathBuf,

    /// Rows kept per seller and per buyer
    #[arg(long)]
    topk: Option<usize>,

    /// Scoring weights as JSON, e.g. '{"product":0.40,"price":0.25,"region":0.20,"grade":0.15}'
    #[arg(long)]
    weights: Option<String>,

    /// Output CSV ranked for each seller
    #[arg(long = "out_seller")]
    out_seller: PathBuf,

    /// Output CSV ranked for each buyer
    #[arg(long = "out_buyer")]
    out_buyer: PathBuf,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let settings = Settings::load().context("Failed to load configuration")?;
    config::init_tracing(&settings.logging);

    let run_id = Uuid::new_v4();
    info!(%run_id, "Starting match run");

    for path in [&cli.yangdo, &cli.yangsu, &cli.meta] {
        if !path.exists() {
            bail!("Input file not found: {}", path.display());
        }
    }

    let sellers = load_sellers(&cli.yangdo)?;
    let buyers = load_buyers(&cli.yangsu)?;
    let catalog = ProductCatalog::from_rows(load_product_meta(&cli.meta)?);
    info!(
        sellers = sellers.len(),
        buyers = buyers.len(),
        products = catalog.len(),
        "Inputs loaded"
    );

    let weights = match &cli.weights {
        Some(raw) => {
            let parsed: HashMap<String, f64> =
                serde_json::from_str(raw).context("Failed to parse --weights JSON")?;
            MatchWeights::from_map(&parsed)
        }
        None => settings.scoring.weights,
    };

    let request = MatchRequest {
        topk: cli.topk.unwrap_or(settings.matching.topk),
        weights,
        bucket_threshold: settings.matching.bucket_threshold,
    };
    request.validate().context("Invalid match request")?;

    let matcher = Matcher::new(&request, settings.grades.clone())?;
    info!(topk = request.topk, weights = ?matcher.weights(), "Matcher initialized");

    let output = matcher.run(&sellers, &buyers, &catalog);
    info!(
        pairs = output.pair_count,
        for_sellers = output.for_sellers.len(),
        for_buyers = output.for_buyers.len(),
        "Scoring complete"
    );

    write_match_csv(&cli.out_seller, &output.for_sellers, &sellers, &buyers)?;
    write_match_csv(&cli.out_buyer, &output.for_buyers, &sellers, &buyers)?;

    println!(
        "Saved: {} and {}",
        cli.out_seller.display(),
        cli.out_buyer.display()
    );
    Ok(())
}
