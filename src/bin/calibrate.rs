use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use sajang_match::config::{self, Settings};
use sajang_match::core::{build_seller_cards, Matcher};
use sajang_match::eval::{calibrate, load_examples, min_max_normalize, CalibrationTargets};
use sajang_match::io::{load_product_meta, load_sellers};
use sajang_match::models::{CalibrationReport, CalibrationRequest, MatchRequest, ProductCatalog};

/// Sweep score thresholds against labeled queries and report the best cut
#[derive(Parser, Debug)]
#[command(name = "sajang-calibrate", version)]
struct Cli {
    /// Labeled evaluation queries (JSONL, one example per line)
    #[arg(long)]
    eval: PathBuf,

    /// Seller (양도자) CSV export to rank against
    #[arg(long)]
    yangdo: PathBuf,

    /// Product catalog XLSX (or a CSV with the same header)
    #[arg(long)]
    meta: PathBuf,

    /// Candidate pool size scored per query
    #[arg(long)]
    pool: Option<usize>,

    /// Accuracy target
    #[arg(long)]
    acc: Option<f64>,

    /// Precision target
    #[arg(long)]
    prec: Option<f64>,

    /// Recall target
    #[arg(long)]
    rec: Option<f64>,

    /// Write a JSON calibration report here
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let settings = Settings::load().context("Failed to load configuration")?;
    config::init_tracing(&settings.logging);

    let run_id = Uuid::new_v4();
    info!(%run_id, "Starting calibration run");

    for path in [&cli.eval, &cli.yangdo, &cli.meta] {
        if !path.exists() {
            bail!("Input file not found: {}", path.display());
        }
    }

    let request = CalibrationRequest {
        pool: cli.pool.unwrap_or(settings.evaluation.pool),
        accuracy: cli.acc.unwrap_or(settings.evaluation.accuracy),
        precision: cli.prec.unwrap_or(settings.evaluation.precision),
        recall: cli.rec.unwrap_or(settings.evaluation.recall),
    };
    request.validate().context("Invalid calibration request")?;

    let examples = load_examples(&cli.eval)?;
    if examples.is_empty() {
        bail!("No labeled examples in {}", cli.eval.display());
    }

    let sellers = load_sellers(&cli.yangdo)?;
    let catalog = ProductCatalog::from_rows(load_product_meta(&cli.meta)?);
    let seller_cards = build_seller_cards(&sellers, &catalog);
    info!(
        examples = examples.len(),
        sellers = sellers.len(),
        products = catalog.len(),
        "Inputs loaded"
    );

    let match_request = MatchRequest {
        topk: request.pool,
        weights: settings.scoring.weights,
        bucket_threshold: None,
    };
    let matcher = Matcher::new(&match_request, settings.grades.clone())?;

    // Pool the per-query rankings into one labeled batch, normalizing
    // scores within each query before mixing them.
    let mut labels: Vec<bool> = Vec::new();
    let mut scores: Vec<f64> = Vec::new();
    let mut queries_used = 0usize;
    for (index, example) in examples.iter().enumerate() {
        let qid = example
            .qid
            .clone()
            .unwrap_or_else(|| format!("q{}", index + 1));
        let query = example.to_query_card(&qid);
        let ranked = matcher.rank_cards_for_buyers(&seller_cards, std::slice::from_ref(&query));
        if ranked.is_empty() {
            continue;
        }

        let positives: HashSet<&str> = example.positives.iter().map(String::as_str).collect();
        let mut query_scores: Vec<f64> = ranked.iter().map(|pair| pair.score).collect();
        min_max_normalize(&mut query_scores);

        labels.extend(
            ranked
                .iter()
                .map(|pair| positives.contains(pair.seller_id.as_str())),
        );
        scores.extend(query_scores);
        queries_used += 1;
    }

    if labels.is_empty() {
        bail!("No evaluation samples were produced; check the seller roster and queries");
    }

    let positive_count = labels.iter().filter(|&&label| label).count();
    let positive_rate = positive_count as f64 / labels.len() as f64;

    let targets = CalibrationTargets {
        accuracy: request.accuracy,
        precision: request.precision,
        recall: request.recall,
    };
    let outcome = calibrate(&labels, &scores, &targets)?;
    let point = outcome.point();
    let metrics = &point.metrics;

    println!();
    println!("=== Evaluation summary ===");
    println!(
        "Samples: {} (queries={}, pool_per_query={})",
        labels.len(),
        queries_used,
        request.pool
    );
    println!("Positive rate: {:.4}", positive_rate);
    println!();
    if outcome.goal_met() {
        println!("Found a threshold meeting all targets");
    } else {
        println!("No threshold meets all three targets at once. Closest point:");
    }
    println!("- threshold = {:.3}", point.threshold);
    println!("- Accuracy  = {:.4}", metrics.accuracy);
    println!("- Precision = {:.4}", metrics.precision);
    println!("- Recall    = {:.4}", metrics.recall);
    println!("- F1        = {:.4}", metrics.f1);
    println!(
        "- Confusion Matrix: TN={}, TP={}, FN={}, FP={}",
        metrics.confusion.true_negatives,
        metrics.confusion.true_positives,
        metrics.confusion.false_negatives,
        metrics.confusion.false_positives
    );

    if let Some(out) = &cli.out {
        let report = CalibrationReport {
            run_id: run_id.to_string(),
            generated_at: Utc::now(),
            request: request.clone(),
            samples: labels.len(),
            queries: queries_used,
            positive_rate,
            goal_met: outcome.goal_met(),
            threshold: point.threshold,
            accuracy: metrics.accuracy,
            precision: metrics.precision,
            recall: metrics.recall,
            f1: metrics.f1,
            true_positives: metrics.confusion.true_positives,
            true_negatives: metrics.confusion.true_negatives,
            false_positives: metrics.confusion.false_positives,
            false_negatives: metrics.confusion.false_negatives,
        };
        let json =
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        fs::write(out, json)
            .with_context(|| format!("Failed to write report to {}", out.display()))?;
        println!("Saved report: {}", out.display());
    }

    Ok(())
}
