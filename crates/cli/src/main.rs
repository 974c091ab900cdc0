mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use config::CliConfig;
use items::{load_items, Item};
use merge::MergeFilter;
use pipeline::{CallContext, FilterParams};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::info;

/// merge-items - Merge the rankings of several item filters
#[derive(Parser)]
#[command(name = "merge-items")]
#[command(about = "Merge the rankings of several item filters", long_about = None)]
struct Cli {
    /// Path to a JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge the filters over a batch of items
    Merge {
        /// Item batch (.json, .jsonl, or one word per line)
        #[arg(long)]
        items: PathBuf,

        /// Child filter, repeatable; overrides the config's filter list
        #[arg(long = "filter")]
        filters: Vec<String>,

        /// User input the matchers compare against
        #[arg(long, default_value = "")]
        input: String,

        /// Session name used for per-session params
        #[arg(long, default_value = "default")]
        session: String,

        /// Keep duplicate items
        #[arg(long)]
        keep_duplicates: bool,

        /// Print the merged batch as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the filters the configuration can resolve
    Filters,

    /// Run benchmark to test performance
    Benchmark {
        /// Number of merge calls to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent merge calls
        #[arg(long, default_value = "10")]
        concurrent: usize,

        /// Items per generated batch
        #[arg(long, default_value = "2000")]
        batch_size: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            let config = CliConfig::load(path)?;
            info!("Loaded config from {}", path.display());
            config
        }
        None => CliConfig::default(),
    };

    match cli.command {
        Commands::Merge {
            items,
            filters,
            input,
            session,
            keep_duplicates,
            json,
        } => {
            let params = merge_params_from(&config, filters, keep_duplicates);
            handle_merge(&config, items, params, input, session, json).await?
        }
        Commands::Filters => handle_filters(&config),
        Commands::Benchmark {
            requests,
            concurrent,
            batch_size,
        } => handle_benchmark(&config, requests, concurrent, batch_size).await?,
    }

    Ok(())
}

/// Combine the config's merge params with command-line overrides.
fn merge_params_from(
    config: &CliConfig,
    filters: Vec<String>,
    keep_duplicates: bool,
) -> FilterParams {
    let mut params = config.merge.clone();
    if !filters.is_empty() {
        let filters = filters.into_iter().map(Value::String).collect();
        params.insert("filters".to_string(), Value::Array(filters));
    }
    if keep_duplicates {
        params.insert("unique".to_string(), Value::Bool(false));
    }
    params
}

/// Handle the 'merge' command
async fn handle_merge(
    config: &CliConfig,
    items_path: PathBuf,
    params: FilterParams,
    input: String,
    session: String,
    as_json: bool,
) -> Result<()> {
    let start = Instant::now();
    let batch = load_items(&items_path)
        .with_context(|| format!("Failed to load items from {}", items_path.display()))?;
    println!(
        "{} Loaded {} items in {:?}",
        "✓".green(),
        batch.len(),
        start.elapsed()
    );

    let merge = MergeFilter::new(Arc::new(config.directory()));
    let context = Arc::new(CallContext::new(session).with_input(input));
    let merged = merge.merge(context, batch, &params).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&merged)?);
    } else {
        print_items(&merged);
    }
    Ok(())
}

/// Handle the 'filters' command
fn handle_filters(config: &CliConfig) {
    println!("{}", "Available filters:".bold().blue());
    for name in config.directory().names() {
        match config.aliases.get(&name) {
            Some(target) => println!("{}{} -> {}", "• ".green(), name, target),
            None => println!("{}{}", "• ".green(), name),
        }
    }
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    config: &CliConfig,
    requests: usize,
    concurrent: usize,
    batch_size: usize,
) -> Result<()> {
    if requests == 0 {
        println!("Nothing to run");
        return Ok(());
    }

    let merge = Arc::new(MergeFilter::new(Arc::new(config.directory())));
    let mut params = config.merge.clone();
    if !params.contains_key("filters") {
        params.insert(
            "filters".to_string(),
            json!([
                {"name": "matcher_substring", "limit": 500},
                {"name": "matcher_head", "weight": 2},
                "sorter_alpha"
            ]),
        );
    }
    let params = Arc::new(params);
    let batch: Arc<Vec<Item>> = Arc::new(random_batch(batch_size));
    let permits = Arc::new(Semaphore::new(concurrent.max(1)));

    let wall_clock = Instant::now();
    let mut handles = vec![];
    for _ in 0..requests {
        let merge = Arc::clone(&merge);
        let params = Arc::clone(&params);
        let batch = Arc::clone(&batch);
        let permits = Arc::clone(&permits);
        let handle = tokio::spawn(async move {
            let _permit = permits.acquire_owned().await?;
            let context = Arc::new(CallContext::new("benchmark").with_input(random_word(2)));
            let start = Instant::now();
            merge.merge(context, batch.to_vec(), &params).await?;
            Ok::<_, anyhow::Error>(start.elapsed())
        });
        handles.push(handle);
    }

    let mut timings = vec![];
    for handle in handles {
        let elapsed = handle.await??;
        timings.push(elapsed);
    }
    let total_time = wall_clock.elapsed();

    let latency_sum: Duration = timings.iter().sum();
    let avg_latency = latency_sum / (timings.len() as u32);
    timings.sort();
    let p50 = timings[timings.len() / 2];
    let p95 = timings[(timings.len() as f32 * 0.95) as usize];
    let p99 = timings[(timings.len() as f32 * 0.99) as usize];
    let throughput = requests as f32 / total_time.as_secs_f32();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", p50);
    println!("P95 latency: {:?}", p95);
    println!("P99 latency: {:?}", p99);
    println!("Throughput: {:.2} merges/second", throughput);

    Ok(())
}

fn random_word(len: usize) -> String {
    (0..len)
        .map(|_| (b'a' + (rand::random::<u8>() % 26)) as char)
        .collect()
}

fn random_batch(size: usize) -> Vec<Item> {
    (0..size)
        .map(|_| {
            let len = (rand::random::<u32>() % 8 + 3) as usize;
            Item::new(random_word(len)).with_kind("word")
        })
        .collect()
}

/// Print the merged batch, one ranked line per item
fn print_items(items: &[Item]) {
    println!("{}", format!("Merged items ({}):", items.len()).bold().blue());
    for (rank, item) in items.iter().enumerate() {
        let kind = item.kind.as_deref().unwrap_or("-");
        match &item.display {
            Some(display) if display != &item.word => println!(
                "{}. {} [{}] {}",
                (rank + 1).to_string().green(),
                item.word,
                kind,
                display.dimmed()
            ),
            _ => println!(
                "{}. {} [{}]",
                (rank + 1).to_string().green(),
                item.word,
                kind
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_filters_override_config() {
        let config: CliConfig =
            serde_json::from_value(json!({"merge": {"filters": ["sorter_alpha"], "unique": true}}))
                .unwrap();

        let params = merge_params_from(&config, vec!["matcher_head".to_string()], true);

        assert_eq!(params["filters"], json!(["matcher_head"]));
        assert_eq!(params["unique"], json!(false));
    }

    #[test]
    fn test_config_params_kept_without_overrides() {
        let config: CliConfig =
            serde_json::from_value(json!({"merge": {"filters": ["sorter_alpha"]}})).unwrap();

        let params = merge_params_from(&config, vec![], false);

        assert_eq!(params["filters"], json!(["sorter_alpha"]));
        assert!(!params.contains_key("unique"));
    }

    #[test]
    fn test_random_batch_shape() {
        let batch = random_batch(50);

        assert_eq!(batch.len(), 50);
        assert!(batch.iter().all(|i| (3..=10).contains(&i.word.len())));
    }
}
