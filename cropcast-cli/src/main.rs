//! CropCast CLI: serve the forecast API and run forecasts from the shell.
//!
//! Commands:
//! - `serve`: HTTP API on the configured host/port
//! - `predict`: next-day price for one crop–state pair
//! - `forecast`: N-day recursive forecast with trend summary
//! - `forecast-all`: forecast every pair that has a model, in parallel
//! - `models`: list loaded models and their fingerprints

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{AppConfig, DEFAULT_LOG_FILTER};
use cropcast_core::data::load_price_csv;
use cropcast_core::{ForecastResult, Forecaster, Horizon, ModelRegistry};
use cropcast_server::routes::UNIT;
use cropcast_server::AppState;

#[derive(Parser)]
#[command(
    name = "cropcast",
    version,
    about = "CropCast: crop price forecasting by crop and state"
)]
struct Cli {
    /// Config file. Defaults to ./cropcast.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Price history CSV (overrides data.prices_csv).
    #[arg(long, global = true)]
    prices: Option<PathBuf>,

    /// Model directory (overrides data.models_dir).
    #[arg(long, global = true)]
    models: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API.
    Serve {
        /// Bind address (overrides server.host).
        #[arg(long)]
        host: Option<String>,

        /// Port (overrides server.port).
        #[arg(long)]
        port: Option<u16>,
    },
    /// Predict the next day's price.
    Predict {
        #[arg(long)]
        crop: String,

        #[arg(long)]
        state: String,
    },
    /// Forecast several days ahead.
    Forecast {
        #[arg(long)]
        crop: String,

        #[arg(long)]
        state: String,

        /// Days to forecast, 1 to 30.
        #[arg(long, default_value_t = Horizon::DEFAULT)]
        days: Horizon,

        /// Print the result as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Print per-day features and raw model output.
        #[arg(long, default_value_t = false, conflicts_with = "json")]
        trace: bool,
    },
    /// Forecast every pair that has a trained model.
    ForecastAll {
        /// Days to forecast, 1 to 30.
        #[arg(long, default_value_t = Horizon::DEFAULT)]
        days: Horizon,
    },
    /// List loaded models.
    Models,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(prices) = cli.prices {
        config.data.prices_csv = prices;
    }
    if let Some(models) = cli.models {
        config.data.models_dir = models;
    }
    init_tracing(&config.logging.filter);

    match cli.command {
        Commands::Serve { host, port } => run_serve(config, host, port),
        Commands::Predict { crop, state } => run_predict(&config, &crop, &state),
        Commands::Forecast {
            crop,
            state,
            days,
            json,
            trace,
        } => run_forecast(&config, &crop, &state, days, json, trace),
        Commands::ForecastAll { days } => run_forecast_all(&config, days),
        Commands::Models => run_models(&config),
    }
}

/// `RUST_LOG` wins, then the config filter, then the built-in default.
fn init_tracing(config_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config_filter))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_forecaster(config: &AppConfig) -> Result<Forecaster> {
    let (store, _) = load_price_csv(&config.data.prices_csv).with_context(|| {
        format!(
            "loading price history from {}",
            config.data.prices_csv.display()
        )
    })?;
    let registry = ModelRegistry::from_dir(&config.data.models_dir);
    Ok(Forecaster::new(Arc::new(registry), Arc::new(store)))
}

fn run_serve(config: AppConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid bind address {host}:{port}"))?;

    let forecaster = build_forecaster(&config)?;
    // Load models before accepting requests so the first caller does not pay
    // for it and a broken model directory fails at startup.
    let models = forecaster
        .registry()
        .ensure_loaded()
        .with_context(|| format!("loading models from {}", config.data.models_dir.display()))?
        .len();
    info!(models, "models ready");

    let state = AppState::new(forecaster, config.catalog.crops);
    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    runtime
        .block_on(cropcast_server::serve(addr, state))
        .with_context(|| format!("serving on {addr}"))
}

fn run_predict(config: &AppConfig, crop: &str, state: &str) -> Result<()> {
    let forecaster = build_forecaster(config)?;
    let point = forecaster.predict_next(crop, state)?;
    println!(
        "{crop} in {state}: {:.2} {UNIT} on {}",
        point.price, point.date
    );
    Ok(())
}

fn run_forecast(
    config: &AppConfig,
    crop: &str,
    state: &str,
    days: Horizon,
    json: bool,
    trace: bool,
) -> Result<()> {
    let forecaster = build_forecaster(config)?;

    if trace {
        let steps = forecaster.trace(crop, state, days)?;
        println!(
            "{:>4} {:<12} {:>10} {:>10} {:>10} {:>10} {:>8} {:>12}",
            "Day", "Date", "lag_1", "lag_7", "ma_7", "ma_30", "std_7", "Prediction"
        );
        println!("{}", "-".repeat(82));
        for s in &steps {
            println!(
                "{:>4} {:<12} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>8.2} {:>12.4}",
                s.step,
                s.anchor.to_string(),
                s.features.lag_1,
                s.features.lag_7,
                s.features.ma_7,
                s.features.ma_30,
                s.features.std_7,
                s.raw_prediction
            );
        }
        return Ok(());
    }

    let result = forecaster.forecast(crop, state, days)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_forecast(&result);
    }
    Ok(())
}

fn print_forecast(result: &ForecastResult) {
    println!(
        "{}: {}-day forecast ({UNIT})",
        result.key,
        result.days()
    );
    println!();
    println!("{:<12} {:>12}", "Date", "Price");
    println!("{}", "-".repeat(25));
    for point in &result.points {
        println!("{:<12} {:>12.2}", point.date.to_string(), point.price);
    }
    println!();
    println!(
        "Start {:.2}  End {:.2}  Change {}  {} {}",
        result.start_price,
        result.end_price,
        format_percent(result.trend.percent_change),
        result.trend.label,
        result.trend.emoji()
    );
}

fn format_percent(percent: Option<f64>) -> String {
    match percent {
        Some(p) => format!("{p:+.2}%"),
        None => "n/a".into(),
    }
}

fn run_forecast_all(config: &AppConfig, days: Horizon) -> Result<()> {
    let forecaster = build_forecaster(config)?;
    let keys = forecaster.registry().keys()?;

    // One independent rollout per pair; each call owns its working series.
    let results: Vec<_> = keys
        .par_iter()
        .map(|key| (key, forecaster.forecast(&key.crop, &key.state, days)))
        .collect();

    println!(
        "{:<12} {:<20} {:>10} {:>10} {:>9}  {}",
        "Crop", "State", "Start", "End", "Change", "Trend"
    );
    println!("{}", "-".repeat(75));
    let mut failed = 0usize;
    for (key, outcome) in &results {
        match outcome {
            Ok(r) => println!(
                "{:<12} {:<20} {:>10.2} {:>10.2} {:>9}  {} {}",
                key.crop,
                key.state,
                r.start_price,
                r.end_price,
                format_percent(r.trend.percent_change),
                r.trend.label,
                r.trend.emoji()
            ),
            Err(e) => {
                failed += 1;
                println!("{:<12} {:<20} error: {e}", key.crop, key.state);
            }
        }
    }
    println!();
    println!(
        "{} of {} pairs forecast {} days ahead",
        results.len() - failed,
        results.len(),
        days
    );
    Ok(())
}

fn run_models(config: &AppConfig) -> Result<()> {
    let registry = ModelRegistry::from_dir(&config.data.models_dir);
    let entries = registry
        .entries()
        .with_context(|| format!("loading models from {}", config.data.models_dir.display()))?;

    if entries.is_empty() {
        println!("No models in {}", config.data.models_dir.display());
        return Ok(());
    }

    println!("Models: {}", config.data.models_dir.display());
    println!();
    println!(
        "{:<12} {:<20} {:<14} {:<14} {}",
        "Crop", "State", "Kind", "Fingerprint", "File"
    );
    println!("{}", "-".repeat(80));
    for entry in &entries {
        let file = entry
            .source
            .as_deref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!(
            "{:<12} {:<20} {:<14} {:<14} {}",
            entry.key.crop,
            entry.key.state,
            entry.model.kind(),
            &entry.fingerprint[..12],
            file
        );
    }
    Ok(())
}
