use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use review_trends::config::AppConfig;
use review_trends::dataset::{load_dataset, resolve_source};
use review_trends::export::export_tables;
use review_trends::logging::{init_logging, OperationTimer};
use review_trends::models::OutputFormat;
use review_trends::pipeline::PipelineService;
use review_trends::validation::InputValidator;
use review_trends::PipelineError;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and export both aggregate tables
    Process {
        /// Path to the reviews CSV (overrides config)
        #[arg(short, long)]
        input: Option<String>,

        /// Output directory for the exported tables
        #[arg(short, long)]
        output_dir: Option<String>,

        /// Output format (csv or json)
        #[arg(short, long)]
        format: Option<String>,

        /// Bypass the persistent aggregate cache
        #[arg(long)]
        no_cache: bool,
    },
    /// Classify a single product name with the trained model
    Predict {
        /// Product name or title to classify
        #[arg(short, long)]
        text: String,

        /// Path to the reviews CSV (overrides config)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Resolve and print the dataset's column mapping
    Schema {
        /// Path to the reviews CSV (overrides config)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Wipe the persistent aggregate cache
    ClearCache,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Warning: failed to load configuration ({e}); using defaults");
        AppConfig::default()
    });

    init_logging(
        Some(&config.get_log_level()),
        config.logging.file_path.as_deref().map(Path::new),
    )?;

    match cli.command {
        Commands::Process {
            input,
            output_dir,
            format,
            no_cache,
        } => {
            if let Some(input) = input {
                InputValidator::validate_dataset_path(Path::new(&input))?;
                config.dataset.path = input;
            }
            if let Some(dir) = output_dir {
                InputValidator::validate_output_dir(&dir)?;
                config.export.output_directory = dir;
            }
            if let Some(format) = format {
                config.export.default_format = format;
            }
            if no_cache {
                config.cache.enabled = false;
            }
            run_process(&config)
        }
        Commands::Predict { text, input } => {
            if let Some(input) = input {
                InputValidator::validate_dataset_path(Path::new(&input))?;
                config.dataset.path = input;
            }
            run_predict(&config, &text)
        }
        Commands::Schema { input } => {
            if let Some(input) = input {
                InputValidator::validate_dataset_path(Path::new(&input))?;
                config.dataset.path = input;
            }
            run_schema(&config)
        }
        Commands::ClearCache => {
            config.cache.enabled = true;
            let service = PipelineService::new(config)?;
            service.clear()?;
            info!("Cache cleared");
            Ok(())
        }
    }
}

/// Run the batch pipeline and export both tables.
fn run_process(config: &AppConfig) -> Result<()> {
    let format: OutputFormat = config
        .export
        .default_format
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let output_dir = PathBuf::from(&config.export.output_directory);

    let timer = OperationTimer::new("pipeline");
    let service = PipelineService::new(config.clone())?;
    let result = match service.process() {
        Ok(result) => result,
        Err(e @ (PipelineError::Schema(_) | PipelineError::SourceUnavailable(_))) => {
            // Fatal pipeline errors surface a clear message; downstream
            // consumers get empty tables rather than a crash.
            error!("Pipeline failed: {e}");
            eprintln!("Pipeline failed: {e}");
            eprintln!("No data available; exporting empty tables.");
            let empty = review_trends::pipeline::PipelineResult {
                categories: Vec::new(),
                claims: Vec::new(),
                dropped_rows: 0,
                skipped_rows: 0,
                classifier: None,
                schema_report: String::new(),
            };
            export_tables(&empty, &output_dir, format)?;
            std::process::exit(1);
        }
        Err(e) => return Err(e).context("pipeline run failed"),
    };
    timer.finish();

    info!(schema = result.schema_report, "Pipeline complete");
    info!(
        category_rows = result.categories.len(),
        claim_rows = result.claims.len(),
        dropped_rows = result.dropped_rows,
        skipped_rows = result.skipped_rows,
        "Aggregate tables ready"
    );
    match &result.classifier {
        Some(model) => info!(
            accuracy = format!("{:.2}", model.holdout_accuracy()),
            "Classifier available"
        ),
        None => warn!("No classifier trained; categories come from keyword heuristics"),
    }

    let files = export_tables(&result, &output_dir, format)?;
    for file in files {
        info!(file = %file.display(), "Exported table");
    }
    Ok(())
}

/// Train (or reuse) the pipeline and classify one ad hoc string.
fn run_predict(config: &AppConfig, text: &str) -> Result<()> {
    InputValidator::validate_prediction_input(text)?;
    let text = InputValidator::sanitize_text(text);
    let service = PipelineService::new(config.clone())?;
    let result = service.process().context("pipeline run failed")?;

    match &result.classifier {
        Some(model) => {
            let category = model.predict_one(&text)?;
            info!(input = text, category, "Prediction");
            println!("{category}");
        }
        None => {
            warn!("No model available; falling back to keyword heuristics");
            let category = review_trends::labeler::heuristic_label(&text, None, None);
            println!("{category}");
        }
    }
    Ok(())
}

/// Resolve and print the column mapping without running the pipeline.
fn run_schema(config: &AppConfig) -> Result<()> {
    let path = resolve_source(&config.get_dataset_path())?;
    let dataset = load_dataset(&path, config.dataset.rating_scale_max)?;
    println!("{}", dataset.schema.report());
    Ok(())
}
