//! Car Rental Feedback Analyzer CLI
//!
//! The `feedback` command classifies customer reviews with a watsonx.ai
//! hosted model.
//!
//! ## Commands
//!
//! - `analyze`: Classify a single review
//! - `preview`: Show the columns and first rows of a CSV file
//! - `batch`: Classify every review in a CSV column, then export CSV and PDF

mod progress;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use feedback_core::{
    aggregate, obs, write_results, BatchConfig, BatchRunner, ClassificationResult, Classifier,
    DistributionStats, InferenceService, ReviewTable, REPORT_FILE_NAME, RESULTS_FILE_NAME,
};
use feedback_report::ReportGenerator;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};
use watsonx_client::{
    ConfigError, WatsonxClient, WatsonxConfig, DEFAULT_IAM_URL, DEFAULT_MODEL_ID, ENV_API_KEY,
    ENV_PROJECT_ID, ENV_URL,
};

use crate::progress::BatchProgress;

#[derive(Parser)]
#[command(name = "feedback")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Car rental customer feedback analyzer (watsonx.ai)", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(flatten)]
    watsonx: WatsonxArgs,

    #[command(subcommand)]
    command: Commands,
}

/// watsonx.ai connection settings; each falls back to its environment variable
#[derive(Args, Debug, Clone)]
struct WatsonxArgs {
    /// watsonx.ai service URL
    #[arg(long, env = "WATSONX_URL", global = true)]
    watsonx_url: Option<String>,

    /// IBM Cloud API key
    #[arg(long, env = "IBM_CLOUD_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// watsonx.ai project id
    #[arg(long, env = "WATSONX_PROJECT_ID", global = true)]
    project_id: Option<String>,

    /// Model identifier
    #[arg(long, env = "WATSONX_MODEL_ID", default_value = DEFAULT_MODEL_ID, global = true)]
    model_id: String,

    /// IBM Cloud IAM base URL
    #[arg(long, env = "WATSONX_IAM_URL", default_value = DEFAULT_IAM_URL, global = true)]
    iam_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "WATSONX_TIMEOUT_SECS", default_value_t = 60, global = true)]
    timeout_secs: u64,
}

impl WatsonxArgs {
    fn into_config(self) -> std::result::Result<WatsonxConfig, ConfigError> {
        let required = |value: Option<String>, var: &'static str| {
            value
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(var))
        };

        let config = WatsonxConfig::new(
            required(self.watsonx_url, ENV_URL)?,
            required(self.api_key, ENV_API_KEY)?,
            required(self.project_id, ENV_PROJECT_ID)?,
        )
        .with_model_id(self.model_id)
        .with_iam_url(self.iam_url)
        .with_timeout(Duration::from_secs(self.timeout_secs));

        config.validate()?;
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a single review
    Analyze {
        /// Review text, or `-` to read it from stdin
        text: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show the columns and first rows of a CSV file
    Preview {
        /// CSV file with a header row
        csv: PathBuf,

        /// Number of rows to show
        #[arg(short, long, default_value = "5")]
        rows: usize,
    },

    /// Classify every review in a CSV column and export the results
    Batch {
        /// CSV file with a header row
        csv: PathBuf,

        /// Column containing the review text
        #[arg(short, long)]
        column: String,

        /// Directory for the exported files
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// File name of the results CSV
        #[arg(long, default_value = RESULTS_FILE_NAME)]
        csv_name: String,

        /// File name of the PDF report
        #[arg(long, default_value = REPORT_FILE_NAME)]
        pdf_name: String,

        /// Delay between reviews, in milliseconds
        #[arg(long, default_value_t = 500)]
        pacing_ms: u64,

        /// Skip the PDF report
        #[arg(long)]
        no_report: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Batch options after argument parsing.
#[derive(Debug, Clone)]
struct BatchOptions {
    column: String,
    out_dir: PathBuf,
    csv_name: String,
    pdf_name: String,
    pacing: Duration,
    report: bool,
    show_progress: bool,
}

/// Files written by a batch run.
#[derive(Debug)]
struct BatchOutputs {
    results_csv: PathBuf,
    report_pdf: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    feedback_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::Analyze { text, format } => {
            let inference = connect(cli.watsonx).await?;
            let review = read_review(&text)?;
            cmd_analyze(inference, &review, format).await
        }
        Commands::Preview { csv, rows } => cmd_preview(&csv, rows),
        Commands::Batch {
            csv,
            column,
            out_dir,
            csv_name,
            pdf_name,
            pacing_ms,
            no_report,
        } => {
            let inference = connect(cli.watsonx).await?;
            let options = BatchOptions {
                column,
                out_dir,
                csv_name,
                pdf_name,
                pacing: Duration::from_millis(pacing_ms),
                report: !no_report,
                show_progress: !cli.json,
            };
            cmd_batch(inference, &csv, &options).await.map(|_| ())
        }
    }
}

/// Build the watsonx.ai client once and verify the credentials.
async fn connect(args: WatsonxArgs) -> Result<Arc<dyn InferenceService>> {
    let config = args
        .into_config()
        .context("Invalid watsonx.ai configuration")?;
    info!(model_id = %config.model_id, url = %config.url, "connecting to watsonx.ai");

    let client = WatsonxClient::new(config).context("Failed to create watsonx.ai client")?;
    client
        .authenticate()
        .await
        .context("Failed to authenticate with IBM Cloud")?;

    let client: Arc<dyn InferenceService> = Arc::new(client);
    Ok(client)
}

fn read_review(text: &str) -> Result<String> {
    if text != "-" {
        return Ok(text.to_string());
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read review from stdin")?;
    Ok(buf)
}

/// Classify a single review
async fn cmd_analyze(
    inference: Arc<dyn InferenceService>,
    review: &str,
    format: OutputFormat,
) -> Result<()> {
    let classifier = Classifier::new(inference);
    let result = classifier
        .analyze_single(review)
        .await
        .context("Failed to analyze review")?;

    match format {
        OutputFormat::Text => println!("{}", render_single(&result)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }
    Ok(())
}

fn render_single(result: &ClassificationResult) -> String {
    match result.issue() {
        Some(issue) => format!(
            "Sentiment: {}\nIssue:     {}",
            result.sentiment().label(),
            issue
        ),
        None => format!("Sentiment: {}", result.sentiment().label()),
    }
}

/// Show the columns and first rows of a CSV file
fn cmd_preview(path: &Path, rows: usize) -> Result<()> {
    let table =
        ReviewTable::from_path(path).with_context(|| format!("Failed to read {:?}", path))?;

    println!("Columns: {}", table.columns().join(", "));
    println!("Rows:    {}", table.len());
    println!();
    for (idx, row) in table.preview(rows).iter().enumerate() {
        println!("{:>4}  {}", idx + 1, row.join(" | "));
    }
    Ok(())
}

/// Classify every review in a CSV column, then write the CSV and PDF
async fn cmd_batch(
    inference: Arc<dyn InferenceService>,
    path: &Path,
    options: &BatchOptions,
) -> Result<BatchOutputs> {
    let table =
        ReviewTable::from_path(path).with_context(|| format!("Failed to read {:?}", path))?;
    let reviews = table
        .reviews(&options.column)
        .with_context(|| format!("Cannot use column '{}'", options.column))?;
    info!(reviews = reviews.len(), column = %options.column, "starting batch analysis");

    let classifier = Classifier::new(Arc::clone(&inference));
    let runner = BatchRunner::new(&classifier, BatchConfig::default().with_pacing(options.pacing));
    let mut progress = if options.show_progress {
        BatchProgress::bar(reviews.len())
    } else {
        BatchProgress::hidden()
    };

    let results = match runner.run(&reviews, &mut progress).await {
        Ok(results) => {
            progress.finish_ok("Batch analysis complete!");
            results
        }
        Err(err) => {
            progress.finish_err("Batch analysis failed");
            return Err(err).context("Batch analysis failed");
        }
    };

    let stats = aggregate(&results);
    obs::emit_stats_computed(stats.total, stats.negative_total);
    print_results(&results, &stats);

    std::fs::create_dir_all(&options.out_dir)
        .with_context(|| format!("Failed to create {:?}", options.out_dir))?;

    let results_csv = options.out_dir.join(&options.csv_name);
    let file = std::fs::File::create(&results_csv)
        .with_context(|| format!("Failed to create {:?}", results_csv))?;
    let mut writer = BufWriter::new(file);
    write_results(&mut writer, &results)
        .with_context(|| format!("Failed to write {:?}", results_csv))?;
    writer.flush()?;
    println!("Results written to {}", results_csv.display());

    let report_pdf = if options.report {
        let report = ReportGenerator::new(inference)
            .generate(&results, &stats)
            .await
            .context("Failed to generate summary report")?;
        let path = options.out_dir.join(&options.pdf_name);
        std::fs::write(&path, report.as_bytes())
            .with_context(|| format!("Failed to write {:?}", path))?;
        println!("Report written to {}", path.display());
        Some(path)
    } else {
        None
    };

    Ok(BatchOutputs {
        results_csv,
        report_pdf,
    })
}

fn print_results(results: &[ClassificationResult], stats: &DistributionStats) {
    println!("Analysis Results");
    for (idx, result) in results.iter().enumerate() {
        println!(
            "{:>4}  {:<10} {:<28} {}",
            idx + 1,
            result.sentiment().label(),
            result.issue_label(),
            truncate(result.review(), 60)
        );
    }
    println!();
    for line in distribution_lines(stats) {
        println!("{line}");
    }
}

fn distribution_lines(stats: &DistributionStats) -> Vec<String> {
    let mut lines = vec![format!("Total reviews: {}", stats.total)];
    for share in &stats.sentiment {
        lines.push(format!(
            "  {:<10} {:>4}  {:>5.1}%",
            share.label, share.count, share.percent
        ));
    }
    if !stats.issues.is_empty() {
        lines.push(format!("Negative issues ({}):", stats.negative_total));
        for share in &stats.issues {
            lines.push(format!(
                "  {:<28} {:>4}  {:>5.1}%",
                share.label, share.count, share.percent
            ));
        }
    }
    lines
}

fn truncate(text: &str, max_chars: usize) -> String {
    let single_line = text.replace(['\n', '\r'], " ");
    if single_line.chars().count() <= max_chars {
        return single_line;
    }
    let mut out: String = single_line.chars().take(max_chars.saturating_sub(3)).collect();
    out.push_str("...");
    out
}
