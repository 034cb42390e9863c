//! Realty CLI Module
//!
//! Command-line interface for training, prediction and schema inspection.

use clap::{Args, Parser, Subcommand};
use colored::*;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use crate::config::WorkflowConfig;
use crate::workflow::{run_inspection, run_prediction, run_training};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
    let _ = std::io::stdout().flush();
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn field(key: &str, val: impl std::fmt::Display) {
    println!("  {:<14} {}", muted(key), val.to_string().white());
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "realty")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Train and serve a real-estate price regressor")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Where to read inputs from and where artifacts go
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Dataset CSV (http(s) URL or local path)
    #[arg(long)]
    pub data_url: Option<String>,

    /// Schema report JSON (http(s) URL or local path)
    #[arg(long)]
    pub report_url: Option<String>,

    /// Project root (default: nearest ancestor with a project marker)
    #[arg(long)]
    pub root: Option<PathBuf>,
}

impl SourceArgs {
    /// Apply the flags on top of the default configuration
    pub fn into_config(self) -> WorkflowConfig {
        let mut config = WorkflowConfig::default();
        if let Some(data) = self.data_url {
            config = config.with_data_location(data);
        }
        if let Some(report) = self.report_url {
            config = config.with_report_location(report);
        }
        if let Some(root) = self.root {
            config = config.with_root(root);
        }
        config
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Train every candidate, keep the lowest-RMSE one
    Train {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Load the saved model and predict the first dataset row
    Predict {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Show the resolved schema and the last run's artifacts
    Inspect {
        #[command(flatten)]
        source: SourceArgs,
    },
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_train(config: &WorkflowConfig) -> anyhow::Result<()> {
    section("Train");

    step_run(&format!("Training {} candidates", config.candidates.len()));
    let start = Instant::now();
    let report = run_training(config)?;
    step_done(&format!("{:?}", start.elapsed()));

    field("Target", &report.target);
    field("Features", report.features.len());
    field("Split", format!("{} train / {} test", report.n_train, report.n_test));

    println!();
    println!(
        "  {:<22} {:>12} {:>12} {:>8}",
        muted("Modelo"),
        muted("MAE"),
        muted("RMSE"),
        muted("R2")
    );
    println!("  {}", dim(&"─".repeat(56)));
    for (rank, record) in report.ranking.iter().enumerate() {
        let name = if rank == 0 {
            record.name.green().bold()
        } else {
            record.name.white()
        };
        println!(
            "  {:<22} {:>12.4} {:>12.4} {:>8.4}",
            name, record.mae, record.rmse, record.r2
        );
    }

    println!();
    field("Best", report.best_model.green().bold());
    field("Model", report.model_path.display());
    if let Some(backup) = &report.backup_path {
        field("Backup", backup.display());
    }
    field("Comparison", report.comparison_path.display());
    field("Metrics", report.metrics_path.display());
    println!();

    Ok(())
}

pub fn cmd_predict(config: &WorkflowConfig) -> anyhow::Result<()> {
    section("Predict");

    step_run("Scoring the first row");
    let start = Instant::now();
    let outcome = run_prediction(config)?;
    step_done(&format!("{:?}", start.elapsed()));

    field("Model", outcome.model_path.display());
    field("Trained", format!("{} ({})", outcome.metadata.name, outcome.metadata.trained_at));
    field("Target", &outcome.target);
    println!();
    println!("  {}", muted("Example row"));
    println!("{}", outcome.example);
    println!();
    println!(
        "  {:<14} {}",
        muted("Prediction"),
        format!("{:.2}", outcome.prediction).white().bold()
    );
    println!();

    Ok(())
}

pub fn cmd_inspect(config: &WorkflowConfig) -> anyhow::Result<()> {
    section("Inspect");

    let info = run_inspection(config)?;

    field("Root", info.root.display());
    field("Rows", info.n_rows);
    field("Columns", info.n_cols);
    field(
        "Schema",
        if info.report_used { "from report" } else { "fallback" },
    );
    field(
        "Target",
        if info.target_present {
            info.target.white()
        } else {
            format!("{} (absent)", info.target).yellow()
        },
    );
    field("Numeric", info.numeric.join(", "));
    field("Categorical", info.categorical.join(", "));

    section("Artifacts");
    match &info.model {
        Some(meta) => {
            field("Model", &meta.name);
            field("Trained at", &meta.trained_at);
            field("RMSE", format!("{:.4}", meta.metrics.rmse));
        }
        None => println!("  {}", dim("no model yet, run `realty train`")),
    }
    if let Some(summary) = &info.last_metrics {
        field("Last summary", format!("{} @ {}", summary.best_model, summary.generated_at));
    }
    println!();

    Ok(())
}
