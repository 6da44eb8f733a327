/// Offline harness: summarises a JSON batch of weather-code series with a
/// configured (or the built-in UK) modal summary and prints one code per point.

use std::fs;

use anyhow::{bail, Context, Result};
use chrono::TimeDelta;
use clap::Parser;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use wxmodal_core::decision_tree::check_leaves;
use wxmodal_core::{presets, Leaf, ModalConfig, ModalFromGroupings, Step, TimeSeries};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "wxmodal-test", about = "Offline modal weather-code summary runner")]
struct Args {
    /// Path to a batch JSON file: {"period_seconds": N, "points": [...]}.
    #[arg(short, long)]
    input: Option<String>,

    /// Path to a ModalConfig JSON file. Defaults to the built-in UK preset.
    #[arg(short, long)]
    config: Option<String>,

    /// Merge UK intensity variants before selection (preset only).
    #[arg(long)]
    intensity: bool,

    /// Check the configured decision tree and exit.
    #[arg(long)]
    check_tree: bool,
}

// ── Batch file ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct BatchFile {
    /// Default step duration for points that do not give their own.
    period_seconds: i64,
    points: Vec<PointRecord>,
}

#[derive(Debug, Deserialize)]
struct PointRecord {
    #[serde(default)]
    period_seconds: Option<i64>,
    steps: Vec<Step>,
}

impl BatchFile {
    fn into_series(self) -> Result<Vec<TimeSeries>> {
        let default = self.period_seconds;
        self.points
            .into_iter()
            .enumerate()
            .map(|(i, p)| {
                let secs = p.period_seconds.unwrap_or(default);
                if secs <= 0 {
                    bail!("point {i}: period must be positive, got {secs}s");
                }
                let period = TimeDelta::try_seconds(secs)
                    .with_context(|| format!("point {i}: period {secs}s out of range"))?;
                Ok(TimeSeries::new(period, p.steps))
            })
            .collect()
    }
}

fn load_config(args: &Args) -> Result<ModalConfig> {
    let Some(path) = &args.config else {
        let mut config = presets::uk_config();
        if args.intensity {
            config.intensity_groups = Some(presets::uk_intensity_groups());
        }
        return Ok(config);
    };
    if args.intensity {
        tracing::warn!("--intensity only applies to the built-in preset; using {path} as is");
    }
    let text = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    ModalConfig::from_json(&text).with_context(|| format!("parsing {path}"))
}

/// Just the leaves of a config document, unchecked.
#[derive(Debug, Deserialize)]
struct LeavesOnly {
    decision_tree: Vec<Leaf>,
}

fn leaves_from_json(text: &str) -> Result<Vec<Leaf>> {
    let doc: LeavesOnly = serde_json::from_str(text)?;
    Ok(doc.decision_tree)
}

fn load_leaves(args: &Args) -> Result<Vec<Leaf>> {
    let Some(path) = &args.config else {
        return Ok(presets::uk_leaves());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    leaves_from_json(&text).with_context(|| format!("parsing decision tree in {path}"))
}

fn load_batch(path: &str) -> Result<Vec<TimeSeries>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let batch: BatchFile =
        serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?;
    batch.into_series()
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // Checked before the config is built, which would stop at the first issue.
    if args.check_tree {
        let leaves = load_leaves(&args)?;
        let issues = check_leaves(&leaves);
        if issues.is_empty() {
            println!("Decision tree OK ({} leaves)", leaves.len());
            return Ok(());
        }
        for issue in &issues {
            eprintln!("  {issue}");
        }
        bail!("decision tree has {} issue(s)", issues.len());
    }

    let config = load_config(&args)?;

    let Some(path) = args.input.as_deref() else {
        eprintln!("No input specified. Use --help for usage.");
        return Ok(());
    };

    let batch = load_batch(path)?;
    let modal = ModalFromGroupings::from_config(config).context("building modal summary")?;
    let codes = modal
        .process(&batch)
        .with_context(|| format!("summarising {} point(s) from {path}", batch.len()))?;

    println!("{}", serde_json::to_string(&codes)?);
    Ok(())
}
