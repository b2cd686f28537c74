use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use maskcal::calib::solve_two_point;
use maskcal::{Document, EngineCfg, Snapshot};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

mod io;
mod measure;
mod provenance;
mod script;

use provenance::Payload;

#[derive(Parser)]
#[command(name = "maskcal", version)]
#[command(about = "Headless mask drawing, calibration and measurement")]
struct Cmd {
    /// Engine config JSON; missing fields keep their defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// -v info, -vv debug, -vvv trace (RUST_LOG wins when set)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Solve a two-point scale and print it as JSON
    Calibrate {
        /// First endpoint, image pixels "X,Y"
        #[arg(long, value_parser = io::parse_point)]
        p1: maskcal::Point,
        #[arg(long, value_parser = io::parse_point)]
        p2: maskcal::Point,
        /// Real distance between the endpoints, meters
        #[arg(long)]
        length: f64,
    },
    /// Drive a JSON step script through a fresh document and save the snapshot
    Replay {
        #[arg(long)]
        script: PathBuf,
        /// Continue from a saved snapshot instead of an empty document
        #[arg(long)]
        from: Option<PathBuf>,
        /// Seed for reproducible mask ids
        #[arg(long)]
        seed: Option<u64>,
        /// Snapshot output; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Compute metrics and per-material totals for a saved snapshot
    Measure {
        #[arg(long)]
        snapshot: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print version and effective configuration
    Report,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    init_logging(cmd.verbose);
    let cfg = io::load_cfg(cmd.config.as_deref())?;
    match cmd.action {
        Action::Calibrate { p1, p2, length } => calibrate(p1, p2, length),
        Action::Replay {
            script,
            from,
            seed,
            out,
        } => replay(&cfg, &script, from.as_deref(), seed, out.as_deref()),
        Action::Measure { snapshot, out } => measure(&cfg, &snapshot, out.as_deref()),
        Action::Report => report(&cfg),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    SubscriberBuilder::default()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn calibrate(p1: maskcal::Point, p2: maskcal::Point, length_m: f64) -> Result<()> {
    let cal = solve_two_point(p1, p2, length_m).context("two-point calibration")?;
    tracing::info!(pixels_per_meter = cal.pixels_per_meter(), "calibrated");
    println!("{}", serde_json::to_string_pretty(&cal)?);
    Ok(())
}

fn replay(
    cfg: &EngineCfg,
    script: &Path,
    from: Option<&Path>,
    seed: Option<u64>,
    out: Option<&Path>,
) -> Result<()> {
    let steps: Vec<script::Step> = io::read_json(script)?;
    let mut doc = match (from, seed) {
        (Some(path), seed) => {
            let snap: Snapshot = io::read_json(path)?;
            match seed {
                Some(seed) => Document::from_snapshot_seeded(snap, *cfg, seed),
                None => Document::from_snapshot(snap, *cfg),
            }
            .with_context(|| format!("loading {}", path.display()))?
        }
        (None, Some(seed)) => Document::with_seed(*cfg, seed),
        (None, None) => Document::new(*cfg),
    };
    script::replay(&mut doc, &steps)?;
    let snapshot = doc.snapshot();
    emit(
        &snapshot,
        out,
        Payload {
            command: "replay",
            cfg,
            params: json!({ "script": script, "from": from, "seed": seed, "steps": steps.len() }),
        },
    )
}

fn measure(cfg: &EngineCfg, snapshot: &Path, out: Option<&Path>) -> Result<()> {
    let snap: Snapshot = io::read_json(snapshot)?;
    let mut doc = Document::from_snapshot(snap, *cfg)
        .with_context(|| format!("loading {}", snapshot.display()))?;
    let measurement = measure::measure(&mut doc)?;
    if measurement.totals.is_none() {
        tracing::warn!("snapshot has no calibration; metrics are empty");
    }
    emit(
        &measurement,
        out,
        Payload {
            command: "measure",
            cfg,
            params: json!({ "snapshot": snapshot }),
        },
    )
}

fn report(cfg: &EngineCfg) -> Result<()> {
    let obj = json!({
        "engine_version": maskcal::VERSION,
        "code_rev": provenance::code_rev(),
        "config": cfg,
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

/// Write to `out` with a provenance sidecar, or print to stdout.
fn emit<T: serde::Serialize>(value: &T, out: Option<&Path>, payload: Payload<'_>) -> Result<()> {
    match out {
        Some(path) => {
            io::write_json(path, value)?;
            provenance::write_sidecar(path, payload)?;
            tracing::info!(out = %path.display(), "written");
        }
        None => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}
