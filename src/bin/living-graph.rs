//! Command-line host: inspect presets and drive them against a console sink.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use living_graph_core::dsp::sampler::Tuning;
use living_graph_core::host::Host;
use living_graph_core::preset::{Catalog, ParameterKind};
use living_graph_core::scale::ScaleTable;
use living_graph_core::session::Session;
use living_graph_core::settings::Settings;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "living-graph")]
#[command(about = "Animate force-graph parameters with periodic waveforms", long_about = None)]
struct Cli {
    /// Preset catalog JSON (defaults to the built-in catalog)
    #[arg(short, long, global = true)]
    catalog: Option<PathBuf>,

    /// Settings file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List preset names
    List,
    /// Show the sampling plan of every sampler in a preset
    Plan { preset: String },
    /// Print one period of samples for each sampler in a preset
    Sample {
        preset: String,
        /// Print at most this many samples per sampler
        #[arg(short = 'n', long, default_value = "32")]
        count: usize,
    },
    /// Persist the active preset
    Select { preset: String },
    /// Run the active (or given) preset against console targets
    Run {
        /// Switch to this preset first (persisted)
        #[arg(short, long)]
        preset: Option<String>,
        /// Stop after this many seconds; runs until Ctrl-C when omitted
        #[arg(long)]
        seconds: Option<f64>,
        /// Exclude local graph views
        #[arg(long)]
        no_local: bool,
    },
}

/// Prints every delivery instead of driving a real graph.
struct ConsoleHost;

impl Host for ConsoleHost {
    type Target = String;

    fn apply(&self, kind: ParameterKind, value: f64, targets: &[String]) {
        info!(%kind, value = format_args!("{value:.4}"), targets = ?targets, "deliver");
    }

    fn resolve_targets(&self, include_secondary: bool) -> Vec<String> {
        let mut targets = vec!["graph".to_string()];
        if include_secondary {
            targets.push("localgraph".to_string());
        }
        targets
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let catalog = match &cli.catalog {
        Some(path) => Catalog::load(path)?,
        None => Catalog::builtin()?,
    };
    let settings_path = match cli.settings {
        Some(path) => path,
        None => Settings::default_path()?,
    };

    match cli.command {
        Commands::List => {
            for name in catalog.names() {
                println!("{name}");
            }
        }
        Commands::Plan { preset } => {
            let tuning = Settings::load(&settings_path)?.tuning;
            for e in catalog.evaluators(&preset, &ScaleTable::default(), &tuning)? {
                let plan = e.plan();
                let (lower, upper) = e.bounds();
                println!(
                    "{:<14} [{lower:>8.3}, {upper:>8.3}]  period {:>9.1} ms  {:>2} upd/s  {:>4} samples  {}",
                    e.kind().as_str(),
                    plan.period_ms,
                    plan.updates_per_second,
                    plan.sample_count,
                    if plan.memoized { "memoized" } else { "live" },
                );
            }
        }
        Commands::Sample { preset, count } => {
            for e in catalog.evaluators(&preset, &ScaleTable::default(), &Tuning::default())? {
                let samples = e.period_samples();
                let shown: Vec<String> = samples.iter().take(count).map(|v| format!("{v:.4}")).collect();
                println!("{}: {}", e.kind(), shown.join(" "));
            }
        }
        Commands::Select { preset } => {
            let mut session = Session::open(Arc::new(ConsoleHost), catalog, settings_path)?;
            session.choose_preset(&preset)?;
            println!("active preset: {preset}");
            session.close();
        }
        Commands::Run { preset, seconds, no_local } => {
            let mut session = Session::open(Arc::new(ConsoleHost), catalog, settings_path)?;
            if let Some(name) = preset {
                session.choose_preset(&name)?;
            }
            if no_local {
                session.set_include_local(false)?;
            }
            session.toggle();

            match seconds {
                Some(s) => tokio::time::sleep(Duration::from_secs_f64(s.max(0.0))).await,
                None => tokio::signal::ctrl_c().await?,
            }
            session.close();
        }
    }

    Ok(())
}
