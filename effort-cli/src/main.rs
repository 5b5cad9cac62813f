//! Effortline CLI - parametric and activity-based software effort estimation

// Global invariants enforced:
// - Deterministic output ordering (results follow the order of input files)
// - Logs go to stderr; stdout carries only the rendered report

mod input;

use anyhow::Context;
use clap::{Parser, Subcommand};
use effort_core::catalog::{InMemoryCatalog, MemoryStore};
use effort_core::config::{self, ResolvedConfig};
use effort_core::estimate::{self, Estimate};
use effort_core::{report, EstimateService, FactorService, PowerMode};
use input::{ParametricInput, ProjectInput};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "effort")]
#[command(about = "Parametric and activity-based software effort estimation")]
#[command(version = env!("EFFORT_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a parametric estimate and its detailed report
    Parametric {
        /// Path to the parametric input JSON
        input: PathBuf,

        /// Hourly rate for the cost estimate (overrides config file)
        #[arg(long)]
        hourly_rate: Option<f64>,

        /// Model id (overrides the input file and config file)
        #[arg(long)]
        model: Option<String>,

        /// Use truncated repeated-multiplication exponentiation
        #[arg(long)]
        legacy_power: bool,

        /// Output format (overrides config file)
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Compute project estimates from one or more project files
    Estimate {
        /// Paths to project JSON files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Compare the two estimates instead of listing them
        #[arg(long)]
        compare: bool,

        /// Use truncated repeated-multiplication exponentiation
        #[arg(long)]
        legacy_power: bool,

        /// Output format (overrides config file)
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List the standard models, scale factors and cost drivers
    Catalog {
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
    /// Validate or show the configuration
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file
    Validate {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show the resolved configuration (merged defaults + config file)
    Show {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, PartialEq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl From<config::OutputFormat> for OutputFormat {
    fn from(format: config::OutputFormat) -> Self {
        match format {
            config::OutputFormat::Text => OutputFormat::Text,
            config::OutputFormat::Json => OutputFormat::Json,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("EFFORT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(config_path: Option<&Path>) -> anyhow::Result<ResolvedConfig> {
    let cwd = std::env::current_dir()?;
    let resolved =
        config::load_and_resolve(&cwd, config_path).context("failed to load configuration")?;
    if let Some(p) = &resolved.config_path {
        tracing::info!(path = %p.display(), "using config");
    }
    Ok(resolved)
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Parametric {
            input,
            hourly_rate,
            model,
            legacy_power,
            format,
            config: config_path,
        } => {
            let resolved = load_config(config_path.as_deref())?;

            // CLI flags override config file values
            let power_mode = if legacy_power {
                PowerMode::TruncatedLegacy
            } else {
                resolved.power_mode
            };
            let hourly_rate = hourly_rate.or(resolved.hourly_rate);
            let format = format.unwrap_or_else(|| resolved.format.into());

            let parsed: ParametricInput = input::read_json(&input)?;
            let request =
                parsed.into_request(&input::file_id(&input), model.as_deref(), &resolved.model_id);

            let catalog = InMemoryCatalog::standard();
            let (_, details) =
                effort_core::estimate_parametric(&catalog, &request, power_mode, hourly_rate)
                    .with_context(|| format!("failed to estimate {}", input.display()))?;

            match format {
                OutputFormat::Text => print!("{}", report::render_detailed_text(&details)),
                OutputFormat::Json => println!("{}", report::render_detailed_json(&details)),
            }
        }
        Commands::Estimate {
            inputs,
            compare,
            legacy_power,
            format,
            config: config_path,
        } => {
            if compare && inputs.len() != 2 {
                anyhow::bail!("--compare requires exactly two project files");
            }

            let mut resolved = load_config(config_path.as_deref())?;
            if legacy_power {
                resolved.power_mode = PowerMode::TruncatedLegacy;
            }
            let format = format.unwrap_or_else(|| resolved.format.into());

            let estimates = inputs
                .par_iter()
                .map(|path| run_project(path, &resolved))
                .collect::<anyhow::Result<Vec<_>>>()?;

            if compare {
                let cmp = estimate::compare(&estimates[0], &estimates[1]);
                match format {
                    OutputFormat::Text => print!("{}", report::render_comparison_text(&cmp)),
                    OutputFormat::Json => println!("{}", report::render_comparison_json(&cmp)),
                }
            } else {
                match format {
                    OutputFormat::Text => {
                        let rendered: Vec<String> =
                            estimates.iter().map(report::render_estimate_text).collect();
                        print!("{}", rendered.join("\n"));
                    }
                    OutputFormat::Json if estimates.len() == 1 => {
                        println!("{}", report::render_estimate_json(&estimates[0]));
                    }
                    OutputFormat::Json => {
                        println!("{}", report::render_estimates_json(&estimates));
                    }
                }
            }
        }
        Commands::Catalog { format } => {
            let catalog = InMemoryCatalog::standard();
            match format {
                OutputFormat::Text => print!("{}", report::render_catalog_text(&catalog)),
                OutputFormat::Json => {
                    let value = serde_json::json!({
                        "models": catalog.models(),
                        "scale_factors": catalog.scale_factors(),
                        "cost_drivers": catalog.cost_drivers(),
                    });
                    println!("{}", serde_json::to_string_pretty(&value)?);
                }
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Validate { path } => {
                let cwd = std::env::current_dir()?;
                match config::load_and_resolve(&cwd, path.as_deref()) {
                    Ok(config) => {
                        if let Some(ref p) = config.config_path {
                            println!("Config valid: {}", p.display());
                        } else {
                            println!("No config file found. Using defaults.");
                        }
                    }
                    Err(e) => {
                        eprintln!("Config validation failed: {:#}", e);
                        std::process::exit(1);
                    }
                }
            }
            ConfigAction::Show { path } => {
                let resolved = load_config(path.as_deref())?;

                println!("Configuration:");
                if let Some(ref p) = resolved.config_path {
                    println!("  Source: {}", p.display());
                } else {
                    println!("  Source: defaults (no config file found)");
                }
                println!();
                println!("  model: {}", resolved.model_id);
                println!(
                    "  hourly_rate: {}",
                    resolved
                        .hourly_rate
                        .map(|v| v.to_string())
                        .unwrap_or_else(|| "none".to_string())
                );
                println!("  power_mode: {}", resolved.power_mode.as_str());
                println!(
                    "  format: {}",
                    match resolved.format {
                        config::OutputFormat::Text => "text",
                        config::OutputFormat::Json => "json",
                    }
                );
            }
        },
    }

    Ok(())
}

/// Build the catalog for one project file and run its estimate
fn run_project(path: &Path, resolved: &ResolvedConfig) -> anyhow::Result<Estimate> {
    let project: ProjectInput = input::read_json(path)?;
    let store = MemoryStore::new();

    let factors = FactorService::new(&store);
    for factor in &project.factors {
        factors
            .create(factor)
            .with_context(|| format!("invalid factor {:?} in {}", factor.id, path.display()))?;
    }

    let catalog = InMemoryCatalog::standard().with_processes(project.processes.clone());

    let request = project.request(&input::file_id(path), &resolved.model_id);
    EstimateService::new(&catalog, &store)
        .with_power_mode(resolved.power_mode)
        .create(&request)
        .with_context(|| format!("failed to estimate {}", path.display()))
}
