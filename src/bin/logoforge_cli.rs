//! LogoForge CLI - Bridge interface for scripted callers
//!
//! Commands: algorithms, generate, generate-all, hash, ledger
//! Outputs JSON to stdout, logs to stderr
//! Returns non-zero on invalid input or I/O failure

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use logoforge_core::{
    Algorithm, FileStorage, GeneratedLogo, GeneratorConfig, HashLedger, LogoGenerationParams,
    LogoGenerator,
};

#[derive(Parser)]
#[command(name = "logoforge-cli")]
#[command(about = "LogoForge CLI - Deterministic vector-mark generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a JSON generator config
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory for the persistent dedup ledger
    #[arg(long, global = true)]
    ledger_dir: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Args)]
struct BrandArgs {
    /// Brand name
    #[arg(short, long)]
    brand: String,

    /// Primary color (hex)
    #[arg(short, long)]
    primary: String,

    /// Accent color (hex)
    #[arg(long)]
    accent: Option<String>,

    /// Variants per algorithm
    #[arg(long)]
    variations: Option<u32>,

    /// Seed string (defaults to the brand name)
    #[arg(long)]
    seed: Option<String>,

    /// Industry hint
    #[arg(long)]
    category: Option<String>,

    /// Early-exit score for candidate selection
    #[arg(long)]
    min_quality: Option<f64>,

    /// Also write each document to `<dir>/<algorithm>-v<variant>.svg`
    #[arg(long)]
    svg_dir: Option<PathBuf>,
}

impl BrandArgs {
    fn params(&self) -> LogoGenerationParams {
        LogoGenerationParams {
            brand_name: self.brand.clone(),
            primary_color: self.primary.clone(),
            accent_color: self.accent.clone(),
            variations: self.variations,
            seed: self.seed.clone(),
            category: self.category.clone(),
            min_quality_score: self.min_quality,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List algorithm names and construction patterns
    Algorithms,

    /// Generate variants for one algorithm
    Generate {
        /// Algorithm name
        #[arg(short, long)]
        algorithm: String,

        #[command(flatten)]
        input: BrandArgs,
    },

    /// Generate variants for every algorithm
    GenerateAll {
        #[command(flatten)]
        input: BrandArgs,
    },

    /// Print the identity hash of one variant
    Hash {
        #[arg(short, long)]
        brand: String,

        #[arg(short, long)]
        algorithm: String,

        /// 1-based variant number
        #[arg(long, default_value_t = 1)]
        variant: u32,

        #[arg(long)]
        seed: Option<String>,
    },

    /// Inspect or reset the dedup ledger
    Ledger {
        #[command(subcommand)]
        action: LedgerAction,
    },
}

#[derive(Subcommand)]
enum LedgerAction {
    /// Record count, capacity and optional per-brand history
    Stats {
        #[arg(short, long)]
        brand: Option<String>,
    },
    /// Forget every record
    Clear,
}

fn init_tracing(json: bool, level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr).json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
            .ok();
    }
}

fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => fail(&format!("Serialization failed: {}", e)),
    }
}

fn fail(message: &str) -> ExitCode {
    let output = serde_json::json!({ "success": false, "error": message });
    println!("{}", output);
    ExitCode::FAILURE
}

fn open_ledger(dir: &Path, capacity: usize) -> Result<HashLedger, String> {
    let storage = FileStorage::new(dir).map_err(|e| format!("Failed to open ledger: {}", e))?;
    Ok(HashLedger::with_capacity(Arc::new(storage), capacity))
}

fn write_svgs(dir: &Path, logos: &[GeneratedLogo]) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    for logo in logos {
        let path = dir.join(format!("{}-v{}.svg", logo.algorithm, logo.variant));
        fs::write(path, &logo.svg)?;
    }
    Ok(())
}

fn emit_logos(logos: Vec<GeneratedLogo>, svg_dir: Option<&Path>) -> ExitCode {
    if let Some(dir) = svg_dir {
        if let Err(e) = write_svgs(dir, &logos) {
            return fail(&format!("Failed to write documents: {}", e));
        }
    }
    print_json(&serde_json::json!({ "success": true, "logos": logos }))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.json_logs, if cli.verbose { Level::DEBUG } else { Level::WARN });

    let config = match &cli.config {
        Some(path) => match GeneratorConfig::load(path) {
            Ok(c) => c,
            Err(e) => return fail(&e.to_string()),
        },
        None => GeneratorConfig::default(),
    };

    let ledger = match &cli.ledger_dir {
        Some(dir) => match open_ledger(dir, config.ledger_capacity) {
            Ok(l) => Some(l),
            Err(e) => return fail(&e),
        },
        None => None,
    };

    let mut generator = LogoGenerator::new(config);
    if let Some(l) = ledger {
        generator = generator.with_ledger(l);
    }

    match cli.command {
        Commands::Algorithms => {
            let list: Vec<_> = Algorithm::ALL
                .iter()
                .map(|a| serde_json::json!({
                    "name": a.name(),
                    "pattern": a.pattern(),
                    "letterBased": a.is_letter_based(),
                }))
                .collect();
            print_json(&list)
        }

        Commands::Generate { algorithm, input } => {
            match generator.generate_named(&algorithm, &input.params()) {
                Ok(logos) => emit_logos(logos, input.svg_dir.as_deref()),
                Err(e) => fail(&e.to_string()),
            }
        }

        Commands::GenerateAll { input } => match generator.generate_all(&input.params()) {
            Ok(logos) => emit_logos(logos, input.svg_dir.as_deref()),
            Err(e) => fail(&e.to_string()),
        },

        Commands::Hash { brand, algorithm, variant, seed } => {
            // hashing ignores colors; any primary works
            let mut params = LogoGenerationParams::new(brand, "#000000").with_variations(variant.max(1));
            params.seed = seed;
            let hasher = LogoGenerator::new(generator.config().clone());
            match hasher.generate_named(&algorithm, &params) {
                Ok(logos) => match logos.last() {
                    Some(logo) => print_json(&serde_json::json!({
                        "hash": logo.hash,
                        "id": logo.id,
                        "algorithm": logo.algorithm,
                        "variant": logo.variant,
                    })),
                    None => fail("No variant produced"),
                },
                Err(e) => fail(&e.to_string()),
            }
        }

        Commands::Ledger { action } => {
            let Some(ledger) = generator.ledger() else {
                return fail("--ledger-dir is required for ledger commands");
            };
            match action {
                LedgerAction::Stats { brand } => {
                    let history = brand.as_deref().map(|b| ledger.brand_history(b));
                    print_json(&serde_json::json!({
                        "records": ledger.len(),
                        "capacity": ledger.capacity(),
                        "history": history,
                    }))
                }
                LedgerAction::Clear => {
                    ledger.clear();
                    print_json(&serde_json::json!({ "success": true, "records": ledger.len() }))
                }
            }
        }
    }
}
