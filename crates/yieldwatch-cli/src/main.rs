//! Yieldwatch CLI — entry point.

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use yieldwatch::{OperationsEngine, ReportSink};

use yieldwatch_cli::config::{load_config, ConfigOverrides, SimulationConfig};
use yieldwatch_cli::pipeline::{execute, Operation, RunSummary};
use yieldwatch_cli::report::{ConsoleReport, JsonReport};
use yieldwatch_cli::sensor::{build_herd, SensorSimulator};

#[derive(Parser)]
#[command(
    name = "yieldwatch",
    about = "Sort, search, and classify simulated per-subject milk yield readings",
    version
)]
struct Cli {
    /// Path to a JSON config file.
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Seed for reproducible readings.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Number of subjects to simulate.
    #[arg(long, global = true)]
    subjects: Option<usize>,

    /// Readings per subject.
    #[arg(long, global = true)]
    readings: Option<usize>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Text, global = true)]
    format: Format,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a herd and run every analysis (default).
    Run,

    /// Sort each subject's readings ascending.
    Sort,

    /// Search for a contiguous pattern of readings.
    Pattern {
        /// Comma-separated quantities, e.g. 18,20.
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        pattern: Option<Vec<i64>>,
    },

    /// Classify subjects by whether their mean meets a threshold.
    Classify {
        /// Inclusive lower bound of the "high" class.
        #[arg(long, allow_negative_numbers = true)]
        threshold: Option<f64>,
    },

    /// Print the resolved configuration as JSON.
    Config,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   yieldwatch completions bash > ~/.local/share/bash-completion/completions/yieldwatch
    ///   yieldwatch completions zsh > ~/.zfunc/_yieldwatch
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },

    /// Launch interactive REPL mode.
    Repl,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let command = cli.command.unwrap_or(Commands::Run);

    let mut overrides = ConfigOverrides {
        seed: cli.seed,
        subjects: cli.subjects,
        readings_per_subject: cli.readings,
        ..ConfigOverrides::default()
    };
    match &command {
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "yieldwatch", &mut std::io::stdout());
            return Ok(());
        }
        Commands::Pattern { pattern } => overrides.pattern = pattern.clone(),
        Commands::Classify { threshold } => overrides.threshold = *threshold,
        _ => {}
    }
    let config = load_config(cli.config.as_deref(), &overrides)?;

    let operation = match command {
        Commands::Run => Operation::All,
        Commands::Sort => Operation::Sort,
        Commands::Pattern { .. } => Operation::Pattern(config.pattern.clone()),
        Commands::Classify { .. } => Operation::Classify(config.threshold),
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            return Ok(());
        }
        Commands::Repl => return yieldwatch_cli::repl::run(config),
        Commands::Completions { .. } => return Ok(()),
    };

    match cli.format {
        Format::Text => {
            let report = ConsoleReport::stdout();
            analyse(&report, &config, &operation)?;
        }
        Format::Json => {
            let report = JsonReport::new();
            let summary = analyse(&report, &config, &operation)?;
            let mut doc = report.into_value();
            doc["summary"] = serde_json::to_value(summary)?;
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
    }

    Ok(())
}

fn analyse<S: ReportSink>(
    sink: S,
    config: &SimulationConfig,
    operation: &Operation,
) -> anyhow::Result<RunSummary> {
    let mut sensor = SensorSimulator::from_config(config);
    let herd = build_herd(config, &mut sensor);
    let engine = OperationsEngine::with_sink(sink);
    Ok(execute(&engine, &herd, config, operation)?)
}
