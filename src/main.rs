//! Gold-per-minute tracker CLI
//!
//! Feeds crawled match records into the running averages and prints the
//! per-interval, per-tier means.

use clap::{Parser, Subcommand};
use gpm::{Config, Result};

#[derive(Parser)]
#[command(name = "gpm")]
#[command(about = "Running gold-per-minute averages by match interval and rank tier", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate match records and print the running averages
    Ingest {
        /// JSON lines file, or "-" for stdin
        input: Option<String>,
        /// Input is a database export (JSON array or object of records)
        #[arg(long)]
        export: bool,
        /// Output format: table, json or csv
        #[arg(long)]
        format: Option<String>,
        /// Print a snapshot every N folded records
        #[arg(long)]
        refresh_every: Option<u64>,
        /// Override the maximum number of records folded
        #[arg(long)]
        max_points: Option<u64>,
        /// Override the number of tracked intervals
        #[arg(long)]
        max_intervals: Option<usize>,
    },
    /// Write synthetic match records as JSON lines
    Simulate {
        /// Number of records
        #[arg(long, default_value = "100")]
        records: usize,
        /// RNG seed
        #[arg(long, default_value = "42")]
        seed: u64,
        /// Output file (stdout if omitted)
        #[arg(long)]
        output: Option<String>,
    },
    /// Initialize a new project with default config
    Init,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    let result = match cli.command {
        Commands::Ingest {
            input,
            export,
            format,
            refresh_every,
            max_points,
            max_intervals,
        } => {
            let mut config = config;
            if let Some(f) = format {
                config.output.format = f;
            }
            if let Some(n) = refresh_every {
                config.output.refresh_every = n;
            }
            if let Some(n) = max_points {
                config.aggregation.max_points = n;
            }
            if let Some(n) = max_intervals {
                config.aggregation.max_intervals = n;
            }
            commands::ingest(&config, input.as_deref(), export)
        }
        Commands::Simulate {
            records,
            seed,
            output,
        } => commands::simulate(records, seed, output.as_deref()),
        Commands::Init => commands::init(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use gpm::data::simulate::{self, SimulationConfig};
    use gpm::data::{read_export, JsonLinesSource, RecordSource};
    use gpm::snapshot::{render, OutputFormat};
    use gpm::{Engine, IngestOutcome};

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        println!("\nNext steps:");
        println!("  1. Edit {} to customize settings", config_path);
        println!("  2. Run 'gpm simulate --output matches.jsonl' for sample data");
        println!("  3. Run 'gpm ingest matches.jsonl' to aggregate it");

        Ok(())
    }

    pub fn ingest(config: &Config, input: Option<&str>, export: bool) -> Result<()> {
        config.validate()?;
        let format: OutputFormat = config.output.format.parse()?;
        let engine = Engine::new(config.aggregation);
        log::debug!(
            "Tracking {} intervals of {} minutes, up to {} records",
            engine.config().max_intervals,
            engine.config().interval_minutes,
            engine.config().max_points
        );

        let mut source: Box<dyn RecordSource> = if export {
            let path = input.ok_or_else(|| {
                gpm::GpmError::Config("--export needs an input file".to_string())
            })?;
            let source = read_export(path)?;
            log::info!("Loaded export with {} documents", source.len());
            Box::new(source)
        } else {
            Box::new(JsonLinesSource::open(input)?)
        };

        let mut undecodable = 0u64;
        while let Some(item) = source.next_record() {
            let record = match item {
                Ok(record) => record,
                Err(e) => {
                    log::warn!("Skipping undecodable record: {}", e);
                    undecodable += 1;
                    continue;
                }
            };

            let outcome = engine.on_record(&record);
            let refresh = config.output.refresh_every;
            if refresh > 0
                && matches!(outcome, IngestOutcome::Folded { .. })
                && engine.processed() % refresh == 0
            {
                print!("{}", render(&engine.snapshot(), format)?);
            }
        }

        print!("{}", render(&engine.snapshot(), format)?);

        let stats = engine.stats();
        log::info!(
            "Folded {} records ({} discarded, {} dropped at cap, {} undecodable)",
            stats.processed,
            stats.discarded,
            stats.dropped,
            undecodable
        );

        Ok(())
    }

    pub fn simulate(records: usize, seed: u64, output: Option<&str>) -> Result<()> {
        let config = SimulationConfig {
            records,
            seed,
            ..Default::default()
        };
        let generated = simulate::generate(&config);

        match output {
            Some(path) => {
                let file = std::fs::File::create(path)?;
                simulate::write_json_lines(&generated, std::io::BufWriter::new(file))?;
                println!("Wrote {} records to {}", generated.len(), path);
            }
            None => {
                let stdout = std::io::stdout();
                simulate::write_json_lines(&generated, stdout.lock())?;
            }
        }

        Ok(())
    }
}
