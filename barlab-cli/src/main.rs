//! barlab CLI: enrichment, backtest and synthetic data commands.
//!
//! Commands:
//! - `enrich`: compute the indicator table for a bar file and write it as CSV
//! - `run`: execute a backtest from a TOML config on a bar file or synthetic walk
//! - `synth`: write a seeded synthetic bar file

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use barlab_core::data::write_bars;
use barlab_runner::{
    enrich, generate_synthetic_bars, init_logging, load_bars, run_backtest_on_store,
    save_artifacts, BarSource, LogConfig, LogFormat, RunConfig, SyntheticSpec,
};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing::info;

#[derive(Parser)]
#[command(name = "barlab", about = "barlab: bar-by-bar indicator backtesting")]
struct Cli {
    /// Log format: pretty, compact or json. Overrides LOG_FORMAT.
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the indicator table for a bar file.
    Enrich {
        #[command(flatten)]
        data: DataArgs,

        /// TOML run config; only [indicators], [warmup] and [strategy] are used.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output CSV path.
        #[arg(long, short)]
        output: PathBuf,
    },
    /// Execute a backtest from a TOML config file.
    Run {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,

        #[command(flatten)]
        data: DataArgs,

        /// Directory for result artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,

        /// Also write the enriched table.
        #[arg(long, default_value_t = false)]
        with_enriched: bool,
    },
    /// Write a synthetic bar file.
    Synth {
        #[command(flatten)]
        synth: SynthArgs,

        /// Symbol recorded for the series.
        #[arg(long, default_value = "SYN")]
        symbol: String,

        /// Output CSV path.
        #[arg(long, short)]
        output: PathBuf,
    },
}

#[derive(Args)]
struct DataArgs {
    /// Bar CSV with Time,Open,High,Low,Close,Volume columns.
    #[arg(long)]
    data: Option<PathBuf>,

    /// Use a synthetic random walk instead of a file.
    #[arg(long, default_value_t = false)]
    synthetic: bool,

    /// Symbol when no config names one.
    #[arg(long)]
    symbol: Option<String>,

    #[command(flatten)]
    synth: SynthArgs,
}

#[derive(Args)]
struct SynthArgs {
    /// Random seed for synthetic bars.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of synthetic bars.
    #[arg(long, default_value_t = 2_000)]
    bars: usize,

    /// Minutes per synthetic bar.
    #[arg(long, default_value_t = 60)]
    interval: i64,

    /// First session date (YYYY-MM-DD).
    #[arg(long, default_value = "2024-01-02")]
    start: String,

    /// Opening price of the walk.
    #[arg(long, default_value_t = 100.0)]
    start_price: f64,
}

impl SynthArgs {
    fn to_spec(&self) -> Result<SyntheticSpec> {
        let start_date = NaiveDate::parse_from_str(&self.start, "%Y-%m-%d")
            .with_context(|| format!("invalid --start date '{}'", self.start))?;
        Ok(SyntheticSpec {
            seed: self.seed,
            bars: self.bars,
            start_date,
            interval_minutes: self.interval,
            start_price: self.start_price,
            ..SyntheticSpec::default()
        })
    }
}

impl DataArgs {
    fn source(&self) -> Result<BarSource> {
        match (&self.data, self.synthetic) {
            (Some(_), true) => bail!("--data and --synthetic are mutually exclusive"),
            (None, false) => bail!("one of --data or --synthetic is required"),
            (Some(path), false) => Ok(BarSource::File(path.clone())),
            (None, true) => Ok(BarSource::Synthetic(self.synth.to_spec()?)),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env();
    if let Some(format) = &cli.log_format {
        log_config.format = LogFormat::parse(format);
    }
    init_logging(&log_config)?;

    match cli.command {
        Commands::Enrich {
            data,
            config,
            output,
        } => run_enrich(&data, config, &output),
        Commands::Run {
            config,
            data,
            output_dir,
            with_enriched,
        } => run_backtest_cmd(&config, &data, &output_dir, with_enriched),
        Commands::Synth {
            synth,
            symbol,
            output,
        } => run_synth(&synth, &symbol, &output),
    }
}

fn load_config(path: &Path, symbol: Option<&str>) -> Result<RunConfig> {
    let mut config = RunConfig::from_file(path)
        .with_context(|| format!("failed to load config {}", path.display()))?;
    if let Some(symbol) = symbol {
        config.backtest.symbol = symbol.to_string();
    }
    Ok(config)
}

fn run_enrich(data: &DataArgs, config: Option<PathBuf>, output: &Path) -> Result<()> {
    let config = match config {
        Some(path) => load_config(&path, data.symbol.as_deref())?,
        None => RunConfig::for_symbol(data.symbol.as_deref().unwrap_or("BARS")),
    };
    let loaded = load_bars(&config.backtest.symbol, &data.source()?)?;
    let table = enrich(&config, &loaded.store)?;

    let file = File::create(output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    table.write_csv(file)?;

    info!(
        rows = table.len(),
        columns = table.columns().len(),
        trimmed = table.trimmed_rows(),
        fingerprint = %table.fingerprint(),
        "enriched table written"
    );
    println!("Enriched table written to: {}", output.display());
    Ok(())
}

fn run_backtest_cmd(
    config_path: &Path,
    data: &DataArgs,
    output_dir: &Path,
    with_enriched: bool,
) -> Result<()> {
    let config = load_config(config_path, data.symbol.as_deref())?;
    let loaded = load_bars(&config.backtest.symbol, &data.source()?)?;
    let result = run_backtest_on_store(&config, &loaded.store, loaded.synthetic)?;

    print!("{}", result.report);
    if result.synthetic {
        println!("(synthetic data)");
    }

    let table = if with_enriched {
        Some(enrich(&config, &loaded.store)?)
    } else {
        None
    };
    let dir = save_artifacts(&result, table.as_ref(), output_dir)?;
    println!("Artifacts saved to: {}", dir.display());
    Ok(())
}

fn run_synth(args: &SynthArgs, symbol: &str, output: &Path) -> Result<()> {
    let store = generate_synthetic_bars(symbol, &args.to_spec()?)?;
    let file = File::create(output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    write_bars(&store, file)?;
    println!(
        "Wrote {} synthetic bars for {symbol} to {}",
        store.len(),
        output.display()
    );
    Ok(())
}
