use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{Cell, ContentArrangement, Table};
use fxbt_core::coordinator::{self, SymbolRun};
use fxbt_core::io::{TickProducer, TradeSink};
use fxbt_core::pipeline::SymbolPipeline;
use fxbt_core::positions::RunStatistics;
use fxbt_data::{CsvTickProducer, RunConfig, SqliteTradeSink};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "fxbt")]
#[command(about = "Deterministic tick-level FX backtesting engine", long_about = None)]
struct Cli {
    /// Enable debug-level logging
    #[arg(long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a backtest across every symbol in a config file
    Run {
        /// Path to the run's YAML config
        #[arg(long)]
        config: PathBuf,

        /// Directory containing one `<symbol>.csv` file per configured symbol
        #[arg(long)]
        data_dir: PathBuf,

        /// SQLite file to write closed trades to; omit to use an in-memory
        /// database (trades are still summarized to stdout either way)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Parse and validate a config file without running a backtest
    Validate {
        #[arg(long)]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    match &cli.command {
        Commands::Run {
            config,
            data_dir,
            output,
        } => run_backtest(config, data_dir, output.as_deref()),
        Commands::Validate { config } => validate_config(config),
    }
}

fn validate_config(path: &Path) -> Result<()> {
    let config = RunConfig::load(path)
        .with_context(|| format!("loading config {}", path.display()))?;

    for symbol_id in 0..config.symbols.len() as u32 {
        let name = config.symbol_name(symbol_id).unwrap_or("?");
        config
            .build_pipeline(symbol_id)
            .with_context(|| format!("building pipeline for symbol {name}"))?;
    }

    println!(
        "config valid: {} symbol(s): {}",
        config.symbols.len(),
        config
            .symbols
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(())
}

fn run_backtest(config_path: &Path, data_dir: &Path, output: Option<&Path>) -> Result<()> {
    let config = RunConfig::load(config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;
    info!(symbols = config.symbols.len(), "loaded config");

    let mut jobs: Vec<(u32, SymbolPipeline, Box<dyn TickProducer + Send>)> = Vec::new();
    for (idx, symbol) in config.symbols.iter().enumerate() {
        let symbol_id = idx as u32;
        let pipeline = config
            .build_pipeline(symbol_id)
            .with_context(|| format!("building pipeline for {}", symbol.name))?;

        let csv_path = data_dir.join(format!("{}.csv", symbol.name));
        let producer = CsvTickProducer::open(&csv_path, symbol_id, symbol.name.clone())
            .with_context(|| format!("opening {}", csv_path.display()))?;

        jobs.push((symbol_id, pipeline, Box::new(producer)));
    }

    let runs = coordinator::run_all(jobs);

    let mut sink = match output {
        Some(path) => SqliteTradeSink::open(path)
            .with_context(|| format!("opening output database {}", path.display()))?,
        None => SqliteTradeSink::open_in_memory()?,
    };

    for run in &runs {
        if let Some(err) = &run.error {
            let name = config.symbol_name(run.symbol_id).unwrap_or("?");
            warn!(symbol = name, %err, "symbol run failed");
        }
        for trade in &run.trades {
            sink.emit(trade)
                .map_err(|e| anyhow::anyhow!("writing trade: {e}"))?;
        }
        let stats = RunStatistics::from_trades(&run.trades);
        sink.write_summary(run.symbol_id, &stats)
            .map_err(|e| anyhow::anyhow!("writing run summary: {e}"))?;
    }

    print_summary(&config, &runs);
    Ok(())
}

fn print_summary(config: &RunConfig, runs: &[SymbolRun]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Symbol", "Trades", "Wins", "Win %", "Total Pips", "Status"]);

    for run in runs {
        let name = config.symbol_name(run.symbol_id).unwrap_or("?");
        let total = run.trades.len();
        let wins = run.trades.iter().filter(|t| t.pnl_pips > 0.0).count();
        let win_pct = if total > 0 {
            100.0 * wins as f64 / total as f64
        } else {
            0.0
        };
        let total_pips: f64 = run.trades.iter().map(|t| t.pnl_pips).sum();
        let status = if run.error.is_some() { "ERROR" } else { "ok" };

        table.add_row(vec![
            Cell::new(name),
            Cell::new(total),
            Cell::new(wins),
            Cell::new(format!("{win_pct:.1}")),
            Cell::new(format!("{total_pips:.1}")),
            Cell::new(status),
        ]);
    }

    println!("{table}");
}
