//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_market_data::CsvMarketData;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::domain::backtest::run_backtest;
use crate::domain::config_validation::{
    build_backtest_config, build_run_config, build_strategy_config,
};
use crate::domain::error::VectraderError;
use crate::domain::frame::TimeFrame;
use crate::domain::metrics::Metrics;
use crate::domain::signal::build_signal;
use crate::ports::data_port::MarketDataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "vectrader", about = "Vectorized equity strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the configured strategy backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Write a JSON report to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Describe the data matrices available for the configured universe
    Info {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let outcome = match cli.command {
        Command::Backtest { config, output } => run_backtest_command(&config, output.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config } => run_info(&config),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn load_config(path: &Path) -> Result<FileConfigAdapter, VectraderError> {
    FileConfigAdapter::from_file(path).map_err(|e| VectraderError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

pub fn run_backtest_command(
    config_path: &Path,
    output: Option<&Path>,
) -> Result<(), VectraderError> {
    eprintln!("Loading config from {}", config_path.display());
    let config = load_config(config_path)?;

    let run_config = build_run_config(&config)?;
    let backtest_config = build_backtest_config(&config)?;
    let strategy = build_strategy_config(&config)?;

    let data = CsvMarketData::new(PathBuf::from(&run_config.data_path));

    eprintln!(
        "Building {} signal for {} instruments from {}",
        strategy.id(),
        run_config.universe.len(),
        run_config.start_date
    );
    let signal = build_signal(&data, &run_config.universe, run_config.start_date, &strategy)?;
    if signal.is_empty() {
        return Err(VectraderError::DataLoad {
            reason: format!("no usable data for strategy {}", strategy.id()),
        });
    }

    let prices = data.fetch_prices(
        &run_config.universe,
        run_config.start_date,
        run_config.end_date,
    )?;
    if prices.is_empty() {
        return Err(VectraderError::DataLoad {
            reason: "no usable price data for the configured universe".to_string(),
        });
    }

    eprintln!(
        "Simulating {} dates x {} instruments",
        prices.n_rows(),
        prices.n_cols()
    );
    let result = run_backtest(&signal, &prices, &backtest_config)?;

    match Metrics::compute(&result) {
        None => println!("Not enough return observations to compute metrics."),
        Some(metrics) => {
            print_summary(&metrics);
            if let Some(path) = output {
                let path = path.display().to_string();
                JsonReportAdapter::new().write(&result, &metrics, &strategy, &path)?;
                eprintln!("Report written to {path}");
            }
        }
    }

    Ok(())
}

pub fn run_validate(config_path: &Path) -> Result<(), VectraderError> {
    let config = load_config(config_path)?;
    let run_config = build_run_config(&config)?;
    build_backtest_config(&config)?;
    let strategy = build_strategy_config(&config)?;

    println!(
        "OK: {} over {} instruments from {}",
        strategy.id(),
        run_config.universe.len(),
        run_config.start_date
    );
    Ok(())
}

pub fn run_info(config_path: &Path) -> Result<(), VectraderError> {
    let config = load_config(config_path)?;
    let run_config = build_run_config(&config)?;
    let data = CsvMarketData::new(PathBuf::from(&run_config.data_path));

    let matrices: [(&str, Result<TimeFrame, VectraderError>); 3] = [
        (
            "prices",
            data.fetch_prices(&run_config.universe, run_config.start_date, run_config.end_date),
        ),
        (
            "revenues",
            data.fetch_revenues(&run_config.universe, run_config.start_date),
        ),
        (
            "dividend yields",
            data.fetch_dividend_yields(&run_config.universe, run_config.start_date),
        ),
    ];

    for (name, fetched) in matrices {
        match fetched {
            Err(e) => println!("{name}: unavailable ({e})"),
            Ok(frame) if frame.is_empty() => println!("{name}: no rows in range"),
            Ok(frame) => {
                let first = frame.dates()[0];
                let last = frame.dates()[frame.n_rows() - 1];
                println!(
                    "{name}: {} rows x {} instruments, {first} to {last}",
                    frame.n_rows(),
                    frame.n_cols()
                );
            }
        }
    }
    Ok(())
}

fn print_summary(metrics: &Metrics) {
    println!("Backtest results");
    println!("  total return       {:>10.2}%", metrics.total_return * 100.0);
    println!(
        "  annualized return  {:>10.2}%",
        metrics.annualized_return * 100.0
    );
    println!("  sharpe ratio       {:>10.2}", metrics.sharpe_ratio);
    println!("  max drawdown       {:>10.2}%", metrics.max_drawdown * 100.0);
    println!("  win rate           {:>10.2}%", metrics.win_rate * 100.0);
    println!("  trading days       {:>10}", metrics.trading_days);
}
