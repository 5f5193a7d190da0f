//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

use crate::adapters::csv_adapter::CsvMarketData;
use crate::adapters::csv_ledger_adapter::CsvLedger;
use crate::adapters::csv_target_writer::CsvTargetWriter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config::{build_strategy_config, StrategyConfig};
use crate::domain::error::QualmomError;
use crate::domain::momentum::momentum_score;
use crate::domain::price::PriceField;
use crate::domain::rebalance::{current_regime, run_rebalance, RebalanceOutcome};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::MarketDataPort;
use crate::ports::portfolio_port::PortfolioPort;

const DEFAULT_WEIGHTS_FILE: &str = "target_weights.csv";

#[derive(Parser, Debug)]
#[command(name = "qualmom", about = "Quality/momentum rotation with a bond regime switch")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one rebalance cycle and hand target weights to the optimizer
    Rebalance {
        #[arg(short, long)]
        config: PathBuf,
        /// Compute and print weights without submitting them
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the current market regime
    Regime {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print the momentum score of one security
    Score {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        code: String,
    },
    /// Print the daily stocks/bonds/cash record
    Record {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Rebalance { config, dry_run } => run_rebalance_command(&config, dry_run),
        Command::Regime { config } => run_regime(&config),
        Command::Score { config, code } => run_score(&config, &code),
        Command::Record { config } => run_record(&config),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, QualmomError> {
    info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path)
}

pub fn build_market_data(config: &dyn ConfigPort) -> Result<CsvMarketData, QualmomError> {
    let path = config
        .get_non_empty("data", "path")
        .ok_or_else(|| QualmomError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })?;

    let market = CsvMarketData::new(PathBuf::from(path));
    match config.get_non_empty("data", "as_of") {
        Some(s) => {
            let date = NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| {
                QualmomError::ConfigInvalid {
                    section: "data".into(),
                    key: "as_of".into(),
                    reason: "invalid date format (expected YYYY-MM-DD)".into(),
                }
            })?;
            Ok(market.as_of(date))
        }
        None => Ok(market),
    }
}

pub fn build_ledger(config: &dyn ConfigPort) -> Result<CsvLedger, QualmomError> {
    let positions = config.get_non_empty("portfolio", "positions").map(PathBuf::from);
    let cash = config.get_double("portfolio", "cash", 0.0)?;
    if !cash.is_finite() {
        return Err(QualmomError::ConfigInvalid {
            section: "portfolio".into(),
            key: "cash".into(),
            reason: "cash must be finite".into(),
        });
    }

    let ledger = CsvLedger::new(positions, cash);
    match config.get_non_empty("portfolio", "value") {
        Some(s) => {
            let value: f64 = s.parse().map_err(|_| QualmomError::ConfigInvalid {
                section: "portfolio".into(),
                key: "value".into(),
                reason: "value must be a number".into(),
            })?;
            Ok(ledger.with_marked_value(value))
        }
        None => Ok(ledger),
    }
}

pub fn build_target_writer(config: &dyn ConfigPort) -> CsvTargetWriter {
    let path = config
        .get_non_empty("output", "weights")
        .unwrap_or_else(|| DEFAULT_WEIGHTS_FILE.to_string());
    CsvTargetWriter::new(PathBuf::from(path))
}

/// Loads the strategy config; `dry_run` forces record-only mode.
pub fn resolve_strategy(config: &dyn ConfigPort, dry_run: bool) -> Result<StrategyConfig, QualmomError> {
    let mut strategy = build_strategy_config(config)?;
    if dry_run {
        strategy.use_optimizer_weights = false;
    }
    Ok(strategy)
}

fn run_rebalance_command(config_path: &PathBuf, dry_run: bool) -> Result<(), QualmomError> {
    let adapter = load_config(config_path)?;
    let strategy = resolve_strategy(&adapter, dry_run)?;
    let market = build_market_data(&adapter)?;
    let ledger = build_ledger(&adapter)?;
    let writer = build_target_writer(&adapter);

    let outcome = run_rebalance(&market, &ledger, &writer, &strategy)?;
    print_outcome(&outcome);
    if outcome.submitted {
        info!(path = %writer.output_path().display(), "target weights written");
    }
    Ok(())
}

pub fn print_outcome(outcome: &RebalanceOutcome) {
    println!("regime: {}", outcome.regime);

    println!("survivors:");
    for signal in &outcome.selection.survivors {
        println!("  {:<8} {:>10.2}", signal.code, signal.score);
    }
    if !outcome.selection.skipped.is_empty() {
        println!("skipped:");
        for skipped in &outcome.selection.skipped {
            println!("  {:<8} {}", skipped.code, skipped.reason);
        }
    }

    println!("target weights:");
    for (code, weight) in outcome.weights.iter() {
        println!("  {:<8} {:>8.4}", code, weight);
    }
    println!("total: {:.4}", outcome.weights.total());
    let closing: Vec<&str> = outcome.weights.closes().collect();
    if !closing.is_empty() {
        println!("closing: {}", closing.join(","));
    }
    if !outcome.submitted {
        println!("(record only, not submitted)");
    }
}

fn run_regime(config_path: &PathBuf) -> Result<(), QualmomError> {
    let adapter = load_config(config_path)?;
    let strategy = build_strategy_config(&adapter)?;
    if !strategy.filters_enabled {
        println!("risk-on (filters disabled)");
        return Ok(());
    }
    let market = build_market_data(&adapter)?;
    let regime = current_regime(&market, &strategy)?;
    println!("{}", regime);
    Ok(())
}

fn run_score(config_path: &PathBuf, code: &str) -> Result<(), QualmomError> {
    let adapter = load_config(config_path)?;
    let strategy = build_strategy_config(&adapter)?;
    let market = build_market_data(&adapter)?;
    let selection = &strategy.selection;

    let code = code.trim().to_uppercase();
    let series = market.fetch_price_history(&code, PriceField::Close, selection.history_length())?;
    let prices = series.values_skipping_recent(selection.days_to_skip);
    let score = momentum_score(&prices, selection.momentum_lookback)
        .map_err(|e| QualmomError::series(&code, e))?;

    let verdict = if score > selection.min_momentum_score {
        "qualifies"
    } else {
        "below threshold"
    };
    match series.last_date() {
        Some(date) => println!("{}: {:.2} ({}, through {})", code, score, verdict, date),
        None => println!("{}: {:.2} ({})", code, score, verdict),
    }
    Ok(())
}

fn run_record(config_path: &PathBuf) -> Result<(), QualmomError> {
    let adapter = load_config(config_path)?;
    let strategy = build_strategy_config(&adapter)?;
    let portfolio = build_ledger(&adapter)?.current_portfolio()?;
    let record = portfolio.daily_record(&strategy.bonds);

    println!("total_value: {:.2}", record.total_value);
    println!("stocks:      {:.2}", record.stocks);
    println!("bonds:       {:.2}", record.bonds);
    println!("cash:        {:.2}", record.cash);
    Ok(())
}

fn run_validate(config_path: &PathBuf) -> Result<(), QualmomError> {
    let adapter = load_config(config_path)?;
    let strategy = build_strategy_config(&adapter)?;
    build_market_data(&adapter)?;
    build_ledger(&adapter)?;

    let sel = &strategy.selection;
    println!("benchmark:           {}", strategy.benchmark);
    println!("regime_lookback:     {}", strategy.regime_lookback);
    println!("momentum_lookback:   {}", sel.momentum_lookback);
    println!("days_to_skip:        {}", sel.days_to_skip);
    println!("min_momentum_score:  {}", sel.min_momentum_score);
    println!("roe_top_n:           {}", sel.roe_top_n);
    println!("num_stocks_to_trade: {}", sel.num_stocks_to_trade);
    println!("bonds:               {}", strategy.bonds.codes.join(","));
    println!("use_optimizer:       {}", strategy.use_optimizer_weights);
    println!("can_buy:             {}", strategy.can_buy);
    println!("filters_enabled:     {}", strategy.filters_enabled);
    println!("\nConfiguration is valid.");
    Ok(())
}
