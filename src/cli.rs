//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{self as backtest_engine, BacktestConfig, BacktestResult};
use crate::domain::config_validation::{
    parse_date, validate_backtest_config, validate_strategy_config, validate_strategy_params,
    validate_symbol,
};
use crate::domain::error::TradetipsError;
use crate::domain::indicator::enhanced_indicators;
use crate::domain::indicator_helpers::indicator_table;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::score::prediction_score;
use crate::domain::strategy::{
    DEFAULT_LONG_WINDOW, DEFAULT_OVERBOUGHT, DEFAULT_OVERSOLD, DEFAULT_SHORT_WINDOW, Strategy,
};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "tradetips", about = "Technical indicator and strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one strategy over one symbol
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        /// SMA, RSI, MACD, Bollinger or Combined
        #[arg(short, long)]
        strategy: Option<String>,
        /// Per-bar CSV report path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run every strategy and rank them by total return
    Compare {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compute the enhanced indicator set for every bar
    Indicators {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        /// Per-bar CSV path; without it the latest values are printed
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Score the latest bar from 0 to 100
    Score {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a configuration file without running anything
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Backtest {
            config,
            symbol,
            strategy,
            output,
        } => run_backtest(&config, symbol.as_deref(), strategy.as_deref(), output.as_deref()),
        Command::Compare {
            config,
            symbol,
            output,
        } => run_compare(&config, symbol.as_deref(), output.as_deref()),
        Command::Indicators {
            config,
            symbol,
            output,
        } => run_indicators(&config, symbol.as_deref(), output.as_deref()),
        Command::Score { config, symbol } => run_score(&config, symbol.as_deref()),
        Command::ListSymbols { config } => run_list_symbols(&config),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, TradetipsError> {
    eprintln!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path)
}

pub fn build_backtest_config(config: &dyn ConfigPort) -> BacktestConfig {
    let defaults = BacktestConfig::default();
    BacktestConfig {
        initial_capital: config.get_double("backtest", "initial_capital", defaults.initial_capital),
        commission: config.get_double("backtest", "commission", defaults.commission),
        risk_free_rate: config.get_double("backtest", "risk_free_rate", defaults.risk_free_rate),
    }
}

/// Frame reports include indicator columns unless `[report] indicators = false`.
pub fn build_report_adapter(config: &dyn ConfigPort) -> CsvReportAdapter {
    CsvReportAdapter::new(config.get_bool("report", "indicators", true))
}

/// Strategy named by `name_override` or `[strategy] name`, with its
/// parameters read from `[strategy]` and validated either way.
pub fn build_strategy(
    config: &dyn ConfigPort,
    name_override: Option<&str>,
) -> Result<Strategy, TradetipsError> {
    validate_strategy_params(config)?;
    let name = match name_override {
        Some(n) => n.to_string(),
        None => config
            .get_string("strategy", "name")
            .unwrap_or_else(|| "SMA".to_string()),
    };

    let strategy = match Strategy::from_name(&name)? {
        Strategy::SmaCrossover { .. } => Strategy::SmaCrossover {
            short_window: window(config, "short_window", DEFAULT_SHORT_WINDOW)?,
            long_window: window(config, "long_window", DEFAULT_LONG_WINDOW)?,
        },
        Strategy::Rsi { .. } => Strategy::Rsi {
            oversold: config.get_double("strategy", "oversold", DEFAULT_OVERSOLD),
            overbought: config.get_double("strategy", "overbought", DEFAULT_OVERBOUGHT),
        },
        other => other,
    };
    Ok(strategy)
}

fn window(config: &dyn ConfigPort, key: &str, default: usize) -> Result<usize, TradetipsError> {
    let value = config.get_int("strategy", key, default as i64);
    usize::try_from(value)
        .ok()
        .filter(|w| *w > 0)
        .ok_or_else(|| TradetipsError::ConfigInvalid {
            section: "strategy".into(),
            key: key.into(),
            reason: format!("{} must be at least 1", key),
        })
}

pub fn resolve_symbol(
    symbol_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<String, TradetipsError> {
    if let Some(s) = symbol_override.map(str::trim).filter(|s| !s.is_empty()) {
        return Ok(s.to_uppercase());
    }
    validate_symbol(config)?;
    Ok(config
        .get_string("backtest", "symbol")
        .unwrap_or_default()
        .trim()
        .to_uppercase())
}

pub fn date_range(config: &dyn ConfigPort) -> Result<(NaiveDate, NaiveDate), TradetipsError> {
    let start = parse_date(config.get_string("backtest", "start_date").as_deref(), "start_date")?;
    let end = parse_date(config.get_string("backtest", "end_date").as_deref(), "end_date")?;
    Ok((start, end))
}

pub fn build_data_port(config: &dyn ConfigPort) -> Result<CsvAdapter, TradetipsError> {
    let dir = config
        .get_string("data", "csv_dir")
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| TradetipsError::ConfigMissing {
            section: "data".into(),
            key: "csv_dir".into(),
        })?;
    Ok(CsvAdapter::new(PathBuf::from(dir.trim())))
}

/// Fetch bars for `symbol`; an empty range is `NoData`.
pub fn load_bars(
    data_port: &dyn DataPort,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<OhlcvBar>, TradetipsError> {
    let bars = data_port.fetch_ohlcv(symbol, start, end)?;
    if bars.is_empty() {
        return Err(TradetipsError::NoData {
            symbol: symbol.to_string(),
        });
    }
    eprintln!("Loaded {} bars for {} ({} to {})", bars.len(), symbol, start, end);
    Ok(bars)
}

/// Validated config plus the bars it points at.
struct RunInputs {
    config: FileConfigAdapter,
    symbol: String,
    bars: Vec<OhlcvBar>,
}

fn prepare(config_path: &Path, symbol_override: Option<&str>) -> Result<RunInputs, TradetipsError> {
    let config = load_config(config_path)?;
    validate_backtest_config(&config)?;

    let symbol = resolve_symbol(symbol_override, &config)?;
    let (start, end) = date_range(&config)?;
    let data_port = build_data_port(&config)?;
    let bars = load_bars(&data_port, &symbol, start, end)?;

    Ok(RunInputs {
        config,
        symbol,
        bars,
    })
}

fn output_path(override_path: Option<&Path>, config: &dyn ConfigPort) -> Option<String> {
    override_path
        .map(|p| p.display().to_string())
        .or_else(|| config.get_string("report", "output"))
        .filter(|p| !p.trim().is_empty())
}

fn run_backtest(
    config_path: &Path,
    symbol_override: Option<&str>,
    strategy_override: Option<&str>,
    output_override: Option<&Path>,
) -> Result<(), TradetipsError> {
    let inputs = prepare(config_path, symbol_override)?;
    let strategy = build_strategy(&inputs.config, strategy_override)?;
    let bt_config = build_backtest_config(&inputs.config);
    eprintln!("Running strategy: {}", strategy);

    let result = backtest_engine::run_backtest(&inputs.symbol, &inputs.bars, &strategy, &bt_config)?;
    print_summary(&result, &bt_config);

    if let Some(path) = output_path(output_override, &inputs.config) {
        build_report_adapter(&inputs.config).write(&result, &path)?;
        eprintln!("\nReport written to: {}", path);
    }
    Ok(())
}

fn run_compare(
    config_path: &Path,
    symbol_override: Option<&str>,
    output_override: Option<&Path>,
) -> Result<(), TradetipsError> {
    let inputs = prepare(config_path, symbol_override)?;
    let bt_config = build_backtest_config(&inputs.config);

    let results = backtest_engine::compare_strategies(&inputs.symbol, &inputs.bars, &bt_config)?;

    println!(
        "{:<10} {:>10} {:>10} {:>8} {:>9} {:>7} {:>9}",
        "Strategy", "Return", "Excess", "Sharpe", "MaxDD", "Trades", "WinRate"
    );
    for result in &results {
        let m = &result.metrics;
        println!(
            "{:<10} {:>9.2}% {:>9.2}% {:>8.2} {:>8.2}% {:>7} {:>8.1}%",
            result.strategy,
            m.total_return * 100.0,
            m.excess_return * 100.0,
            m.sharpe_ratio,
            m.max_drawdown * 100.0,
            result.trade_count(),
            m.trade_stats.win_rate * 100.0,
        );
    }
    if let Some(best) = results.first() {
        eprintln!("\nBest strategy for {}: {}", inputs.symbol, best.strategy);
    }

    if let Some(path) = output_path(output_override, &inputs.config) {
        build_report_adapter(&inputs.config).write_all(&results, &path)?;
        eprintln!("Reports written next to: {}", path);
    }
    Ok(())
}

fn run_indicators(
    config_path: &Path,
    symbol_override: Option<&str>,
    output_override: Option<&Path>,
) -> Result<(), TradetipsError> {
    let inputs = prepare(config_path, symbol_override)?;
    let table = indicator_table(&inputs.symbol, &inputs.bars, &enhanced_indicators())?;

    match output_override {
        Some(path) => {
            let path = path.display().to_string();
            build_report_adapter(&inputs.config).write_indicators(&table, &path)?;
            eprintln!("Indicators written to: {}", path);
        }
        None => {
            if let (Some(date), Some(close)) = (table.dates.last(), table.closes.last()) {
                println!("{} {} close {:.2}", table.symbol, date, close);
            }
            for (name, value) in table.latest() {
                match value {
                    Some(v) => println!("  {:<28} {:>12.4}", name, v),
                    None => println!("  {:<28} {:>12}", name, "-"),
                }
            }
        }
    }
    Ok(())
}

fn run_score(config_path: &Path, symbol_override: Option<&str>) -> Result<(), TradetipsError> {
    let inputs = prepare(config_path, symbol_override)?;
    let score = prediction_score(&inputs.symbol, &inputs.bars)?;

    let last = inputs.bars.last().map(|b| (b.date, b.close));
    if let Some((date, close)) = last {
        eprintln!("Latest bar: {} close {:.2}", date, close);
    }
    println!("{}: {}/100 ({})", inputs.symbol, score.score, score.recommendation);
    Ok(())
}

fn run_list_symbols(config_path: &Path) -> Result<(), TradetipsError> {
    let config = load_config(config_path)?;
    let data_port = build_data_port(&config)?;
    let symbols = data_port.list_symbols()?;

    if symbols.is_empty() {
        warn!("no symbol files found");
        eprintln!("No symbols found");
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), TradetipsError> {
    let config = load_config(config_path)?;
    validate_symbol(&config)?;
    validate_backtest_config(&config)?;
    validate_strategy_config(&config)?;

    let strategy = build_strategy(&config, None)?;
    let bt_config = build_backtest_config(&config);
    let (start, end) = date_range(&config)?;

    eprintln!("\nBacktest:");
    eprintln!("  symbol:          {}", resolve_symbol(None, &config)?);
    eprintln!("  period:          {} to {}", start, end);
    eprintln!("  initial capital: {:.2}", bt_config.initial_capital);
    eprintln!("  commission:      {}", bt_config.commission);
    eprintln!("  risk-free rate:  {}", bt_config.risk_free_rate);
    eprintln!("\nStrategy: {}", strategy);
    eprintln!("\nIndicators to compute:");
    for indicator in strategy.required_indicators() {
        eprintln!("  {}", indicator);
    }

    eprintln!("\nConfiguration is valid.");
    info!(strategy = strategy.name(), "config validated");
    Ok(())
}

fn print_summary(result: &BacktestResult, config: &BacktestConfig) {
    let m = &result.metrics;
    let stats = &m.trade_stats;

    eprintln!("\n=== {} on {} ===", result.strategy, result.symbol);
    eprintln!("Initial Capital:  {:.2}", config.initial_capital);
    eprintln!("Final Value:      {:.2}", m.final_value);
    eprintln!("Total Return:     {:.2}%", m.total_return * 100.0);
    eprintln!("Buy & Hold:       {:.2}%", m.buy_hold_return * 100.0);
    eprintln!("Excess Return:    {:.2}%", m.excess_return * 100.0);
    eprintln!("Sharpe Ratio:     {:.2}", m.sharpe_ratio);
    eprintln!("Max Drawdown:     {:.2}%", m.max_drawdown * 100.0);
    eprintln!("Total Trades:     {}", result.trade_count());
    eprintln!("Win Rate:         {:.1}%", stats.win_rate * 100.0);
    eprintln!("Avg Win / Loss:   {:.2} / {:.2}", stats.avg_win, stats.avg_loss);
    eprintln!("Profit Factor:    {:.2}", stats.profit_factor);
    eprintln!("Avg Duration:     {:.1} days", stats.avg_duration_days);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn backtest_config_defaults() {
        let c = build_backtest_config(&config("[backtest]\n"));
        assert_eq!(c, BacktestConfig::default());

        let c = build_backtest_config(&config("[backtest]\ninitial_capital = 5000\ncommission = 0\n"));
        assert_eq!(c.initial_capital, 5000.0);
        assert_eq!(c.commission, 0.0);
    }

    #[test]
    fn strategy_from_config_and_override() {
        let cfg = config("[strategy]\nname = sma\nshort_window = 5\nlong_window = 15\n");
        assert_eq!(
            build_strategy(&cfg, None).unwrap(),
            Strategy::SmaCrossover {
                short_window: 5,
                long_window: 15
            }
        );
        assert_eq!(build_strategy(&cfg, Some("MACD")).unwrap(), Strategy::Macd);
    }

    #[test]
    fn rsi_thresholds_from_config() {
        let cfg = config("[strategy]\nname = RSI\noversold = 20\noverbought = 85\n");
        assert_eq!(
            build_strategy(&cfg, None).unwrap(),
            Strategy::Rsi {
                oversold: 20.0,
                overbought: 85.0
            }
        );
    }

    #[test]
    fn unknown_strategy_is_error() {
        let cfg = config("[strategy]\n");
        assert!(matches!(
            build_strategy(&cfg, Some("Momentum")),
            Err(TradetipsError::UnsupportedStrategy { .. })
        ));
    }

    #[test]
    fn zero_window_is_invalid() {
        let cfg = config("[strategy]\nshort_window = 0\n");
        assert!(matches!(
            build_strategy(&cfg, None),
            Err(TradetipsError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn symbol_override_wins() {
        let cfg = config("[backtest]\nsymbol = aapl\n");
        assert_eq!(resolve_symbol(None, &cfg).unwrap(), "AAPL");
        assert_eq!(resolve_symbol(Some("msft"), &cfg).unwrap(), "MSFT");
        assert!(resolve_symbol(None, &config("[backtest]\n")).is_err());
    }

    #[test]
    fn strategy_override_still_checks_params() {
        let cfg = config("[strategy]\nshort_window = 60\nlong_window = 10\n");
        assert!(matches!(
            build_strategy(&cfg, Some("SMA")),
            Err(TradetipsError::ConfigInvalid { key, .. }) if key == "short_window"
        ));

        let cfg = config("[strategy]\noversold = 90\noverbought = 10\n");
        assert!(matches!(
            build_strategy(&cfg, Some("RSI")),
            Err(TradetipsError::ConfigInvalid { key, .. }) if key == "oversold"
        ));
    }

    #[test]
    fn report_indicators_toggle() {
        let on = build_report_adapter(&config("[report]\n"));
        let off = build_report_adapter(&config("[report]\nindicators = off\n"));
        assert_eq!(format!("{:?}", on), format!("{:?}", CsvReportAdapter::new(true)));
        assert_eq!(format!("{:?}", off), format!("{:?}", CsvReportAdapter::new(false)));
    }

    #[test]
    fn cli_parses_indicators() {
        let cli = Cli::try_parse_from(["tradetips", "indicators", "-c", "c.ini", "-o", "ind.csv"])
            .unwrap();
        assert!(matches!(cli.command, Command::Indicators { output: Some(_), .. }));
    }

    #[test]
    fn data_port_requires_csv_dir() {
        assert!(matches!(
            build_data_port(&config("[data]\n")),
            Err(TradetipsError::ConfigMissing { .. })
        ));
        assert!(build_data_port(&config("[data]\ncsv_dir = /tmp\n")).is_ok());
    }

    #[test]
    fn cli_parses_backtest_flags() {
        let cli = Cli::try_parse_from([
            "tradetips", "backtest", "-c", "cfg.ini", "--symbol", "INFY", "-s", "RSI", "-o",
            "out.csv",
        ])
        .unwrap();
        match cli.command {
            Command::Backtest {
                config,
                symbol,
                strategy,
                output,
            } => {
                assert_eq!(config, PathBuf::from("cfg.ini"));
                assert_eq!(symbol.as_deref(), Some("INFY"));
                assert_eq!(strategy.as_deref(), Some("RSI"));
                assert_eq!(output, Some(PathBuf::from("out.csv")));
            }
            other => panic!("Expected Backtest, got {:?}", other),
        }
    }

    #[test]
    fn cli_parses_list_symbols() {
        let cli = Cli::try_parse_from(["tradetips", "list-symbols", "--config", "c.ini"]).unwrap();
        assert!(matches!(cli.command, Command::ListSymbols { .. }));
    }
}
