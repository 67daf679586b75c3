//! Backtest engine: indicators -> signals -> portfolio -> metrics.
//!
//! Every run recomputes its indicators from the full bar sequence.

use tracing::{debug, info};

use super::error::TradetipsError;
use super::execution::{EntryResult, enter_long, exit_long};
use super::indicator::{IndicatorColumn, IndicatorType, standard_indicators};
use super::indicator_helpers::compute_indicators;
use super::metrics::{DEFAULT_RISK_FREE_RATE, Metrics, buy_hold_values, daily_returns};
use super::ohlcv::{OhlcvBar, closes};
use super::portfolio::Portfolio;
use super::position::{Trade, extract_trades};
use super::signal::{BUY_TRANSITION, SELL_TRANSITION, Signal, transitions};
use super::strategy::Strategy;
use chrono::NaiveDate;

pub const DEFAULT_INITIAL_CAPITAL: f64 = 100_000.0;
pub const DEFAULT_COMMISSION: f64 = 0.001;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    /// Fraction of notional charged on entry and on exit.
    pub commission: f64,
    pub risk_free_rate: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_capital: DEFAULT_INITIAL_CAPITAL,
            commission: DEFAULT_COMMISSION,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
        }
    }
}

/// One row of the per-bar result frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRow {
    pub date: NaiveDate,
    pub close: f64,
    pub signal: Signal,
    pub transition: i8,
    pub holdings: i64,
    pub cash: f64,
    pub total_value: f64,
    /// `None` on the first bar.
    pub daily_return: Option<f64>,
    pub buy_hold_value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub strategy: String,
    pub symbol: String,
    pub metrics: Metrics,
    pub trades: Vec<Trade>,
    pub frame: Vec<FrameRow>,
    /// Standard indicators plus any the strategy adds, aligned with `frame`.
    pub indicators: Vec<IndicatorColumn>,
}

impl BacktestResult {
    pub fn total_return(&self) -> f64 {
        self.metrics.total_return
    }

    pub fn final_value(&self) -> f64 {
        self.metrics.final_value
    }

    pub fn trade_count(&self) -> usize {
        self.trades.len()
    }
}

/// Step the portfolio through `bars`, trading only on +2 / -2 transitions.
///
/// Bar 0 only records the initial state. `signals` must hold one entry per bar.
pub fn simulate(bars: &[OhlcvBar], signals: &[Signal], config: &BacktestConfig) -> Portfolio {
    debug_assert_eq!(signals.len(), bars.len(), "one signal per bar");
    let positions = transitions(signals);
    let mut portfolio = Portfolio::new(config.initial_capital);

    for (i, bar) in bars.iter().enumerate() {
        let signal = signals.get(i).copied().unwrap_or_default();
        let transition = positions.get(i).copied().unwrap_or(0);

        if i > 0 {
            match transition {
                BUY_TRANSITION if portfolio.cash > 0.0 => {
                    match enter_long(&mut portfolio, bar.close, config.commission) {
                        EntryResult::Entered {
                            quantity, cost, ..
                        } => debug!(date = %bar.date, quantity, price = bar.close, cost, "buy"),
                        EntryResult::InsufficientCapital => {
                            debug!(date = %bar.date, price = bar.close, cash = portfolio.cash, "buy skipped: insufficient capital")
                        }
                    }
                }
                SELL_TRANSITION => {
                    if let Some(exit) = exit_long(&mut portfolio, bar.close, config.commission) {
                        debug!(
                            date = %bar.date,
                            quantity = exit.quantity,
                            price = exit.price,
                            proceeds = exit.proceeds,
                            "sell"
                        );
                    }
                }
                _ => {}
            }
        }

        portfolio.record(bar.date, bar.close, signal, transition);
    }

    portfolio
}

/// Run `strategy` over `bars` and compute its metrics.
pub fn run_backtest(
    symbol: &str,
    bars: &[OhlcvBar],
    strategy: &Strategy,
    config: &BacktestConfig,
) -> Result<BacktestResult, TradetipsError> {
    if bars.is_empty() {
        return Err(TradetipsError::NoData {
            symbol: symbol.to_string(),
        });
    }

    info!(
        strategy = strategy.name(),
        symbol,
        bars = bars.len(),
        "running backtest"
    );

    let indicator_types = frame_indicators(strategy);
    let indicators = compute_indicators(bars, &indicator_types);
    let signals = strategy.generate_signals(bars, &indicators);
    let portfolio = simulate(bars, &signals, config);

    let closes = closes(bars);
    let trades = extract_trades(&portfolio.records);
    let metrics = Metrics::compute(&portfolio, &closes, &trades, config.risk_free_rate);

    let returns = daily_returns(&portfolio.values());
    let buy_hold = buy_hold_values(&closes, config.initial_capital);
    let frame = portfolio
        .records
        .iter()
        .zip(returns)
        .zip(buy_hold)
        .map(|((record, daily_return), buy_hold_value)| FrameRow {
            date: record.date,
            close: record.close,
            signal: record.signal,
            transition: record.transition,
            holdings: record.holdings,
            cash: record.cash,
            total_value: record.total_value,
            daily_return,
            buy_hold_value,
        })
        .collect();

    info!(
        strategy = strategy.name(),
        symbol,
        total_return = metrics.total_return,
        trades = trades.len(),
        final_value = metrics.final_value,
        "backtest complete"
    );

    Ok(BacktestResult {
        strategy: strategy.name().to_string(),
        symbol: symbol.to_string(),
        metrics,
        trades,
        frame,
        indicators: indicators.columns(&indicator_types),
    })
}

/// Standard set first, then strategy-specific extras such as custom SMA windows.
fn frame_indicators(strategy: &Strategy) -> Vec<IndicatorType> {
    let mut types = standard_indicators();
    for t in strategy.required_indicators() {
        if !types.contains(&t) {
            types.push(t);
        }
    }
    types
}

/// Run every default strategy over the same bars, best total return first.
pub fn compare_strategies(
    symbol: &str,
    bars: &[OhlcvBar],
    config: &BacktestConfig,
) -> Result<Vec<BacktestResult>, TradetipsError> {
    let mut results = Strategy::all_defaults()
        .iter()
        .map(|strategy| run_backtest(symbol, bars, strategy, config))
        .collect::<Result<Vec<_>, _>>()?;

    results.sort_by(|a, b| b.total_return().total_cmp(&a.total_return()));
    Ok(results)
}
