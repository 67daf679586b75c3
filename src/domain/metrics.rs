//! Performance metrics and trade statistics.

use super::indicator_helpers::{mean, sample_stddev};
use super::portfolio::Portfolio;
use super::position::Trade;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.05;

#[derive(Debug, Clone, PartialEq)]
pub struct TradeStats {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate: f64,
    pub avg_win: f64,
    /// Mean absolute loss.
    pub avg_loss: f64,
    /// Gross wins over gross |losses|; `f64::INFINITY` with no losing trade,
    /// 0 with no trades at all.
    pub profit_factor: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub avg_duration_days: f64,
}

impl TradeStats {
    pub fn compute(trades: &[Trade]) -> Self {
        if trades.is_empty() {
            return TradeStats {
                total_trades: 0,
                winning_trades: 0,
                losing_trades: 0,
                win_rate: 0.0,
                avg_win: 0.0,
                avg_loss: 0.0,
                profit_factor: 0.0,
                largest_win: 0.0,
                largest_loss: 0.0,
                avg_duration_days: 0.0,
            };
        }

        let mut winning_trades = 0usize;
        let mut losing_trades = 0usize;
        let mut total_wins = 0.0_f64;
        let mut total_losses = 0.0_f64;
        let mut largest_win = 0.0_f64;
        let mut largest_loss = 0.0_f64;
        let mut total_duration_days = 0i64;

        for trade in trades {
            let pnl = trade.profit_loss;
            if trade.is_win() {
                winning_trades += 1;
                total_wins += pnl;
                largest_win = largest_win.max(pnl);
            } else if trade.is_loss() {
                losing_trades += 1;
                total_losses += pnl.abs();
                largest_loss = largest_loss.max(pnl.abs());
            }
            total_duration_days += trade.duration_days;
        }

        let total_trades = trades.len();

        let profit_factor = if total_losses > 0.0 {
            total_wins / total_losses
        } else {
            f64::INFINITY
        };

        let avg_win = if winning_trades > 0 {
            total_wins / winning_trades as f64
        } else {
            0.0
        };

        let avg_loss = if losing_trades > 0 {
            total_losses / losing_trades as f64
        } else {
            0.0
        };

        TradeStats {
            total_trades,
            winning_trades,
            losing_trades,
            win_rate: winning_trades as f64 / total_trades as f64,
            avg_win,
            avg_loss,
            profit_factor,
            largest_win,
            largest_loss,
            avg_duration_days: total_duration_days as f64 / total_trades as f64,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_return: f64,
    pub buy_hold_return: f64,
    pub excess_return: f64,
    pub sharpe_ratio: f64,
    /// Non-positive fraction.
    pub max_drawdown: f64,
    pub final_value: f64,
    pub trade_stats: TradeStats,
}

impl Metrics {
    pub fn compute(
        portfolio: &Portfolio,
        closes: &[f64],
        trades: &[Trade],
        risk_free_rate: f64,
    ) -> Self {
        let initial_capital = portfolio.initial_capital;
        let final_value = portfolio.final_value();

        let total_return = if initial_capital > 0.0 {
            (final_value - initial_capital) / initial_capital
        } else {
            0.0
        };
        let buy_hold_return = buy_hold_return(closes);

        let values = portfolio.values();
        let returns: Vec<f64> = daily_returns(&values).into_iter().flatten().collect();

        Metrics {
            total_return,
            buy_hold_return,
            excess_return: total_return - buy_hold_return,
            sharpe_ratio: sharpe_ratio(&returns, risk_free_rate),
            max_drawdown: max_drawdown(&values),
            final_value,
            trade_stats: TradeStats::compute(trades),
        }
    }
}

/// Percent change per bar; `None` for the first bar. A non-positive previous
/// value yields 0.
pub fn daily_returns(values: &[f64]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    for (i, &v) in values.iter().enumerate() {
        if i == 0 {
            out.push(None);
            continue;
        }
        let prev = values[i - 1];
        out.push(Some(if prev > 0.0 { v / prev - 1.0 } else { 0.0 }));
    }
    out
}

/// (mean - rf/252) / sample stddev * sqrt(252). 0 when the stddev is 0 or
/// fewer than two returns exist.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    let stddev = sample_stddev(returns);
    if stddev == 0.0 || !stddev.is_finite() {
        return 0.0;
    }
    let excess = mean(returns) - risk_free_rate / TRADING_DAYS_PER_YEAR;
    excess / stddev * TRADING_DAYS_PER_YEAR.sqrt()
}

/// min over time of (value - running peak) / running peak.
pub fn max_drawdown(values: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;
    for &v in values {
        peak = peak.max(v);
        if peak > 0.0 {
            worst = worst.min((v - peak) / peak);
        }
    }
    worst
}

/// (last close - first close) / first close.
pub fn buy_hold_return(closes: &[f64]) -> f64 {
    match (closes.first(), closes.last()) {
        (Some(&first), Some(&last)) if first != 0.0 => (last - first) / first,
        _ => 0.0,
    }
}

/// Equity of buying at the first close with all capital, no commission.
pub fn buy_hold_values(closes: &[f64], initial_capital: f64) -> Vec<f64> {
    match closes.first() {
        Some(&first) if first != 0.0 => closes
            .iter()
            .map(|c| initial_capital * c / first)
            .collect(),
        _ => vec![initial_capital; closes.len()],
    }
}
