//! RSI (Relative Strength Index) indicator.
//!
//! Day-over-day close changes are split into gains and losses (the first
//! bar's change counts as zero), then averaged with a trailing simple mean:
//! RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//!
//! Guards: avg_loss == 0 gives 100, or 50 when avg_gain is also 0 (flat window).
//! Warmup: first (n-1) bars are invalid.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{defined, rolling_mean, simple_series};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_rsi(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let mut gains = Vec::with_capacity(bars.len());
    let mut losses = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let change = if i == 0 { 0.0 } else { bar.close - bars[i - 1].close };
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    let avg_gain = rolling_mean(&defined(&gains), period);
    let avg_loss = rolling_mean(&defined(&losses), period);

    let values: Vec<Option<f64>> = avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(g, l)| match (g, l) {
            (Some(g), Some(l)) => Some(strength_index(*g, *l)),
            _ => None,
        })
        .collect();

    simple_series(bars, IndicatorType::Rsi(period), &values)
}

/// 100 - 100 / (1 + up / down), guarded for a zero denominator.
pub fn strength_index(up: f64, down: f64) -> f64 {
    if down == 0.0 {
        if up == 0.0 { 50.0 } else { 100.0 }
    } else {
        100.0 - (100.0 / (1.0 + up / down))
    }
}
