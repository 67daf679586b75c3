//! Average True Range.
//!
//! TR[0] = H - L; TR[i] = max(H - L, |H - C[i-1]|, |L - C[i-1]|)
//! ATR(n) = trailing simple mean of TR. Warmup: first (n-1) bars.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{defined, rolling_mean, simple_series};
use crate::domain::ohlcv::OhlcvBar;

pub fn true_ranges(bars: &[OhlcvBar]) -> Vec<f64> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            if i == 0 {
                bar.high - bar.low
            } else {
                bar.true_range(bars[i - 1].close)
            }
        })
        .collect()
}

pub fn calculate_atr(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let values = rolling_mean(&defined(&true_ranges(bars)), period);
    simple_series(bars, IndicatorType::Atr(period), &values)
}
