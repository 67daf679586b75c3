//! Annualised close-to-close volatility.
//!
//! r[i] = C[i] / C[i-1] - 1; Volatility(n) = sample stddev of the last n
//! returns * sqrt(252). Warmup: first n bars (bar 0 has no return).

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{rolling_stddev, simple_series};
use crate::domain::metrics::{TRADING_DAYS_PER_YEAR, daily_returns};
use crate::domain::ohlcv::{closes, OhlcvBar};

pub fn calculate_volatility(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let values: Vec<Option<f64>> = rolling_stddev(&daily_returns(&closes(bars)), period)
        .into_iter()
        .map(|s| s.map(|s| s * TRADING_DAYS_PER_YEAR.sqrt()))
        .collect();

    simple_series(bars, IndicatorType::Volatility(period), &values)
}
