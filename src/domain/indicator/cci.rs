//! Commodity Channel Index.
//!
//! CCI(n) = (TP - SMA(TP, n)) / (0.015 * MAD(TP, n)), where MAD is the mean
//! absolute deviation from the window mean. Zero when MAD is zero.
//! Warmup: first (n-1) bars.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{defined, mean, rolling, simple_series};
use crate::domain::ohlcv::OhlcvBar;

const LAMBERT_CONSTANT: f64 = 0.015;

pub fn calculate_cci(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let typical = defined(&bars.iter().map(|b| b.typical_price()).collect::<Vec<_>>());

    let values = rolling(&typical, period, |window| {
        let m = mean(window);
        let mad = window.iter().map(|v| (v - m).abs()).sum::<f64>() / window.len() as f64;
        let current = window[window.len() - 1];
        if mad == 0.0 {
            Some(0.0)
        } else {
            Some((current - m) / (LAMBERT_CONSTANT * mad))
        }
    });

    simple_series(bars, IndicatorType::Cci(period), &values)
}
