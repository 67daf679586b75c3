//! Exponential Moving Average indicator.
//!
//! Span-based smoothing a = 2/(n+1), bias-adjusted so the average is defined
//! from the first bar: EMA[t] = sum((1-a)^i * C[t-i]) / sum((1-a)^i).
//! No warmup.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{adjusted_ema, defined, simple_series};
use crate::domain::ohlcv::{closes, OhlcvBar};

pub fn calculate_ema(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    if period == 0 || bars.is_empty() {
        return IndicatorSeries {
            indicator_type: IndicatorType::Ema(period),
            values: Vec::new(),
        };
    }

    let values = adjusted_ema(&closes(bars), period);
    simple_series(bars, IndicatorType::Ema(period), &defined(&values))
}
