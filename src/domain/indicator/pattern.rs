//! Two-bar price pattern flags.
//!
//! HigherHigh = 1 when H[i] > H[i-1] > H[i-2], LowerLow = 1 when
//! L[i] < L[i-1] < L[i-2], otherwise 0. Always valid; the first two bars are 0.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::simple_series;
use crate::domain::ohlcv::OhlcvBar;

fn flags<F>(bars: &[OhlcvBar], indicator_type: IndicatorType, test: F) -> IndicatorSeries
where
    F: Fn(&OhlcvBar, &OhlcvBar, &OhlcvBar) -> bool,
{
    let values: Vec<Option<f64>> = (0..bars.len())
        .map(|i| {
            let hit = i >= 2 && test(&bars[i], &bars[i - 1], &bars[i - 2]);
            Some(if hit { 1.0 } else { 0.0 })
        })
        .collect();
    simple_series(bars, indicator_type, &values)
}

pub fn calculate_higher_high(bars: &[OhlcvBar]) -> IndicatorSeries {
    flags(bars, IndicatorType::HigherHigh, |cur, prev, prev2| {
        cur.high > prev.high && prev.high > prev2.high
    })
}

pub fn calculate_lower_low(bars: &[OhlcvBar]) -> IndicatorSeries {
    flags(bars, IndicatorType::LowerLow, |cur, prev, prev2| {
        cur.low < prev.low && prev.low < prev2.low
    })
}
