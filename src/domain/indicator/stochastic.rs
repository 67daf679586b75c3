//! Stochastic oscillator.
//!
//! %K(n) = (C - LL(n)) / (HH(n) - LL(n)) * 100
//! %D(m) = mean of the last m %K values
//! Bars with a zero high-low range have no %K.
//! Warmup: %K needs n bars, %D another (m-1).

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::indicator_helpers::{defined, rolling_max, rolling_mean, rolling_min};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_stochastic(bars: &[OhlcvBar], k_period: usize, d_period: usize) -> IndicatorSeries {
    let highs = defined(&bars.iter().map(|b| b.high).collect::<Vec<_>>());
    let lows = defined(&bars.iter().map(|b| b.low).collect::<Vec<_>>());
    let highest = rolling_max(&highs, k_period);
    let lowest = rolling_min(&lows, k_period);

    let k: Vec<Option<f64>> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let (hh, ll) = (highest[i]?, lowest[i]?);
            let range = hh - ll;
            (range != 0.0).then(|| (bar.close - ll) / range * 100.0)
        })
        .collect();
    let d = rolling_mean(&k, d_period);

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| IndicatorPoint {
            date: bar.date,
            valid: k[i].is_some() && d[i].is_some(),
            value: IndicatorValue::Stochastic {
                k: k[i].unwrap_or(0.0),
                d: d[i].unwrap_or(0.0),
            },
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Stochastic { k_period, d_period },
        values,
    }
}
