//! Williams %R.
//!
//! %R(n) = -100 * (HH(n) - C) / (HH(n) - LL(n)), in [-100, 0].
//! Invalid where the range is zero. Warmup: first (n-1) bars.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{defined, rolling_max, rolling_min, simple_series};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_williams_r(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let highs = defined(&bars.iter().map(|b| b.high).collect::<Vec<_>>());
    let lows = defined(&bars.iter().map(|b| b.low).collect::<Vec<_>>());
    let highest = rolling_max(&highs, period);
    let lowest = rolling_min(&lows, period);

    let values: Vec<Option<f64>> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let (hh, ll) = (highest[i]?, lowest[i]?);
            let range = hh - ll;
            (range != 0.0).then(|| -100.0 * (hh - bar.close) / range)
        })
        .collect();

    simple_series(bars, IndicatorType::WilliamsR(period), &values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bar(day: u32, high: f64, low: f64, close: f64) -> OhlcvBar {
        OhlcvBar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close,
            high,
            low,
            close,
            volume: 1000,
        }
    }

    #[test]
    fn williams_bounds() {
        let bars = vec![
            make_bar(1, 20.0, 10.0, 15.0),
            make_bar(2, 22.0, 12.0, 22.0),
            make_bar(3, 21.0, 9.0, 9.0),
        ];
        let series = calculate_williams_r(&bars, 2);
        assert!(!series.values[0].valid);
        // close at highest high
        assert!(series.simple_at(1).unwrap().abs() < 1e-9);
        // close at lowest low
        assert!((series.simple_at(2).unwrap() + 100.0).abs() < 1e-9);
    }

    #[test]
    fn williams_midpoint() {
        let bars = vec![make_bar(1, 20.0, 10.0, 15.0)];
        let series = calculate_williams_r(&bars, 1);
        assert!((series.simple_at(0).unwrap() + 50.0).abs() < 1e-9);
    }
}
