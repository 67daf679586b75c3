//! Simple Moving Average indicator.
//!
//! SMA(n)[i] = mean(C[i-n+1..=i])
//! Warmup: first (n-1) bars are invalid.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{defined, rolling_mean, simple_series};
use crate::domain::ohlcv::{closes, OhlcvBar};

pub fn calculate_sma(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let values = rolling_mean(&defined(&closes(bars)), period);
    simple_series(bars, IndicatorType::Sma(period), &values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::IndicatorValue;
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<OhlcvBar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                date: NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn sma_warmup() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0]);
        let series = calculate_sma(&bars, 3);

        assert!(!series.values[0].valid);
        assert!(!series.values[1].valid);
        assert!(series.values[2].valid);
        assert!(series.values[3].valid);
    }

    #[test]
    fn sma_values() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0]);
        let series = calculate_sma(&bars, 3);

        assert!((series.simple_at(2).unwrap() - 20.0).abs() < 1e-12);
        assert!((series.simple_at(3).unwrap() - 30.0).abs() < 1e-12);
    }

    #[test]
    fn sma_shorter_than_period_is_all_invalid() {
        let bars = make_bars(&[10.0, 20.0]);
        let series = calculate_sma(&bars, 50);
        assert_eq!(series.values.len(), 2);
        assert_eq!(series.valid_count(), 0);
    }

    #[test]
    fn sma_flat_equals_price() {
        let bars = make_bars(&[57.3; 25]);
        let series = calculate_sma(&bars, 20);
        assert_eq!(series.values[24].value, IndicatorValue::Simple(57.3));
    }

    #[test]
    fn sma_indicator_type() {
        let bars = make_bars(&[1.0]);
        assert_eq!(calculate_sma(&bars, 20).indicator_type, IndicatorType::Sma(20));
    }
}
