//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! Default parameters: fast=12, slow=26, signal=9
//! All three averages are bias-adjusted, so every bar is valid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::indicator_helpers::adjusted_ema;
use crate::domain::ohlcv::{closes, OhlcvBar};

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

pub fn calculate_macd(
    bars: &[OhlcvBar],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> IndicatorSeries {
    let indicator_type = IndicatorType::Macd {
        fast,
        slow,
        signal: signal_period,
    };

    if bars.is_empty() || fast == 0 || slow == 0 || signal_period == 0 {
        return IndicatorSeries {
            indicator_type,
            values: Vec::new(),
        };
    }

    let prices = closes(bars);
    let ema_fast = adjusted_ema(&prices, fast);
    let ema_slow = adjusted_ema(&prices, slow);

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = adjusted_ema(&macd_line, signal_period);

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| IndicatorPoint {
            date: bar.date,
            valid: true,
            value: IndicatorValue::Macd {
                line: macd_line[i],
                signal: signal_line[i],
                histogram: macd_line[i] - signal_line[i],
            },
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_macd(bars: &[OhlcvBar]) -> IndicatorSeries {
        calculate_macd(bars, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
    }
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<OhlcvBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                date: start + chrono::Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }

    fn ramp(n: usize) -> Vec<OhlcvBar> {
        make_bars(&(0..n).map(|i| 100.0 + i as f64).collect::<Vec<_>>())
    }

    #[test]
    fn macd_histogram_equals_line_minus_signal() {
        let series = default_macd(&ramp(40));

        for point in &series.values {
            if let IndicatorValue::Macd {
                line,
                signal,
                histogram,
            } = point.value
            {
                assert!((histogram - (line - signal)).abs() < f64::EPSILON);
            }
        }
    }

    #[test]
    fn macd_line_is_ema_fast_minus_ema_slow() {
        let bars = ramp(10);
        let series = calculate_macd(&bars, 3, 5, 2);
        let prices = closes(&bars);
        let fast = adjusted_ema(&prices, 3);
        let slow = adjusted_ema(&prices, 5);

        for (i, point) in series.values.iter().enumerate() {
            if let IndicatorValue::Macd { line, .. } = point.value {
                assert!(
                    (line - (fast[i] - slow[i])).abs() < f64::EPSILON,
                    "MACD line mismatch at index {}",
                    i
                );
            }
        }
    }

    #[test]
    fn macd_positive_in_uptrend() {
        let series = default_macd(&ramp(60));
        if let IndicatorValue::Macd { line, .. } = series.values[59].value {
            assert!(line > 0.0);
        } else {
            panic!("Expected Macd value");
        }
    }

    #[test]
    fn macd_flat_is_zero() {
        let series = default_macd(&make_bars(&[250.75; 40]));
        for point in &series.values {
            assert_eq!(
                point.value,
                IndicatorValue::Macd {
                    line: 0.0,
                    signal: 0.0,
                    histogram: 0.0
                }
            );
        }
    }

    #[test]
    fn macd_indicator_type() {
        let series = calculate_macd(&ramp(3), 5, 10, 3);
        assert_eq!(
            series.indicator_type,
            IndicatorType::Macd {
                fast: 5,
                slow: 10,
                signal: 3
            }
        );
    }

    #[test]
    fn macd_empty_bars() {
        assert!(default_macd(&[]).values.is_empty());
    }

    #[test]
    fn macd_zero_period() {
        let bars = ramp(3);
        assert!(calculate_macd(&bars, 0, 26, 9).values.is_empty());
        assert!(calculate_macd(&bars, 12, 0, 9).values.is_empty());
        assert!(calculate_macd(&bars, 12, 26, 0).values.is_empty());
    }
}
