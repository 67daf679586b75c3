//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! StdDev is the sample standard deviation (divides by N-1).
//! The squeeze ratio is (Upper - Lower) / Middle.
//!
//! Default parameters: period=20, multiplier=2.0
//! Warmup: first (period-1) bars are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::indicator_helpers::{defined, rolling_mean, rolling_stddev, simple_series};
use crate::domain::ohlcv::{closes, OhlcvBar};

pub fn calculate_bollinger(
    bars: &[OhlcvBar],
    period: usize,
    stddev_mult_x100: u32,
) -> IndicatorSeries {
    let bands = bands(bars, period, stddev_mult_x100);

    let values = bars
        .iter()
        .zip(bands)
        .map(|(bar, band)| {
            let (upper, middle, lower) = band.unwrap_or((0.0, 0.0, 0.0));
            IndicatorPoint {
                date: bar.date,
                valid: band.is_some(),
                value: IndicatorValue::Bollinger {
                    upper,
                    middle,
                    lower,
                },
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Bollinger {
            period,
            stddev_mult_x100,
        },
        values,
    }
}

/// Band width relative to the middle band. Invalid where the middle is zero.
pub fn calculate_squeeze(
    bars: &[OhlcvBar],
    period: usize,
    stddev_mult_x100: u32,
) -> IndicatorSeries {
    let values: Vec<Option<f64>> = bands(bars, period, stddev_mult_x100)
        .into_iter()
        .map(|band| {
            let (upper, middle, lower) = band?;
            (middle != 0.0).then(|| (upper - lower) / middle)
        })
        .collect();

    simple_series(
        bars,
        IndicatorType::BollingerSqueeze {
            period,
            stddev_mult_x100,
        },
        &values,
    )
}

fn bands(bars: &[OhlcvBar], period: usize, stddev_mult_x100: u32) -> Vec<Option<(f64, f64, f64)>> {
    let mult = stddev_mult_x100 as f64 / 100.0;
    let prices = defined(&closes(bars));
    let middle = rolling_mean(&prices, period);
    let stddev = rolling_stddev(&prices, period);

    middle
        .iter()
        .zip(&stddev)
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => Some((m + mult * s, *m, m - mult * s)),
            _ => None,
        })
        .collect()
}
