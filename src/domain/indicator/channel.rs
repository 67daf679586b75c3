//! Rolling support/resistance channel.
//!
//! Support = lowest low, Resistance = highest high over n bars.
//! Distances are percentages of the close:
//! to resistance = (R - C) / C * 100, to support = (C - S) / C * 100.
//! Warmup: first (n-1) bars.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::indicator_helpers::{defined, rolling_max, rolling_min};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_channel(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let highs = defined(&bars.iter().map(|b| b.high).collect::<Vec<_>>());
    let lows = defined(&bars.iter().map(|b| b.low).collect::<Vec<_>>());
    let resistance = rolling_max(&highs, period);
    let support = rolling_min(&lows, period);

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| match (support[i], resistance[i]) {
            (Some(s), Some(r)) if bar.close != 0.0 => IndicatorPoint {
                date: bar.date,
                valid: true,
                value: IndicatorValue::Channel {
                    support: s,
                    resistance: r,
                    distance_to_support: (bar.close - s) / bar.close * 100.0,
                    distance_to_resistance: (r - bar.close) / bar.close * 100.0,
                },
            },
            _ => IndicatorPoint {
                date: bar.date,
                valid: false,
                value: IndicatorValue::Channel {
                    support: 0.0,
                    resistance: 0.0,
                    distance_to_support: 0.0,
                    distance_to_resistance: 0.0,
                },
            },
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Channel(period),
        values,
    }
}
