//! Volume indicators: volume SMA and volume ratio.
//!
//! VolumeRatio(n)[i] = V[i] / mean(V[i-n+1..=i]), invalid when the mean is 0.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{defined, rolling_mean, simple_series};
use crate::domain::ohlcv::OhlcvBar;

fn volumes(bars: &[OhlcvBar]) -> Vec<Option<f64>> {
    defined(&bars.iter().map(|b| b.volume as f64).collect::<Vec<_>>())
}

pub fn calculate_volume_sma(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let values = rolling_mean(&volumes(bars), period);
    simple_series(bars, IndicatorType::VolumeSma(period), &values)
}

pub fn calculate_volume_ratio(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let averages = rolling_mean(&volumes(bars), period);
    let values: Vec<Option<f64>> = bars
        .iter()
        .zip(averages)
        .map(|(bar, avg)| {
            let avg = avg?;
            (avg > 0.0).then(|| bar.volume as f64 / avg)
        })
        .collect();

    simple_series(bars, IndicatorType::VolumeRatio(period), &values)
}
