//! ROC (Rate of Change) indicator.
//!
//! ROC(n)[i] = ((C[i] - C[i-n]) / C[i-n]) * 100
//! If C[i-n] == 0: ROC = 0
//! Warmup: first n bars invalid.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::simple_series;
use crate::domain::ohlcv::{closes, OhlcvBar};

pub fn calculate_roc(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let prices = closes(bars);
    let values: Vec<Option<f64>> = (0..prices.len())
        .map(|i| {
            if period == 0 || i < period {
                return None;
            }
            let base = prices[i - period];
            Some(if base == 0.0 { 0.0 } else { (prices[i] - base) / base * 100.0 })
        })
        .collect();

    simple_series(bars, IndicatorType::Roc(period), &values)
}
