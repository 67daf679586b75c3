//! Money Flow Index.
//!
//! Raw flow = typical price * volume, counted as positive when the typical
//! price rose from the previous bar and negative when it fell.
//! MFI(n) = 100 - 100 / (1 + sum_pos(n) / sum_neg(n)), guarded like RSI.
//! Warmup: first (n-1) bars.

use crate::domain::indicator::rsi::strength_index;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{defined, rolling_sum, simple_series};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_mfi(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let mut positive = Vec::with_capacity(bars.len());
    let mut negative = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let tp = bar.typical_price();
        let flow = tp * bar.volume as f64;
        let prev_tp = if i == 0 { tp } else { bars[i - 1].typical_price() };
        positive.push(if tp > prev_tp { flow } else { 0.0 });
        negative.push(if tp < prev_tp { flow } else { 0.0 });
    }

    let pos_sum = rolling_sum(&defined(&positive), period);
    let neg_sum = rolling_sum(&defined(&negative), period);

    let values: Vec<Option<f64>> = pos_sum
        .iter()
        .zip(&neg_sum)
        .map(|(p, n)| match (p, n) {
            (Some(p), Some(n)) => Some(strength_index(*p, *n)),
            _ => None,
        })
        .collect();

    simple_series(bars, IndicatorType::Mfi(period), &values)
}
