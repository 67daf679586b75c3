//! Shared helper functions for indicator calculations.
//!
//! Rolling-window primitives return one `Option<f64>` per input element; the
//! first `period - 1` elements are `None`, as is any window touching a `None`.

use crate::domain::indicator::{
    atr, bollinger, cci, channel, ema, macd, mfi, pattern, roc, rsi, sma, stochastic, volatility,
    volume, williams, IndicatorPoint, IndicatorSeries, IndicatorSet, IndicatorTable,
    IndicatorType, IndicatorValue,
};
use crate::domain::error::TradetipsError;
use crate::domain::ohlcv::{closes, OhlcvBar};

/// Compute every requested indicator over `bars`. Duplicates are computed once.
pub fn compute_indicators(bars: &[OhlcvBar], types: &[IndicatorType]) -> IndicatorSet {
    let mut set = IndicatorSet::new(bars.len());
    for indicator_type in types {
        if set.contains(indicator_type) {
            continue;
        }
        set.insert(compute_indicator(bars, *indicator_type));
    }
    set
}

/// Compute `types` over `bars` and flatten them into a per-bar table.
pub fn indicator_table(
    symbol: &str,
    bars: &[OhlcvBar],
    types: &[IndicatorType],
) -> Result<IndicatorTable, TradetipsError> {
    if bars.is_empty() {
        return Err(TradetipsError::NoData {
            symbol: symbol.to_string(),
        });
    }

    let set = compute_indicators(bars, types);
    Ok(IndicatorTable {
        symbol: symbol.to_string(),
        dates: bars.iter().map(|b| b.date).collect(),
        closes: closes(bars),
        columns: set.columns(types),
    })
}

pub fn compute_indicator(bars: &[OhlcvBar], indicator_type: IndicatorType) -> IndicatorSeries {
    match indicator_type {
        IndicatorType::Sma(period) => sma::calculate_sma(bars, period),
        IndicatorType::Ema(period) => ema::calculate_ema(bars, period),
        IndicatorType::Rsi(period) => rsi::calculate_rsi(bars, period),
        IndicatorType::Macd { fast, slow, signal } => {
            macd::calculate_macd(bars, fast, slow, signal)
        }
        IndicatorType::Bollinger {
            period,
            stddev_mult_x100,
        } => bollinger::calculate_bollinger(bars, period, stddev_mult_x100),
        IndicatorType::VolumeSma(period) => volume::calculate_volume_sma(bars, period),
        IndicatorType::VolumeRatio(period) => volume::calculate_volume_ratio(bars, period),
        IndicatorType::Stochastic { k_period, d_period } => {
            stochastic::calculate_stochastic(bars, k_period, d_period)
        }
        IndicatorType::WilliamsR(period) => williams::calculate_williams_r(bars, period),
        IndicatorType::Atr(period) => atr::calculate_atr(bars, period),
        IndicatorType::Mfi(period) => mfi::calculate_mfi(bars, period),
        IndicatorType::Cci(period) => cci::calculate_cci(bars, period),
        IndicatorType::Roc(period) => roc::calculate_roc(bars, period),
        IndicatorType::Channel(period) => channel::calculate_channel(bars, period),
        IndicatorType::Volatility(period) => volatility::calculate_volatility(bars, period),
        IndicatorType::BollingerSqueeze {
            period,
            stddev_mult_x100,
        } => bollinger::calculate_squeeze(bars, period, stddev_mult_x100),
        IndicatorType::HigherHigh => pattern::calculate_higher_high(bars),
        IndicatorType::LowerLow => pattern::calculate_lower_low(bars),
    }
}

/// Build a `Simple` series from per-bar optional values.
pub fn simple_series(
    bars: &[OhlcvBar],
    indicator_type: IndicatorType,
    values: &[Option<f64>],
) -> IndicatorSeries {
    let values = bars
        .iter()
        .zip(values)
        .map(|(bar, v)| IndicatorPoint {
            date: bar.date,
            valid: v.is_some(),
            value: IndicatorValue::Simple(v.unwrap_or(0.0)),
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}

/// Apply `f` to every full window of `period` consecutive defined values.
pub fn rolling<F>(values: &[Option<f64>], period: usize, f: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> Option<f64>,
{
    let mut out = vec![None; values.len()];
    if period == 0 {
        return out;
    }

    let mut window = Vec::with_capacity(period);
    for i in (period - 1)..values.len() {
        window.clear();
        for v in &values[i + 1 - period..=i] {
            match v {
                Some(x) => window.push(*x),
                None => break,
            }
        }
        if window.len() == period {
            out[i] = f(&window);
        }
    }
    out
}

/// Arithmetic mean, anchored on the first element: a constant window yields
/// exactly that constant.
pub fn mean(window: &[f64]) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    let base = window[0];
    base + window.iter().map(|v| v - base).sum::<f64>() / window.len() as f64
}

/// Sample standard deviation (n - 1 denominator). Zero for fewer than two values.
pub fn sample_stddev(window: &[f64]) -> f64 {
    if window.len() < 2 {
        return 0.0;
    }
    let m = mean(window);
    let variance = window.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (window.len() - 1) as f64;
    variance.sqrt()
}

pub fn rolling_mean(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, |w| Some(mean(w)))
}

pub fn rolling_sum(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, |w| Some(w.iter().sum()))
}

pub fn rolling_stddev(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, |w| Some(sample_stddev(w)))
}

pub fn rolling_max(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, |w| w.iter().copied().reduce(f64::max))
}

pub fn rolling_min(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, |w| w.iter().copied().reduce(f64::min))
}

/// Span-based exponential average, bias-adjusted over the observed history.
///
/// Equivalent to `sum((1-a)^i * x[t-i]) / sum((1-a)^i)` with `a = 2/(span+1)`,
/// evaluated incrementally as `y += (x - y) / weight_sum`. Defined from the
/// first value; a constant input yields exactly that constant.
pub fn adjusted_ema(values: &[f64], span: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    if span == 0 {
        return out;
    }

    let decay = 1.0 - 2.0 / (span as f64 + 1.0);
    let mut weight_sum = 0.0;
    let mut ema = 0.0;
    for (i, &x) in values.iter().enumerate() {
        weight_sum = 1.0 + decay * weight_sum;
        ema = if i == 0 { x } else { ema + (x - ema) / weight_sum };
        out.push(ema);
    }
    out
}

/// Wrap a fully defined column as `Some` values.
pub fn defined(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().copied().map(Some).collect()
}
