//! Technical indicator implementations.
//!
//! This module provides types for representing indicator values and series:
//! - `IndicatorPoint`: A single point in an indicator time series
//! - `IndicatorValue`: Enum for different indicator output shapes
//! - `IndicatorType`: Enum for indicator identity + parameters (serves as HashMap key)
//! - `IndicatorSeries`: A time series of indicator values
//! - `IndicatorSet`: Every series computed for one bar sequence, keyed by type
//! - `IndicatorColumn`: One flattened output column, for per-bar reports

pub mod atr;
pub mod bollinger;
pub mod cci;
pub mod channel;
pub mod ema;
pub mod macd;
pub mod mfi;
pub mod pattern;
pub mod roc;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod volatility;
pub mod volume;
pub mod williams;

pub use ema::calculate_ema;
pub use sma::calculate_sma;

use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: IndicatorValue,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorValue {
    Simple(f64),
    Macd {
        line: f64,
        signal: f64,
        histogram: f64,
    },
    Stochastic {
        k: f64,
        d: f64,
    },
    Bollinger {
        upper: f64,
        middle: f64,
        lower: f64,
    },
    Channel {
        support: f64,
        resistance: f64,
        distance_to_support: f64,
        distance_to_resistance: f64,
    },
}

impl IndicatorValue {
    /// Scalar components in the order of [`IndicatorType::component_names`].
    pub fn components(&self) -> Vec<f64> {
        match *self {
            IndicatorValue::Simple(v) => vec![v],
            IndicatorValue::Macd {
                line,
                signal,
                histogram,
            } => vec![line, signal, histogram],
            IndicatorValue::Stochastic { k, d } => vec![k, d],
            IndicatorValue::Bollinger {
                upper,
                middle,
                lower,
            } => vec![upper, middle, lower],
            IndicatorValue::Channel {
                support,
                resistance,
                distance_to_support,
                distance_to_resistance,
            } => vec![support, resistance, distance_to_support, distance_to_resistance],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Bollinger {
        period: usize,
        stddev_mult_x100: u32,
    },
    VolumeSma(usize),
    VolumeRatio(usize),
    Stochastic {
        k_period: usize,
        d_period: usize,
    },
    WilliamsR(usize),
    Atr(usize),
    Mfi(usize),
    Cci(usize),
    Roc(usize),
    Channel(usize),
    Volatility(usize),
    BollingerSqueeze {
        period: usize,
        stddev_mult_x100: u32,
    },
    HigherHigh,
    LowerLow,
}

pub const SMA_SHORT: IndicatorType = IndicatorType::Sma(20);
pub const SMA_LONG: IndicatorType = IndicatorType::Sma(50);
pub const RSI_14: IndicatorType = IndicatorType::Rsi(14);
pub const MACD_DEFAULT: IndicatorType = IndicatorType::Macd {
    fast: macd::DEFAULT_FAST,
    slow: macd::DEFAULT_SLOW,
    signal: macd::DEFAULT_SIGNAL,
};
pub const BOLLINGER_DEFAULT: IndicatorType = IndicatorType::Bollinger {
    period: 20,
    stddev_mult_x100: 200,
};
pub const VOLUME_RATIO_20: IndicatorType = IndicatorType::VolumeRatio(20);

impl IndicatorType {
    /// Suffixes of multi-valued outputs; empty for a single value.
    pub fn component_names(&self) -> &'static [&'static str] {
        match self {
            IndicatorType::Macd { .. } => &["line", "signal", "hist"],
            IndicatorType::Stochastic { .. } => &["K", "D"],
            IndicatorType::Bollinger { .. } => &["upper", "middle", "lower"],
            IndicatorType::Channel(_) => &[
                "support",
                "resistance",
                "support_dist",
                "resistance_dist",
            ],
            _ => &[],
        }
    }

    /// Display name made safe for a CSV header: `MACD(12,26,9)` -> `MACD_12_26_9`.
    pub fn column_prefix(&self) -> String {
        self.to_string().replace(['(', ','], "_").replace(')', "")
    }

    /// Header names of every column this indicator flattens into.
    pub fn column_names(&self) -> Vec<String> {
        let prefix = self.column_prefix();
        match self.component_names() {
            [] => vec![prefix],
            parts => parts.iter().map(|p| format!("{}_{}", prefix, p)).collect(),
        }
    }
}

/// Indicators the basic dashboard and every strategy draw from.
pub fn standard_indicators() -> Vec<IndicatorType> {
    vec![
        SMA_SHORT,
        SMA_LONG,
        IndicatorType::Ema(12),
        IndicatorType::Ema(26),
        MACD_DEFAULT,
        RSI_14,
        BOLLINGER_DEFAULT,
        IndicatorType::VolumeSma(20),
        VOLUME_RATIO_20,
    ]
}

/// Standard set plus the momentum, volatility and pattern extras.
pub fn enhanced_indicators() -> Vec<IndicatorType> {
    let mut types = standard_indicators();
    types.extend([
        IndicatorType::Stochastic {
            k_period: 14,
            d_period: 3,
        },
        IndicatorType::WilliamsR(14),
        IndicatorType::Atr(14),
        IndicatorType::Mfi(14),
        IndicatorType::Cci(20),
        IndicatorType::Roc(12),
        IndicatorType::Channel(20),
        IndicatorType::Volatility(20),
        IndicatorType::BollingerSqueeze {
            period: 20,
            stddev_mult_x100: 200,
        },
        IndicatorType::HigherHigh,
        IndicatorType::LowerLow,
    ]);
    types
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// The value at `index` if it exists and is past warm-up.
    pub fn value_at(&self, index: usize) -> Option<IndicatorValue> {
        self.values
            .get(index)
            .filter(|p| p.valid)
            .map(|p| p.value)
    }

    pub fn simple_at(&self, index: usize) -> Option<f64> {
        match self.value_at(index)? {
            IndicatorValue::Simple(v) => Some(v),
            _ => None,
        }
    }

    pub fn valid_count(&self) -> usize {
        self.values.iter().filter(|p| p.valid).count()
    }
}

/// All indicator series computed for one bar sequence.
#[derive(Debug, Clone, Default)]
pub struct IndicatorSet {
    len: usize,
    series: HashMap<IndicatorType, IndicatorSeries>,
}

impl IndicatorSet {
    pub fn new(len: usize) -> Self {
        IndicatorSet {
            len,
            series: HashMap::new(),
        }
    }

    pub fn insert(&mut self, series: IndicatorSeries) {
        self.series.insert(series.indicator_type, series);
    }

    pub fn get(&self, indicator_type: &IndicatorType) -> Option<&IndicatorSeries> {
        self.series.get(indicator_type)
    }

    pub fn contains(&self, indicator_type: &IndicatorType) -> bool {
        self.series.contains_key(indicator_type)
    }

    /// Number of bars the set was computed over.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn simple(&self, indicator_type: &IndicatorType, index: usize) -> Option<f64> {
        self.get(indicator_type)?.simple_at(index)
    }

    /// (line, signal, histogram)
    pub fn macd(&self, indicator_type: &IndicatorType, index: usize) -> Option<(f64, f64, f64)> {
        match self.get(indicator_type)?.value_at(index)? {
            IndicatorValue::Macd {
                line,
                signal,
                histogram,
            } => Some((line, signal, histogram)),
            _ => None,
        }
    }

    /// (upper, middle, lower)
    pub fn bollinger(
        &self,
        indicator_type: &IndicatorType,
        index: usize,
    ) -> Option<(f64, f64, f64)> {
        match self.get(indicator_type)?.value_at(index)? {
            IndicatorValue::Bollinger {
                upper,
                middle,
                lower,
            } => Some((upper, middle, lower)),
            _ => None,
        }
    }

    pub fn types(&self) -> impl Iterator<Item = &IndicatorType> {
        self.series.keys()
    }

    /// Flatten the series named in `types`, in that order, into one column
    /// per scalar component. Types missing from the set are skipped.
    pub fn columns(&self, types: &[IndicatorType]) -> Vec<IndicatorColumn> {
        let mut columns = Vec::new();
        for indicator_type in types {
            let Some(series) = self.get(indicator_type) else {
                continue;
            };
            for (k, name) in indicator_type.column_names().into_iter().enumerate() {
                let values = series
                    .values
                    .iter()
                    .map(|p| {
                        p.valid
                            .then(|| p.value.components().get(k).copied())
                            .flatten()
                    })
                    .collect();
                columns.push(IndicatorColumn { name, values });
            }
        }
        columns
    }
}

/// One scalar indicator output across all bars; `None` during warm-up.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorColumn {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Bars of one symbol alongside every requested indicator column.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorTable {
    pub symbol: String,
    pub dates: Vec<NaiveDate>,
    pub closes: Vec<f64>,
    pub columns: Vec<IndicatorColumn>,
}

impl IndicatorTable {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// (column name, value) for the last bar.
    pub fn latest(&self) -> Vec<(&str, Option<f64>)> {
        self.columns
            .iter()
            .map(|c| (c.name.as_str(), c.values.last().copied().flatten()))
            .collect()
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA_{}", period),
            IndicatorType::Ema(period) => write!(f, "EMA_{}", period),
            IndicatorType::Rsi(period) => write!(f, "RSI_{}", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BB({},{})", period, mult)
            }
            IndicatorType::VolumeSma(period) => write!(f, "Volume_SMA_{}", period),
            IndicatorType::VolumeRatio(period) => write!(f, "Volume_Ratio_{}", period),
            IndicatorType::Stochastic { k_period, d_period } => {
                write!(f, "Stoch({},{})", k_period, d_period)
            }
            IndicatorType::WilliamsR(period) => write!(f, "Williams_R_{}", period),
            IndicatorType::Atr(period) => write!(f, "ATR_{}", period),
            IndicatorType::Mfi(period) => write!(f, "MFI_{}", period),
            IndicatorType::Cci(period) => write!(f, "CCI_{}", period),
            IndicatorType::Roc(period) => write!(f, "ROC_{}", period),
            IndicatorType::Channel(period) => write!(f, "Channel_{}", period),
            IndicatorType::Volatility(period) => write!(f, "Volatility_{}", period),
            IndicatorType::BollingerSqueeze {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BB_Squeeze({},{})", period, mult)
            }
            IndicatorType::HigherHigh => write!(f, "Higher_High"),
            IndicatorType::LowerLow => write!(f, "Lower_Low"),
        }
    }
}
