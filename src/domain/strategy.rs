//! Rule-based signal strategies.
//!
//! Each variant turns a bar sequence plus its computed indicators into one
//! [`Signal`] per bar. Strategies never compute indicators themselves; use
//! [`Strategy::required_indicators`] to build the matching [`IndicatorSet`].

use std::fmt;
use std::str::FromStr;

use crate::domain::error::TradetipsError;
use crate::domain::indicator::{
    BOLLINGER_DEFAULT, IndicatorSet, IndicatorType, MACD_DEFAULT, RSI_14, SMA_LONG, SMA_SHORT,
};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::signal::Signal;

pub const DEFAULT_SHORT_WINDOW: usize = 20;
pub const DEFAULT_LONG_WINDOW: usize = 50;
pub const DEFAULT_OVERSOLD: f64 = 30.0;
pub const DEFAULT_OVERBOUGHT: f64 = 70.0;

const COMBINED_RSI_BUY_CEILING: f64 = 70.0;
const COMBINED_RSI_SELL_FLOOR: f64 = 80.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    SmaCrossover {
        short_window: usize,
        long_window: usize,
    },
    Rsi {
        oversold: f64,
        overbought: f64,
    },
    Macd,
    Bollinger,
    Combined,
}

impl Strategy {
    /// Parse a strategy name (case-insensitive) with default parameters.
    pub fn from_name(name: &str) -> Result<Self, TradetipsError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "sma" => Ok(Strategy::SmaCrossover {
                short_window: DEFAULT_SHORT_WINDOW,
                long_window: DEFAULT_LONG_WINDOW,
            }),
            "rsi" => Ok(Strategy::Rsi {
                oversold: DEFAULT_OVERSOLD,
                overbought: DEFAULT_OVERBOUGHT,
            }),
            "macd" => Ok(Strategy::Macd),
            "bollinger" => Ok(Strategy::Bollinger),
            "combined" => Ok(Strategy::Combined),
            _ => Err(TradetipsError::UnsupportedStrategy {
                name: name.to_string(),
            }),
        }
    }

    /// Every strategy with default parameters, in a fixed order.
    pub fn all_defaults() -> Vec<Strategy> {
        ["SMA", "RSI", "MACD", "Bollinger", "Combined"]
            .iter()
            .filter_map(|name| Strategy::from_name(name).ok())
            .collect()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::SmaCrossover { .. } => "SMA",
            Strategy::Rsi { .. } => "RSI",
            Strategy::Macd => "MACD",
            Strategy::Bollinger => "Bollinger",
            Strategy::Combined => "Combined",
        }
    }

    pub fn required_indicators(&self) -> Vec<IndicatorType> {
        match self {
            Strategy::SmaCrossover {
                short_window,
                long_window,
            } => vec![
                IndicatorType::Sma(*short_window),
                IndicatorType::Sma(*long_window),
            ],
            Strategy::Rsi { .. } => vec![RSI_14],
            Strategy::Macd => vec![MACD_DEFAULT],
            Strategy::Bollinger => vec![BOLLINGER_DEFAULT],
            Strategy::Combined => vec![
                SMA_SHORT,
                SMA_LONG,
                RSI_14,
                MACD_DEFAULT,
                BOLLINGER_DEFAULT,
            ],
        }
    }

    /// One signal per bar. Missing indicator series read as undefined.
    pub fn generate_signals(&self, bars: &[OhlcvBar], indicators: &IndicatorSet) -> Vec<Signal> {
        match self {
            Strategy::SmaCrossover {
                short_window,
                long_window,
            } => sma_signals(
                bars.len(),
                indicators,
                IndicatorType::Sma(*short_window),
                IndicatorType::Sma(*long_window),
            ),
            Strategy::Rsi {
                oversold,
                overbought,
            } => rsi_signals(bars.len(), indicators, *oversold, *overbought),
            Strategy::Macd => macd_signals(bars.len(), indicators),
            Strategy::Bollinger => bollinger_signals(bars, indicators),
            Strategy::Combined => combined_signals(bars, indicators),
        }
    }
}

impl FromStr for Strategy {
    type Err = TradetipsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::from_name(s)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::SmaCrossover {
                short_window,
                long_window,
            } => write!(f, "SMA({},{})", short_window, long_window),
            Strategy::Rsi {
                oversold,
                overbought,
            } => write!(f, "RSI({},{})", oversold, overbought),
            other => write!(f, "{}", other.name()),
        }
    }
}

fn sma_signals(
    len: usize,
    indicators: &IndicatorSet,
    short: IndicatorType,
    long: IndicatorType,
) -> Vec<Signal> {
    (0..len)
        .map(|i| match (indicators.simple(&short, i), indicators.simple(&long, i)) {
            (Some(s), Some(l)) if s > l => Signal::Buy,
            (Some(_), Some(_)) => Signal::Sell,
            _ => Signal::Hold,
        })
        .collect()
}

/// Latches the last extreme; holds until the first one.
fn rsi_signals(
    len: usize,
    indicators: &IndicatorSet,
    oversold: f64,
    overbought: f64,
) -> Vec<Signal> {
    let mut state = Signal::Hold;
    (0..len)
        .map(|i| {
            if let Some(rsi) = indicators.simple(&RSI_14, i) {
                if rsi < oversold {
                    state = Signal::Buy;
                } else if rsi > overbought {
                    state = Signal::Sell;
                }
            }
            state
        })
        .collect()
}

fn macd_signals(len: usize, indicators: &IndicatorSet) -> Vec<Signal> {
    (0..len)
        .map(|i| match indicators.macd(&MACD_DEFAULT, i) {
            Some((line, signal, _)) if line > signal => Signal::Buy,
            Some(_) => Signal::Sell,
            None => Signal::Hold,
        })
        .collect()
}

fn bollinger_signals(bars: &[OhlcvBar], indicators: &IndicatorSet) -> Vec<Signal> {
    let mut state = Signal::Hold;
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            if let Some((upper, _, lower)) = indicators.bollinger(&BOLLINGER_DEFAULT, i) {
                // a collapsed band touches both; the upper touch wins
                if bar.close >= upper {
                    state = Signal::Sell;
                } else if bar.close <= lower {
                    state = Signal::Buy;
                }
            }
            state
        })
        .collect()
}

fn combined_signals(bars: &[OhlcvBar], indicators: &IndicatorSet) -> Vec<Signal> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            let sma = indicators
                .simple(&SMA_SHORT, i)
                .zip(indicators.simple(&SMA_LONG, i));
            let rsi = indicators.simple(&RSI_14, i);
            let macd = indicators.macd(&MACD_DEFAULT, i);
            let lower = indicators.bollinger(&BOLLINGER_DEFAULT, i).map(|b| b.2);

            let buy = sma.is_some_and(|(s, l)| s > l)
                && rsi.is_some_and(|r| r < COMBINED_RSI_BUY_CEILING)
                && macd.is_some_and(|(line, signal, _)| line > signal)
                && lower.is_some_and(|lo| bar.close > lo);

            let sell = sma.is_some_and(|(s, l)| s < l)
                || rsi.is_some_and(|r| r > COMBINED_RSI_SELL_FLOOR)
                || macd.is_some_and(|(line, signal, _)| line < signal)
                || lower.is_some_and(|lo| bar.close < lo);

            if sell {
                Signal::Sell
            } else if buy {
                Signal::Buy
            } else {
                Signal::Hold
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorValue};
    use chrono::NaiveDate;

    fn date(i: usize) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i as i64)
    }

    fn make_bars(closes: &[f64]) -> Vec<OhlcvBar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                date: date(i),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }

    fn series(indicator_type: IndicatorType, values: &[Option<IndicatorValue>]) -> IndicatorSeries {
        IndicatorSeries {
            indicator_type,
            values: values
                .iter()
                .enumerate()
                .map(|(i, v)| IndicatorPoint {
                    date: date(i),
                    valid: v.is_some(),
                    value: v.unwrap_or(IndicatorValue::Simple(0.0)),
                })
                .collect(),
        }
    }

    fn simple(indicator_type: IndicatorType, values: &[Option<f64>]) -> IndicatorSeries {
        let values: Vec<_> = values.iter().map(|v| v.map(IndicatorValue::Simple)).collect();
        series(indicator_type, &values)
    }

    fn macd(line: f64, signal: f64) -> Option<IndicatorValue> {
        Some(IndicatorValue::Macd {
            line,
            signal,
            histogram: line - signal,
        })
    }

    fn bands(upper: f64, lower: f64) -> Option<IndicatorValue> {
        Some(IndicatorValue::Bollinger {
            upper,
            middle: (upper + lower) / 2.0,
            lower,
        })
    }

    #[test]
    fn parse_names_case_insensitive() {
        assert_eq!(
            Strategy::from_name("sma").unwrap(),
            Strategy::SmaCrossover {
                short_window: 20,
                long_window: 50
            }
        );
        assert_eq!("MACD".parse::<Strategy>().unwrap(), Strategy::Macd);
        assert_eq!(Strategy::from_name("bollinger").unwrap(), Strategy::Bollinger);
        assert_eq!(Strategy::from_name("COMBINED").unwrap(), Strategy::Combined);
    }

    #[test]
    fn parse_unknown_is_unsupported() {
        let err = Strategy::from_name("Momentum").unwrap_err();
        assert!(matches!(err, TradetipsError::UnsupportedStrategy { name } if name == "Momentum"));
    }

    #[test]
    fn all_defaults_has_five() {
        let names: Vec<_> = Strategy::all_defaults().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["SMA", "RSI", "MACD", "Bollinger", "Combined"]);
    }

    #[test]
    fn sma_crossover_signals() {
        let strategy = Strategy::SmaCrossover {
            short_window: 2,
            long_window: 3,
        };
        let mut set = IndicatorSet::new(4);
        set.insert(simple(IndicatorType::Sma(2), &[None, Some(10.0), Some(12.0), Some(9.0)]));
        set.insert(simple(IndicatorType::Sma(3), &[None, None, Some(11.0), Some(11.0)]));

        let signals = strategy.generate_signals(&make_bars(&[1.0; 4]), &set);
        assert_eq!(
            signals,
            vec![Signal::Hold, Signal::Hold, Signal::Buy, Signal::Sell]
        );
    }

    #[test]
    fn rsi_latches_between_thresholds() {
        let strategy = Strategy::from_name("RSI").unwrap();
        let mut set = IndicatorSet::new(6);
        set.insert(simple(
            RSI_14,
            &[None, Some(50.0), Some(25.0), Some(50.0), Some(75.0), Some(60.0)],
        ));

        let signals = strategy.generate_signals(&make_bars(&[1.0; 6]), &set);
        assert_eq!(
            signals,
            vec![
                Signal::Hold,
                Signal::Hold,
                Signal::Buy,
                Signal::Buy,
                Signal::Sell,
                Signal::Sell
            ]
        );
    }

    #[test]
    fn macd_line_above_signal_buys() {
        let mut set = IndicatorSet::new(3);
        set.insert(series(MACD_DEFAULT, &[macd(1.0, 0.5), macd(0.5, 0.5), macd(-1.0, 0.0)]));
        let signals = Strategy::Macd.generate_signals(&make_bars(&[1.0; 3]), &set);
        assert_eq!(signals, vec![Signal::Buy, Signal::Sell, Signal::Sell]);
    }

    #[test]
    fn bollinger_touches_and_carries() {
        let bars = make_bars(&[100.0, 89.0, 100.0, 111.0, 100.0]);
        let mut set = IndicatorSet::new(5);
        set.insert(series(
            BOLLINGER_DEFAULT,
            &[
                bands(110.0, 90.0),
                bands(110.0, 90.0),
                bands(110.0, 90.0),
                bands(110.0, 90.0),
                bands(110.0, 90.0),
            ],
        ));
        let signals = Strategy::Bollinger.generate_signals(&bars, &set);
        assert_eq!(
            signals,
            vec![
                Signal::Hold,
                Signal::Buy,
                Signal::Buy,
                Signal::Sell,
                Signal::Sell
            ]
        );
    }

    #[test]
    fn bollinger_collapsed_band_sells() {
        let bars = make_bars(&[100.0]);
        let mut set = IndicatorSet::new(1);
        set.insert(series(BOLLINGER_DEFAULT, &[bands(100.0, 100.0)]));
        let signals = Strategy::Bollinger.generate_signals(&bars, &set);
        assert_eq!(signals, vec![Signal::Sell]);
    }

    fn combined_set(sma20: f64, sma50: f64, rsi: f64, line: f64, signal: f64, lower: f64) -> IndicatorSet {
        let mut set = IndicatorSet::new(1);
        set.insert(simple(SMA_SHORT, &[Some(sma20)]));
        set.insert(simple(SMA_LONG, &[Some(sma50)]));
        set.insert(simple(RSI_14, &[Some(rsi)]));
        set.insert(series(MACD_DEFAULT, &[macd(line, signal)]));
        set.insert(series(BOLLINGER_DEFAULT, &[bands(lower + 20.0, lower)]));
        set
    }

    #[test]
    fn combined_all_bullish_buys() {
        let set = combined_set(105.0, 100.0, 55.0, 1.0, 0.5, 95.0);
        let signals = Strategy::Combined.generate_signals(&make_bars(&[100.0]), &set);
        assert_eq!(signals, vec![Signal::Buy]);
    }

    #[test]
    fn combined_single_bearish_condition_sells() {
        // RSI above 80 alone flips an otherwise bullish bar
        let set = combined_set(105.0, 100.0, 85.0, 1.0, 0.5, 95.0);
        assert_eq!(
            Strategy::Combined.generate_signals(&make_bars(&[100.0]), &set),
            vec![Signal::Sell]
        );

        // MACD below its signal
        let set = combined_set(105.0, 100.0, 55.0, 0.1, 0.5, 95.0);
        assert_eq!(
            Strategy::Combined.generate_signals(&make_bars(&[100.0]), &set),
            vec![Signal::Sell]
        );

        // close under the lower band
        let set = combined_set(105.0, 100.0, 55.0, 1.0, 0.5, 101.0);
        assert_eq!(
            Strategy::Combined.generate_signals(&make_bars(&[100.0]), &set),
            vec![Signal::Sell]
        );
    }

    #[test]
    fn combined_short_sma_below_long_sells() {
        // RSI, MACD and the band are all bullish
        let set = combined_set(98.0, 100.0, 55.0, 1.0, 0.5, 95.0);
        assert_eq!(
            Strategy::Combined.generate_signals(&make_bars(&[100.0]), &set),
            vec![Signal::Sell]
        );
    }

    #[test]
    fn combined_neither_holds() {
        // RSI 75 blocks the buy but is below the sell floor
        let set = combined_set(105.0, 100.0, 75.0, 1.0, 0.5, 95.0);
        assert_eq!(
            Strategy::Combined.generate_signals(&make_bars(&[100.0]), &set),
            vec![Signal::Hold]
        );
    }

    #[test]
    fn combined_missing_indicators_hold() {
        let set = IndicatorSet::new(2);
        assert_eq!(
            Strategy::Combined.generate_signals(&make_bars(&[1.0, 2.0]), &set),
            vec![Signal::Hold, Signal::Hold]
        );
    }

    #[test]
    fn required_indicators_cover_combined() {
        let required = Strategy::Combined.required_indicators();
        for t in [SMA_SHORT, SMA_LONG, RSI_14, MACD_DEFAULT, BOLLINGER_DEFAULT] {
            assert!(required.contains(&t));
        }
    }
}
