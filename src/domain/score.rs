//! Heuristic 0..=100 outlook score for the latest bar.
//!
//! Starts neutral at 50 and adds or subtracts points for RSI, MACD, moving
//! average alignment, volume and Bollinger position. Undefined indicators
//! fall back to neutral readings.

use std::fmt;

use super::error::TradetipsError;
use super::indicator::{
    BOLLINGER_DEFAULT, IndicatorSet, MACD_DEFAULT, RSI_14, SMA_LONG, SMA_SHORT, VOLUME_RATIO_20,
    standard_indicators,
};
use super::indicator_helpers::compute_indicators;
use super::ohlcv::OhlcvBar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    StrongBuy,
    Buy,
    WeakBuy,
    Hold,
    WeakSell,
    Sell,
    StrongSell,
}

impl Recommendation {
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 75 => Recommendation::StrongBuy,
            s if s >= 65 => Recommendation::Buy,
            s if s >= 55 => Recommendation::WeakBuy,
            s if s >= 45 => Recommendation::Hold,
            s if s >= 35 => Recommendation::WeakSell,
            s if s >= 25 => Recommendation::Sell,
            _ => Recommendation::StrongSell,
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Recommendation::StrongBuy => "Strong Buy",
            Recommendation::Buy => "Buy",
            Recommendation::WeakBuy => "Weak Buy",
            Recommendation::Hold => "Hold",
            Recommendation::WeakSell => "Weak Sell",
            Recommendation::Sell => "Sell",
            Recommendation::StrongSell => "Strong Sell",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictionScore {
    pub score: i32,
    pub recommendation: Recommendation,
}

/// Score the last bar of `bars` using the standard indicator set.
pub fn prediction_score(symbol: &str, bars: &[OhlcvBar]) -> Result<PredictionScore, TradetipsError> {
    let Some(last) = bars.len().checked_sub(1) else {
        return Err(TradetipsError::NoData {
            symbol: symbol.to_string(),
        });
    };
    let indicators = compute_indicators(bars, &standard_indicators());
    Ok(score_bar(&bars[last], &indicators, last))
}

pub fn score_bar(bar: &OhlcvBar, indicators: &IndicatorSet, index: usize) -> PredictionScore {
    let close = bar.close;
    let mut score = 50;

    let rsi = indicators.simple(&RSI_14, index).unwrap_or(50.0);
    if rsi < 30.0 {
        score += 15;
    } else if rsi > 70.0 {
        score -= 15;
    } else if (40.0..=60.0).contains(&rsi) {
        score += 5;
    }

    let (line, signal, _) = indicators
        .macd(&MACD_DEFAULT, index)
        .unwrap_or((0.0, 0.0, 0.0));
    score += if line > signal { 10 } else { -10 };

    let sma20 = indicators.simple(&SMA_SHORT, index).unwrap_or(close);
    let sma50 = indicators.simple(&SMA_LONG, index).unwrap_or(close);
    score += if close > sma20 && sma20 > sma50 {
        15
    } else if close < sma20 && sma20 < sma50 {
        -15
    } else if close > sma20 {
        8
    } else {
        -8
    };

    let volume_ratio = indicators.simple(&VOLUME_RATIO_20, index).unwrap_or(1.0);
    if volume_ratio > 1.5 {
        score += 10;
    } else if volume_ratio < 0.8 {
        score -= 5;
    }

    let (upper, _, lower) = indicators
        .bollinger(&BOLLINGER_DEFAULT, index)
        .unwrap_or((close, close, close));
    if close < lower {
        score += 10;
    } else if close > upper {
        score -= 10;
    }

    let score = score.clamp(0, 100);
    PredictionScore {
        score,
        recommendation: Recommendation::from_score(score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bars(closes: &[f64]) -> Vec<OhlcvBar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn bands() {
        assert_eq!(Recommendation::from_score(100), Recommendation::StrongBuy);
        assert_eq!(Recommendation::from_score(65), Recommendation::Buy);
        assert_eq!(Recommendation::from_score(50), Recommendation::Hold);
        assert_eq!(Recommendation::from_score(34), Recommendation::Sell);
        assert_eq!(Recommendation::from_score(0), Recommendation::StrongSell);
        assert_eq!(Recommendation::WeakBuy.to_string(), "Weak Buy");
    }

    #[test]
    fn empty_is_no_data() {
        assert!(matches!(
            prediction_score("XYZ", &[]),
            Err(TradetipsError::NoData { .. })
        ));
    }

    #[test]
    fn no_indicators_is_neutral_defaults() {
        // RSI 50 (+5), MACD 0/0 (-10), close == SMAs (-8), volume 1, inside bands
        let bars = make_bars(&[100.0]);
        let result = score_bar(&bars[0], &IndicatorSet::new(1), 0);
        assert_eq!(result.score, 37);
        assert_eq!(result.recommendation, Recommendation::WeakSell);
    }

    #[test]
    fn flat_series_scores() {
        // RSI 50 (+5), MACD 0 == 0 (-10), close == SMA20 (-8), ratio 1, on the bands
        let result = prediction_score("FLAT", &make_bars(&[10.0; 60])).unwrap();
        assert_eq!(result.score, 37);
    }

    #[test]
    fn steady_uptrend_scores_high_trend_points() {
        let closes: Vec<f64> = (0..80).map(|i| 100.0 + i as f64).collect();
        let result = prediction_score("UP", &make_bars(&closes)).unwrap();
        // RSI 100 (-15), rising MACD (+10), close > SMA20 > SMA50 (+15), inside the bands
        assert_eq!(result.score, 60);
        assert_eq!(result.recommendation, Recommendation::WeakBuy);
    }
}
