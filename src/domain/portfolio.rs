//! Single-symbol portfolio state and per-bar records.

use chrono::NaiveDate;

use super::signal::Signal;

/// One row of the simulated frame, recorded after the bar's trade (if any).
#[derive(Debug, Clone, PartialEq)]
pub struct BarRecord {
    pub date: NaiveDate,
    pub close: f64,
    pub signal: Signal,
    pub transition: i8,
    pub holdings: i64,
    pub cash: f64,
    pub total_value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub cash: f64,
    pub holdings: i64,
    pub initial_capital: f64,
    pub records: Vec<BarRecord>,
}

impl Portfolio {
    pub fn new(initial_capital: f64) -> Self {
        Portfolio {
            cash: initial_capital,
            holdings: 0,
            initial_capital,
            records: Vec::new(),
        }
    }

    /// cash + holdings marked at `price`.
    pub fn total_value(&self, price: f64) -> f64 {
        self.cash + self.holdings as f64 * price
    }

    pub fn record(&mut self, date: NaiveDate, close: f64, signal: Signal, transition: i8) {
        self.records.push(BarRecord {
            date,
            close,
            signal,
            transition,
            holdings: self.holdings,
            cash: self.cash,
            total_value: self.total_value(close),
        });
    }

    /// Total value of the last recorded bar, or the starting capital.
    pub fn final_value(&self) -> f64 {
        self.records
            .last()
            .map(|r| r.total_value)
            .unwrap_or(self.initial_capital)
    }

    pub fn values(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.total_value).collect()
    }
}
