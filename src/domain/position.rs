//! Round-trip trades paired from signal transitions.

use chrono::NaiveDate;

use super::portfolio::BarRecord;
use super::signal::{BUY_TRANSITION, SELL_TRANSITION};

/// A closed long round trip. Profit/loss is per share, at close prices.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub exit_date: NaiveDate,
    pub exit_price: f64,
    pub profit_loss: f64,
    pub profit_loss_pct: f64,
    pub duration_days: i64,
}

impl Trade {
    pub fn new(
        entry_date: NaiveDate,
        entry_price: f64,
        exit_date: NaiveDate,
        exit_price: f64,
    ) -> Self {
        let profit_loss = exit_price - entry_price;
        let profit_loss_pct = if entry_price != 0.0 {
            profit_loss / entry_price * 100.0
        } else {
            0.0
        };
        Trade {
            entry_date,
            entry_price,
            exit_date,
            exit_price,
            profit_loss,
            profit_loss_pct,
            duration_days: (exit_date - entry_date).num_days(),
        }
    }

    pub fn is_win(&self) -> bool {
        self.profit_loss > 0.0
    }

    pub fn is_loss(&self) -> bool {
        self.profit_loss < 0.0
    }
}

/// Pair each Buy transition with the next Sell transition.
///
/// One open trade at a time; a Buy while open and a Sell while flat are
/// ignored. A trade still open at the end is not reported.
pub fn extract_trades(records: &[BarRecord]) -> Vec<Trade> {
    let mut trades = Vec::new();
    let mut open: Option<(NaiveDate, f64)> = None;

    for record in records {
        match (record.transition, open) {
            (BUY_TRANSITION, None) => open = Some((record.date, record.close)),
            (SELL_TRANSITION, Some((entry_date, entry_price))) => {
                trades.push(Trade::new(entry_date, entry_price, record.date, record.close));
                open = None;
            }
            _ => {}
        }
    }

    trades
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::signal::Signal;

    fn record(day: u32, close: f64, transition: i8) -> BarRecord {
        BarRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            close,
            signal: Signal::Hold,
            transition,
            holdings: 0,
            cash: 0.0,
            total_value: 0.0,
        }
    }

    #[test]
    fn trade_new_computes_pnl() {
        let trade = Trade::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            100.0,
            NaiveDate::from_ymd_opt(2024, 1, 11).unwrap(),
            110.0,
        );
        assert_eq!(trade.profit_loss, 10.0);
        assert!((trade.profit_loss_pct - 10.0).abs() < 1e-12);
        assert_eq!(trade.duration_days, 10);
        assert!(trade.is_win());
        assert!(!trade.is_loss());
    }

    #[test]
    fn extract_pairs_buy_with_next_sell() {
        let records = vec![
            record(1, 100.0, 0),
            record(2, 101.0, 2),
            record(3, 105.0, 0),
            record(4, 99.0, -2),
            record(5, 98.0, 2),
            record(8, 103.0, -2),
        ];
        let trades = extract_trades(&records);
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].entry_price, 101.0);
        assert_eq!(trades[0].exit_price, 99.0);
        assert!(trades[0].is_loss());
        assert_eq!(trades[1].duration_days, 3);
        assert!(trades[1].is_win());
    }

    #[test]
    fn extract_ignores_unmatched_transitions() {
        let records = vec![
            record(1, 100.0, -2),
            record(2, 101.0, 2),
            record(3, 102.0, 2),
            record(4, 103.0, 1),
        ];
        assert!(extract_trades(&records).is_empty());
    }
}
