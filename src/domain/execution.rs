//! Trade execution against a long-only, single-symbol portfolio.
//!
//! Commission is a fraction of notional charged on both legs:
//! entry cost = shares * price * (1 + c), exit proceeds = shares * price * (1 - c).

use super::portfolio::Portfolio;

/// Result of an entry attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryResult {
    Entered { quantity: i64, price: f64, cost: f64 },
    /// Cash cannot cover a single share plus commission.
    InsufficientCapital,
}

/// Result of an exit.
#[derive(Debug, Clone, PartialEq)]
pub struct ExitResult {
    pub quantity: i64,
    pub price: f64,
    pub proceeds: f64,
}

pub fn entry_cost(quantity: i64, price: f64, commission: f64) -> f64 {
    quantity as f64 * price * (1.0 + commission)
}

pub fn exit_proceeds(quantity: i64, price: f64, commission: f64) -> f64 {
    quantity as f64 * price * (1.0 - commission)
}

/// Largest whole share count whose commission-inclusive cost fits in `cash`.
///
/// Starts from floor(cash / price) and steps down until the cost fits.
pub fn affordable_shares(cash: f64, price: f64, commission: f64) -> i64 {
    if cash <= 0.0 || price <= 0.0 {
        return 0;
    }

    let mut quantity = (cash / price).floor() as i64;
    if quantity > 0 && entry_cost(quantity, price, commission) > cash {
        quantity = (cash / (price * (1.0 + commission))).floor() as i64;
    }
    while quantity > 0 && entry_cost(quantity, price, commission) > cash {
        quantity -= 1;
    }
    quantity
}

/// Buy as many whole shares as cash allows at `price`.
pub fn enter_long(portfolio: &mut Portfolio, price: f64, commission: f64) -> EntryResult {
    let quantity = affordable_shares(portfolio.cash, price, commission);
    if quantity == 0 {
        return EntryResult::InsufficientCapital;
    }

    let cost = entry_cost(quantity, price, commission);
    portfolio.cash -= cost;
    portfolio.holdings += quantity;

    EntryResult::Entered {
        quantity,
        price,
        cost,
    }
}

/// Sell the whole holding at `price`. `None` when flat.
pub fn exit_long(portfolio: &mut Portfolio, price: f64, commission: f64) -> Option<ExitResult> {
    if portfolio.holdings <= 0 {
        return None;
    }

    let quantity = portfolio.holdings;
    let proceeds = exit_proceeds(quantity, price, commission);
    portfolio.cash += proceeds;
    portfolio.holdings = 0;

    Some(ExitResult {
        quantity,
        price,
        proceeds,
    })
}
