//! Per-bar trading signal and position transitions.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Signal {
    Buy,
    Sell,
    #[default]
    Hold,
}

impl Signal {
    /// Buy = +1, Sell = -1, Hold = 0.
    pub fn value(self) -> i8 {
        match self {
            Signal::Buy => 1,
            Signal::Sell => -1,
            Signal::Hold => 0,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "BUY"),
            Signal::Sell => write!(f, "SELL"),
            Signal::Hold => write!(f, "HOLD"),
        }
    }
}

/// Fresh Sell -> Buy flip.
pub const BUY_TRANSITION: i8 = 2;
/// Fresh Buy -> Sell flip.
pub const SELL_TRANSITION: i8 = -2;

/// First difference of the signal values. The first bar is always 0.
pub fn transitions(signals: &[Signal]) -> Vec<i8> {
    let mut out = Vec::with_capacity(signals.len());
    let mut prev: Option<Signal> = None;
    for &signal in signals {
        let delta = match prev {
            Some(p) => signal.value() - p.value(),
            None => 0,
        };
        out.push(delta);
        prev = Some(signal);
    }
    out
}
