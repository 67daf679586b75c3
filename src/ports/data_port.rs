//! Market data source keyed by symbol and date range.

use crate::domain::error::TradetipsError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Bars for `symbol` within `[start_date, end_date]`, oldest first.
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, TradetipsError>;

    fn list_symbols(&self) -> Result<Vec<String>, TradetipsError>;
}
