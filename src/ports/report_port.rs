//! Backtest report sink.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::TradetipsError;
use crate::domain::indicator::IndicatorTable;

pub trait ReportPort {
    fn write(&self, result: &BacktestResult, output_path: &str) -> Result<(), TradetipsError>;

    fn write_indicators(
        &self,
        table: &IndicatorTable,
        output_path: &str,
    ) -> Result<(), TradetipsError>;

    /// Default implementation: writes each result to `<stem>_<strategy>.<ext>`.
    fn write_all(&self, results: &[BacktestResult], output_path: &str) -> Result<(), TradetipsError> {
        for result in results {
            self.write(result, &suffixed_path(output_path, &result.strategy))?;
        }
        Ok(())
    }
}

/// `report.csv` + `SMA` -> `report_SMA.csv`.
pub fn suffixed_path(path: &str, suffix: &str) -> String {
    match path.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.contains('/') => {
            format!("{}_{}.{}", stem, suffix, ext)
        }
        _ => format!("{}_{}", path, suffix),
    }
}
