//! Per-bar CSV reports.
//!
//! Frame reports hold the simulation columns followed by one column per
//! indicator output; indicator tables hold date, close and indicator columns.
//! Undefined values are written as empty fields.

use crate::domain::backtest::{BacktestResult, FrameRow};
use crate::domain::error::TradetipsError;
use crate::domain::indicator::{IndicatorColumn, IndicatorTable};
use crate::ports::report_port::ReportPort;
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use tracing::info;

const FRAME_COLUMNS: [&str; 9] = [
    "date",
    "close",
    "signal",
    "position",
    "holdings",
    "cash",
    "total_value",
    "returns",
    "buy_hold_value",
];

#[derive(Debug, Serialize)]
struct ReportRow {
    date: String,
    close: f64,
    signal: i8,
    position: i8,
    holdings: i64,
    cash: f64,
    total_value: f64,
    returns: Option<f64>,
    buy_hold_value: f64,
}

impl From<&FrameRow> for ReportRow {
    fn from(row: &FrameRow) -> Self {
        ReportRow {
            date: row.date.format("%Y-%m-%d").to_string(),
            close: row.close,
            signal: row.signal.value(),
            position: row.transition,
            holdings: row.holdings,
            cash: row.cash,
            total_value: row.total_value,
            returns: row.daily_return,
            buy_hold_value: row.buy_hold_value,
        }
    }
}

#[derive(Debug, Serialize)]
struct TableRow {
    date: String,
    close: f64,
}

fn report_error(reason: String) -> TradetipsError {
    TradetipsError::Report { reason }
}

fn row_values(columns: &[IndicatorColumn], i: usize) -> Vec<Option<f64>> {
    columns
        .iter()
        .map(|c| c.values.get(i).copied().flatten())
        .collect()
}

/// Headers are written by hand so the indicator columns can follow the
/// fixed ones; each row is serialized as a flattened `(fixed, indicators)` tuple.
fn open_writer(
    output_path: &str,
    fixed: &[&str],
    columns: &[IndicatorColumn],
) -> Result<csv::Writer<File>, TradetipsError> {
    if let Some(parent) = Path::new(output_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(output_path)
        .map_err(|e| report_error(format!("failed to create {}: {}", output_path, e)))?;

    let header = fixed
        .iter()
        .copied()
        .chain(columns.iter().map(|c| c.name.as_str()));
    writer
        .write_record(header)
        .map_err(|e| report_error(format!("failed to write header: {}", e)))?;
    Ok(writer)
}

/// Writes CSV reports, optionally with indicator columns on frame reports.
#[derive(Debug, Clone, Copy)]
pub struct CsvReportAdapter {
    include_indicators: bool,
}

impl CsvReportAdapter {
    pub fn new(include_indicators: bool) -> Self {
        Self { include_indicators }
    }
}

impl Default for CsvReportAdapter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, result: &BacktestResult, output_path: &str) -> Result<(), TradetipsError> {
        let columns: &[IndicatorColumn] = if self.include_indicators {
            &result.indicators
        } else {
            &[]
        };
        let mut writer = open_writer(output_path, &FRAME_COLUMNS, columns)?;

        for (i, row) in result.frame.iter().enumerate() {
            writer
                .serialize((ReportRow::from(row), row_values(columns, i)))
                .map_err(|e| report_error(format!("failed to write row: {}", e)))?;
        }
        writer.flush()?;

        info!(
            path = output_path,
            rows = result.frame.len(),
            indicators = columns.len(),
            strategy = %result.strategy,
            "report written"
        );
        Ok(())
    }

    fn write_indicators(
        &self,
        table: &IndicatorTable,
        output_path: &str,
    ) -> Result<(), TradetipsError> {
        let mut writer = open_writer(output_path, &["date", "close"], &table.columns)?;

        for (i, (date, close)) in table.dates.iter().zip(&table.closes).enumerate() {
            let row = TableRow {
                date: date.format("%Y-%m-%d").to_string(),
                close: *close,
            };
            writer
                .serialize((row, row_values(&table.columns, i)))
                .map_err(|e| report_error(format!("failed to write row: {}", e)))?;
        }
        writer.flush()?;

        info!(
            path = output_path,
            rows = table.len(),
            columns = table.columns.len(),
            symbol = %table.symbol,
            "indicator table written"
        );
        Ok(())
    }
}
