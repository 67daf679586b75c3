//! CSV file data adapter.
//!
//! One file per symbol, `<base_path>/<SYMBOL>.csv`, with a header row
//! `date,open,high,low,close,volume` and ISO dates.

use crate::domain::error::TradetipsError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

const EXTENSION: &str = ".csv";

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: i64,
}

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}{}", symbol, EXTENSION))
    }
}

fn data_error(reason: String) -> TradetipsError {
    TradetipsError::Data { reason }
}

/// Prices finite and positive, low <= high, volume non-negative.
fn check_row(row: &CsvRow) -> Result<(), String> {
    let prices = [
        ("open", row.open),
        ("high", row.high),
        ("low", row.low),
        ("close", row.close),
    ];
    for (field, value) in prices {
        if !value.is_finite() || value <= 0.0 {
            return Err(format!("{} must be a positive number, got {}", field, value));
        }
    }
    if row.low > row.high {
        return Err(format!("low {} above high {}", row.low, row.high));
    }
    if row.volume < 0 {
        return Err(format!("negative volume {}", row.volume));
    }
    Ok(())
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, TradetipsError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path)
            .map_err(|e| data_error(format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for (line, result) in rdr.deserialize::<CsvRow>().enumerate() {
            let row = result.map_err(|e| data_error(format!("CSV parse error: {}", e)))?;
            check_row(&row).map_err(|reason| {
                data_error(format!("{} row {}: {}", path.display(), line + 1, reason))
            })?;

            let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d").map_err(|e| {
                data_error(format!("invalid date {:?} on row {}: {}", row.date, line + 1, e))
            })?;

            if date < start_date || date > end_date {
                continue;
            }

            bars.push(OhlcvBar {
                date,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
            });
        }

        bars.sort_by_key(|b| b.date);
        debug!(symbol, bars = bars.len(), path = %path.display(), "loaded bars");
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, TradetipsError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| {
            data_error(format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ))
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| data_error(format!("directory entry error: {}", e)))?;
            let name = entry.file_name();
            if let Some(symbol) = name.to_string_lossy().strip_suffix(EXTENSION) {
                if !symbol.is_empty() {
                    symbols.push(symbol.to_string());
                }
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
