//! CSV file data adapter.
//!
//! One file per symbol: `<base_path>/<CODE><suffix>.csv`, with a header row.
//! Columns are found by name, so provider exports with extra columns (open,
//! volume, adjusted close) load as-is.

use crate::domain::error::ScreenerError;
use crate::domain::price::{normalize_series, PricePoint};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
    suffix: String,
}

struct Columns {
    date: usize,
    high: usize,
    low: usize,
    close: usize,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            base_path,
            suffix: String::new(),
        }
    }

    /// Append `suffix` to the code when building file names, e.g. `.NS`.
    pub fn with_suffix(mut self, suffix: &str) -> Self {
        self.suffix = suffix.to_string();
        self
    }

    fn csv_path(&self, code: &str) -> PathBuf {
        self.base_path.join(format!("{}{}.csv", code, self.suffix))
    }

    fn locate_columns(headers: &csv::StringRecord) -> Result<Columns, ScreenerError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| ScreenerError::DataSource {
                    reason: format!("missing {} column", name),
                })
        };
        Ok(Columns {
            date: find("date")?,
            high: find("high")?,
            low: find("low")?,
            close: find("close")?,
        })
    }

    fn parse_field(record: &csv::StringRecord, index: usize, name: &str) -> Result<f64, ScreenerError> {
        let value: f64 = record
            .get(index)
            .ok_or_else(|| ScreenerError::DataSource {
                reason: format!("missing {} value", name),
            })?
            .trim()
            .parse()
            .map_err(|e| ScreenerError::DataSource {
                reason: format!("invalid {} value: {}", name, e),
            })?;

        // `f64::from_str` accepts "NaN" and "inf".
        if !value.is_finite() {
            return Err(ScreenerError::DataSource {
                reason: format!("invalid {} value: {}", name, value),
            });
        }
        Ok(value)
    }

    fn parse_date(raw: &str) -> Result<NaiveDate, ScreenerError> {
        // Some exports append a time component; only the date part matters.
        let day = raw.trim().get(..10).unwrap_or(raw.trim());
        NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| ScreenerError::DataSource {
            reason: format!("invalid date format: {}", e),
        })
    }
}

impl DataPort for CsvAdapter {
    fn fetch_prices(
        &self,
        code: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, ScreenerError> {
        let path = self.csv_path(code);
        let mut rdr = csv::Reader::from_path(&path).map_err(|e| ScreenerError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let headers = rdr.headers().map_err(|e| ScreenerError::DataSource {
            reason: format!("CSV parse error: {}", e),
        })?;
        let cols = Self::locate_columns(headers)?;

        let mut points = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| ScreenerError::DataSource {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(cols.date).ok_or_else(|| ScreenerError::DataSource {
                reason: "missing date value".into(),
            })?;
            let date = Self::parse_date(date_str)?;

            if date < start_date || date > end_date {
                continue;
            }

            points.push(PricePoint {
                date,
                high: Self::parse_field(&record, cols.high, "high")?,
                low: Self::parse_field(&record, cols.low, "low")?,
                close: Self::parse_field(&record, cols.close, "close")?,
            });
        }

        Ok(normalize_series(points))
    }

    fn name(&self) -> String {
        format!("csv:{}", self.base_path.display())
    }
}
