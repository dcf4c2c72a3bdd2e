#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use stochscreen::domain::error::ScreenerError;
pub use stochscreen::domain::price::PricePoint;
use stochscreen::ports::data_port::DataPort;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, code: &str, bars: Vec<PricePoint>) -> Self {
        self.data.insert(code.to_string(), bars);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(
        &self,
        code: &str,
        _start_date: NaiveDate,
        _end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, ScreenerError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(ScreenerError::DataSource {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(code).cloned().unwrap_or_default())
    }

    fn name(&self) -> String {
        "mock".to_string()
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Trading day `i` of the fixture calendar, starting 2024-01-01.
pub fn day(i: usize) -> NaiveDate {
    date(2024, 1, 1) + chrono::Duration::days(i as i64)
}

/// Bars with a fixed 90..110 range, so %K = 5 * (close - 90) once the window
/// is full.
pub fn banded_bars(closes: &[f64]) -> Vec<PricePoint> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint::new(day(i), 110.0, 90.0, close))
        .collect()
}

pub fn flat_bars(n: usize, price: f64) -> Vec<PricePoint> {
    (0..n)
        .map(|i| PricePoint::new(day(i), price, price, price))
        .collect()
}

/// Oversold crossover on the last bar: BUY at 91.
pub fn buy_closes() -> Vec<f64> {
    vec![95.0, 95.0, 95.0, 95.0, 95.0, 95.0, 91.0]
}

/// Overbought crossover on the last bar with no open position.
pub fn sell_closes() -> Vec<f64> {
    vec![105.0, 105.0, 105.0, 105.0, 105.0, 105.0, 109.0]
}

pub fn write_price_csv(dir: &Path, file_name: &str, bars: &[PricePoint]) {
    let mut content = String::from("Date,Open,High,Low,Close,Volume\n");
    for bar in bars {
        content.push_str(&format!(
            "{},{},{},{},{},1000\n",
            bar.date, bar.close, bar.high, bar.low, bar.close
        ));
    }
    fs::write(dir.join(file_name), content).unwrap();
}
