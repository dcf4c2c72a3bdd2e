//! Daily price bar representation.

use chrono::NaiveDate;

/// One daily bar as supplied by a data source. Only the fields the
/// oscillator needs are kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, high: f64, low: f64, close: f64) -> Self {
        Self {
            date,
            high,
            low,
            close,
        }
    }
}

/// Sort by date and collapse duplicate dates, keeping the last bar seen for
/// each date.
pub fn normalize_series(mut points: Vec<PricePoint>) -> Vec<PricePoint> {
    points.sort_by_key(|p| p.date);
    let mut out: Vec<PricePoint> = Vec::with_capacity(points.len());
    for p in points {
        match out.last_mut() {
            Some(last) if last.date == p.date => *last = p,
            _ => out.push(p),
        }
    }
    out
}
