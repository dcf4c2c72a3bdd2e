//! Signal report adapters implementing ReportPort.
//!
//! - `table`: aligned plain-text table for terminals
//! - `delimited`: CSV for spreadsheets and downstream tools

pub mod delimited;
pub mod table;

use crate::domain::signal::{ChartTrace, SignalRecord};
use crate::ports::report_port::ReportPort;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Table,
    Csv,
}

impl ReportFormat {
    pub fn adapter(&self) -> Box<dyn ReportPort> {
        match self {
            ReportFormat::Table => Box::new(table::TableReportAdapter),
            ReportFormat::Csv => Box::new(delimited::CsvReportAdapter),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "table" | "text" => Ok(ReportFormat::Table),
            "csv" => Ok(ReportFormat::Csv),
            other => Err(format!("unknown report format '{}' (expected 'table' or 'csv')", other)),
        }
    }
}

pub const SIGNAL_HEADERS: [&str; 7] = [
    "Stock",
    "Signal",
    "Buy Price",
    "Target 3%",
    "Target 5%",
    "3% Hit",
    "5% Hit",
];

pub const CHART_HEADERS: [&str; 8] = ["Date", "High", "Low", "Close", "%K", "%D", "Event", "Reason"];

/// Two decimals, blank when absent.
pub fn format_price(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_default()
}

pub fn signal_row(record: &SignalRecord) -> [String; 7] {
    [
        record.symbol.clone(),
        record.signal.to_string(),
        format_price(record.entry_price),
        format_price(record.target3),
        format_price(record.target5),
        format_price(record.hit3),
        format_price(record.hit5),
    ]
}

/// One row per bar; event columns are blank on bars without a transition.
pub fn chart_rows(trace: &ChartTrace) -> Vec<[String; 8]> {
    trace
        .prices
        .iter()
        .zip(&trace.oscillator)
        .map(|(bar, point)| {
            let (event, reason) = match trace.event_on(bar.date) {
                Some(e) => (e.kind.to_string(), e.reason.to_string()),
                None => (String::new(), String::new()),
            };
            [
                bar.date.to_string(),
                format!("{:.2}", bar.high),
                format!("{:.2}", bar.low),
                format!("{:.2}", bar.close),
                format_price(point.k),
                format_price(point.d),
                event,
                reason,
            ]
        })
        .collect()
}
