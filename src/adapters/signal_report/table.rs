//! Plain-text table rendering.

use crate::adapters::signal_report::{chart_rows, signal_row, CHART_HEADERS, SIGNAL_HEADERS};
use crate::domain::error::ScreenerError;
use crate::domain::signal::{ChartTrace, SignalRecord};
use crate::ports::report_port::ReportPort;
use std::io::Write;

pub struct TableReportAdapter;

/// Column widths wide enough for the header and every cell.
fn widths<const N: usize>(headers: &[&str; N], rows: &[[String; N]]) -> [usize; N] {
    let mut widths = headers.map(|h| h.len());
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }
    widths
}

fn render<const N: usize>(
    out: &mut dyn Write,
    headers: &[&str; N],
    rows: &[[String; N]],
    text_columns: usize,
) -> std::io::Result<()> {
    let widths = widths(headers, rows);

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, &w))| {
                if i < text_columns {
                    format!("{:<w$}", cell)
                } else {
                    format!("{:>w$}", cell)
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    writeln!(out, "{}", line(headers.to_vec()))?;
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    writeln!(out, "{}", rule.join("  "))?;
    for row in rows {
        writeln!(out, "{}", line(row.iter().map(String::as_str).collect()))?;
    }
    Ok(())
}

impl ReportPort for TableReportAdapter {
    fn write_signals(
        &self,
        records: &[SignalRecord],
        out: &mut dyn Write,
    ) -> Result<(), ScreenerError> {
        let rows: Vec<_> = records.iter().map(signal_row).collect();
        render(out, &SIGNAL_HEADERS, &rows, 2)?;
        Ok(())
    }

    fn write_chart(&self, trace: &ChartTrace, out: &mut dyn Write) -> Result<(), ScreenerError> {
        writeln!(
            out,
            "{}: {} bars, {} events, signal {}",
            trace.symbol,
            trace.prices.len(),
            trace.events.len(),
            trace.record.signal
        )?;
        let rows = chart_rows(trace);
        render(out, &CHART_HEADERS, &rows, 1)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::position::Position;
    use crate::domain::signal::Signal;
    use chrono::NaiveDate;

    fn render_signals(records: &[SignalRecord]) -> String {
        let mut buf = Vec::new();
        TableReportAdapter.write_signals(records, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn header_and_rule() {
        let text = render_signals(&[]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Stock  Signal  Buy Price"));
        assert!(lines[1].starts_with("-----  ------"));
    }

    #[test]
    fn rows_in_input_order() {
        let text = render_signals(&[
            SignalRecord::bare("TCS", Signal::Hold),
            SignalRecord::no_data("INFY"),
        ]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("TCS "));
        assert!(lines[2].contains("HOLD"));
        assert!(lines[3].starts_with("INFY"));
        assert!(lines[3].contains("NO DATA"));
    }

    #[test]
    fn open_position_prices_shown() {
        let pos = Position::open(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), 91.0);
        let text = render_signals(&[SignalRecord::holding("SBIN", &pos)]);
        let row = text.lines().nth(2).unwrap();
        assert!(row.contains("BUY"));
        assert!(row.contains("91.00"));
        assert!(row.contains("93.73"));
        assert!(row.contains("95.55"));
    }

    #[test]
    fn columns_are_aligned() {
        let text = render_signals(&[
            SignalRecord::bare("LT", Signal::Sell),
            SignalRecord::bare("BHARTIARTL", Signal::Hold),
        ]);
        let lines: Vec<&str> = text.lines().collect();
        let signal_col = lines[0].find("Signal").unwrap();
        assert_eq!(lines[2].find("SELL"), Some(signal_col));
        assert_eq!(lines[3].find("HOLD"), Some(signal_col));
    }
}
