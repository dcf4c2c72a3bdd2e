//! CSV rendering via the `csv` crate.

use crate::adapters::signal_report::{chart_rows, signal_row, CHART_HEADERS, SIGNAL_HEADERS};
use crate::domain::error::ScreenerError;
use crate::domain::signal::{ChartTrace, SignalRecord};
use crate::ports::report_port::ReportPort;
use std::io::Write;

pub struct CsvReportAdapter;

fn write_all<const N: usize>(
    out: &mut dyn Write,
    headers: &[&str; N],
    rows: &[[String; N]],
) -> Result<(), ScreenerError> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(headers).map_err(std::io::Error::from)?;
    for row in rows {
        wtr.write_record(row).map_err(std::io::Error::from)?;
    }
    wtr.flush()?;
    Ok(())
}

impl ReportPort for CsvReportAdapter {
    fn write_signals(
        &self,
        records: &[SignalRecord],
        out: &mut dyn Write,
    ) -> Result<(), ScreenerError> {
        let rows: Vec<_> = records.iter().map(signal_row).collect();
        write_all(out, &SIGNAL_HEADERS, &rows)
    }

    fn write_chart(&self, trace: &ChartTrace, out: &mut dyn Write) -> Result<(), ScreenerError> {
        write_all(out, &CHART_HEADERS, &chart_rows(trace))
    }
}
