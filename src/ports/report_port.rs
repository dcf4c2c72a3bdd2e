//! Report generation port trait.

use crate::domain::error::ScreenerError;
use crate::domain::signal::{ChartTrace, SignalRecord};
use std::io::Write;

/// Port for rendering screener output.
pub trait ReportPort {
    fn write_signals(
        &self,
        records: &[SignalRecord],
        out: &mut dyn Write,
    ) -> Result<(), ScreenerError>;

    fn write_chart(&self, trace: &ChartTrace, out: &mut dyn Write) -> Result<(), ScreenerError>;
}
