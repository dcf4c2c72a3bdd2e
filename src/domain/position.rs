//! Implied position held during a signal replay.

use chrono::NaiveDate;

pub const TARGET_3_MULT: f64 = 1.03;
pub const TARGET_5_MULT: f64 = 1.05;

/// A position opened by a BUY and held until the next SELL. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub target3: f64,
    pub target5: f64,
    pub hit3: Option<f64>,
    pub hit5: Option<f64>,
}

/// What a bar's close did to the open position's targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetOutcome {
    Open,
    /// The 5% target was reached; the position must be closed.
    Exit,
}

impl Position {
    pub fn open(entry_date: NaiveDate, entry_price: f64) -> Self {
        Self {
            entry_date,
            entry_price,
            target3: entry_price * TARGET_3_MULT,
            target5: entry_price * TARGET_5_MULT,
            hit3: None,
            hit5: None,
        }
    }

    /// Record target hits for a bar closing at `close`.
    ///
    /// A zero or negative entry price never tracks targets.
    pub fn apply_close(&mut self, close: f64) -> TargetOutcome {
        if self.entry_price <= 0.0 {
            return TargetOutcome::Open;
        }
        if self.hit3.is_none() && close >= self.target3 {
            self.hit3 = Some(self.target3);
        }
        if self.hit5.is_none() && close >= self.target5 {
            self.hit5 = Some(self.target5);
            return TargetOutcome::Exit;
        }
        TargetOutcome::Open
    }
}
