//! Signal output types: the per-symbol record and the transition events used
//! for charting.

use crate::domain::indicator::OscillatorPoint;
use crate::domain::position::Position;
use crate::domain::price::PricePoint;
use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
    NoData,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::Hold => "HOLD",
            Signal::NoData => "NO DATA",
        };
        f.write_str(s)
    }
}

/// One row of screener output.
///
/// The price fields are only populated for a BUY with a position still open
/// at the end of the replay.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalRecord {
    pub symbol: String,
    pub signal: Signal,
    pub entry_price: Option<f64>,
    pub target3: Option<f64>,
    pub target5: Option<f64>,
    pub hit3: Option<f64>,
    pub hit5: Option<f64>,
}

impl SignalRecord {
    pub fn bare(symbol: &str, signal: Signal) -> Self {
        Self {
            symbol: symbol.to_string(),
            signal,
            entry_price: None,
            target3: None,
            target5: None,
            hit3: None,
            hit5: None,
        }
    }

    pub fn no_data(symbol: &str) -> Self {
        Self::bare(symbol, Signal::NoData)
    }

    pub fn holding(symbol: &str, position: &Position) -> Self {
        Self {
            symbol: symbol.to_string(),
            signal: Signal::Buy,
            entry_price: Some(position.entry_price),
            target3: Some(position.target3),
            target5: Some(position.target5),
            hit3: position.hit3,
            hit5: position.hit5,
        }
    }

    pub fn has_position(&self) -> bool {
        self.entry_price.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventReason {
    Crossover,
    TargetReached,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Buy => f.write_str("BUY"),
            EventKind::Sell => f.write_str("SELL"),
        }
    }
}

impl fmt::Display for EventReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventReason::Crossover => f.write_str("crossover"),
            EventReason::TargetReached => f.write_str("target"),
        }
    }
}

/// A BUY or SELL transition observed during a replay.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalEvent {
    pub date: NaiveDate,
    pub kind: EventKind,
    pub reason: EventReason,
    pub k: Option<f64>,
    pub price: f64,
}

/// Everything a chart of one symbol needs, taken from a single replay.
#[derive(Debug, Clone)]
pub struct ChartTrace {
    pub symbol: String,
    pub record: SignalRecord,
    pub prices: Vec<PricePoint>,
    pub oscillator: Vec<OscillatorPoint>,
    pub events: Vec<SignalEvent>,
}

impl ChartTrace {
    pub fn event_on(&self, date: NaiveDate) -> Option<&SignalEvent> {
        self.events.iter().rev().find(|e| e.date == date)
    }
}
