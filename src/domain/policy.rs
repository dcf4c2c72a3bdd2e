//! Signal policy selection.
//!
//! The stateful tracker and the latest-bar classifier are separate
//! strategies; this enum only picks one of them.

use crate::domain::indicator::OscillatorSeries;
use crate::domain::price::PricePoint;
use crate::domain::signal::{ChartTrace, SignalRecord};
use crate::domain::{latest_only, tracker};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignalPolicy {
    #[default]
    Stateful,
    LatestOnly,
}

impl SignalPolicy {
    pub fn evaluate(
        &self,
        symbol: &str,
        prices: &[PricePoint],
        oscillator: &OscillatorSeries,
    ) -> SignalRecord {
        match self {
            SignalPolicy::Stateful => tracker::evaluate(symbol, prices, oscillator),
            SignalPolicy::LatestOnly => latest_only::evaluate(symbol, prices, oscillator),
        }
    }

    /// Chart projection of the same evaluation. Only the stateful policy
    /// produces transition events.
    pub fn trace(
        &self,
        symbol: &str,
        prices: Vec<PricePoint>,
        oscillator: OscillatorSeries,
    ) -> ChartTrace {
        let (record, events) = match self {
            SignalPolicy::Stateful => match tracker::replay(&prices, &oscillator.points) {
                Some(state) => (state.record(symbol), state.events),
                None => (SignalRecord::no_data(symbol), Vec::new()),
            },
            SignalPolicy::LatestOnly => {
                (latest_only::evaluate(symbol, &prices, &oscillator), Vec::new())
            }
        };

        ChartTrace {
            symbol: symbol.to_string(),
            record,
            prices,
            oscillator: oscillator.points,
            events,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown signal mode '{0}' (expected 'stateful' or 'latest-only')")]
pub struct UnknownPolicy(pub String);

impl FromStr for SignalPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stateful" => Ok(SignalPolicy::Stateful),
            "latest-only" | "latest_only" | "latest" => Ok(SignalPolicy::LatestOnly),
            other => Err(UnknownPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for SignalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalPolicy::Stateful => f.write_str("stateful"),
            SignalPolicy::LatestOnly => f.write_str("latest-only"),
        }
    }
}
