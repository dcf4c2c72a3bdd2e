//! Latest-bar signal policy.
//!
//! Classifies only the final bar against the static thresholds. There is no
//! crossover memory and no position, so the record never carries prices.

use crate::domain::indicator::{OscillatorPoint, OscillatorSeries};
use crate::domain::price::PricePoint;
use crate::domain::signal::{Signal, SignalRecord};
use crate::domain::tracker::{is_aligned, OVERBOUGHT, OVERSOLD};

pub fn classify(point: &OscillatorPoint) -> Signal {
    match point.lines() {
        Some((k, d)) if k < OVERSOLD && d < OVERSOLD => Signal::Buy,
        Some((k, d)) if k > OVERBOUGHT && d > OVERBOUGHT => Signal::Sell,
        _ => Signal::Hold,
    }
}

pub fn evaluate(symbol: &str, prices: &[PricePoint], oscillator: &OscillatorSeries) -> SignalRecord {
    if !is_aligned(prices, &oscillator.points) {
        return SignalRecord::no_data(symbol);
    }
    match oscillator.last() {
        Some(point) => SignalRecord::bare(symbol, classify(point)),
        None => SignalRecord::no_data(symbol),
    }
}
