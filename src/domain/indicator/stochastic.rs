//! Stochastic oscillator.
//!
//! %K[i] = 100 * (C[i] - LL) / (HH - LL), where HH/LL are the highest high and
//! lowest low over the last `k_window` bars ending at i.
//! %D[i] = SMA of the last `d_smooth` %K values.
//!
//! %K is undefined for the first `k_window - 1` bars and for any bar whose
//! window has HH == LL or holds a non-finite price. %D is undefined unless
//! every %K in its window is defined.

use crate::domain::indicator::{OscillatorParams, OscillatorPoint, OscillatorSeries};
use crate::domain::price::PricePoint;

pub fn calculate_stochastic(series: &[PricePoint], params: OscillatorParams) -> OscillatorSeries {
    let OscillatorParams { k_window, d_smooth } = params;

    let k_values: Vec<Option<f64>> = (0..series.len())
        .map(|i| percent_k(series, i, k_window))
        .collect();

    let points = series
        .iter()
        .enumerate()
        .map(|(i, bar)| OscillatorPoint {
            date: bar.date,
            k: k_values[i],
            d: percent_d(&k_values, i, d_smooth),
        })
        .collect();

    OscillatorSeries { params, points }
}

fn percent_k(series: &[PricePoint], i: usize, k_window: usize) -> Option<f64> {
    if k_window == 0 || i + 1 < k_window {
        return None;
    }

    let window = &series[i + 1 - k_window..=i];
    if window
        .iter()
        .any(|b| !(b.high.is_finite() && b.low.is_finite() && b.close.is_finite()))
    {
        return None;
    }

    let highest = window.iter().fold(f64::NEG_INFINITY, |acc, b| acc.max(b.high));
    let lowest = window.iter().fold(f64::INFINITY, |acc, b| acc.min(b.low));
    let range = highest - lowest;

    // Flat (or inverted) window: no meaningful position within the range.
    if range <= 0.0 {
        return None;
    }

    Some(100.0 * (series[i].close - lowest) / range)
}

fn percent_d(k_values: &[Option<f64>], i: usize, d_smooth: usize) -> Option<f64> {
    if d_smooth == 0 || i + 1 < d_smooth {
        return None;
    }

    k_values[i + 1 - d_smooth..=i]
        .iter()
        .copied()
        .sum::<Option<f64>>()
        .map(|sum| sum / d_smooth as f64)
}
