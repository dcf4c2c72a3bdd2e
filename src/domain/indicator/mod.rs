//! Oscillator value types.
//!
//! - `OscillatorParams`: window lengths, also used as the series identity
//! - `OscillatorPoint`: one aligned (%K, %D) pair; `None` marks an undefined value
//! - `OscillatorSeries`: a time series of oscillator points

pub mod stochastic;

use chrono::NaiveDate;
use std::fmt;

pub const DEFAULT_K_WINDOW: usize = 4;
pub const DEFAULT_D_SMOOTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OscillatorParams {
    pub k_window: usize,
    pub d_smooth: usize,
}

impl Default for OscillatorParams {
    fn default() -> Self {
        Self {
            k_window: DEFAULT_K_WINDOW,
            d_smooth: DEFAULT_D_SMOOTH,
        }
    }
}

impl OscillatorParams {
    /// Bars needed before the first defined %D.
    pub fn warmup(&self) -> usize {
        (self.k_window + self.d_smooth).saturating_sub(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatorPoint {
    pub date: NaiveDate,
    pub k: Option<f64>,
    pub d: Option<f64>,
}

impl OscillatorPoint {
    /// Both lines, if both are defined.
    pub fn lines(&self) -> Option<(f64, f64)> {
        Some((self.k?, self.d?))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OscillatorSeries {
    pub params: OscillatorParams,
    pub points: Vec<OscillatorPoint>,
}

impl OscillatorSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&OscillatorPoint> {
        self.points.last()
    }
}

impl fmt::Display for OscillatorParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "STOCHASTIC({},{})", self.k_window, self.d_smooth)
    }
}
