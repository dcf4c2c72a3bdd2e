//! Screener pipeline: fetch -> compute -> evaluate for each symbol of a basket.
//!
//! ScreenerConfig carries the basket, the date window, the oscillator
//! parameters and the signal policy. Symbols never share state; a failing
//! symbol becomes a NO DATA record and the rest of the basket carries on.

use crate::domain::error::ScreenerError;
use crate::domain::indicator::OscillatorParams;
use crate::domain::indicator::stochastic::calculate_stochastic;
use crate::domain::policy::SignalPolicy;
use crate::domain::price::PricePoint;
use crate::domain::signal::{ChartTrace, Signal, SignalRecord};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use rayon::prelude::*;

pub const DEFAULT_LOOKBACK_DAYS: i64 = 180;

#[derive(Debug, Clone)]
pub struct ScreenerConfig {
    pub codes: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub params: OscillatorParams,
    pub policy: SignalPolicy,
    pub workers: usize,
}

impl ScreenerConfig {
    /// Window of `lookback_days` calendar days ending at `end_date`.
    pub fn with_lookback(
        codes: Vec<String>,
        end_date: NaiveDate,
        lookback_days: i64,
    ) -> Result<Self, ScreenerError> {
        let start_date = chrono::TimeDelta::try_days(lookback_days)
            .and_then(|span| end_date.checked_sub_signed(span))
            .ok_or_else(|| {
                ScreenerError::invalid(
                    "screener",
                    "lookback_days",
                    format!("{} days before {} is out of range", lookback_days, end_date),
                )
            })?;

        Ok(Self {
            codes,
            start_date,
            end_date,
            params: OscillatorParams::default(),
            policy: SignalPolicy::default(),
            workers: 1,
        })
    }
}

fn fetch(
    data_port: &dyn DataPort,
    code: &str,
    config: &ScreenerConfig,
) -> Result<Vec<PricePoint>, ScreenerError> {
    let prices = data_port.fetch_prices(code, config.start_date, config.end_date)?;
    if prices.is_empty() {
        return Err(ScreenerError::NoData {
            code: code.to_string(),
        });
    }
    Ok(prices)
}

pub fn screen_symbol(data_port: &dyn DataPort, code: &str, config: &ScreenerConfig) -> SignalRecord {
    let prices = match fetch(data_port, code, config) {
        Ok(prices) => prices,
        Err(e) => {
            tracing::warn!(code, error = %e, "no usable data");
            return SignalRecord::no_data(code);
        }
    };

    if prices.len() < config.params.warmup() {
        tracing::debug!(
            code,
            bars = prices.len(),
            needed = config.params.warmup(),
            "short history, oscillator partly undefined"
        );
    }

    let oscillator = calculate_stochastic(&prices, config.params);
    let record = config.policy.evaluate(code, &prices, &oscillator);
    tracing::debug!(code, bars = prices.len(), signal = %record.signal, "screened");
    record
}

/// Screen every code in basket order. With `workers > 1` symbols are screened
/// on a dedicated rayon pool; the output order is the same either way.
pub fn screen_basket(data_port: &(dyn DataPort + Sync), config: &ScreenerConfig) -> Vec<SignalRecord> {
    let screen = |code: &String| screen_symbol(data_port, code, config);

    let records: Vec<SignalRecord> = if config.workers <= 1 || config.codes.len() <= 1 {
        config.codes.iter().map(screen).collect()
    } else {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .build()
        {
            Ok(pool) => pool.install(|| config.codes.par_iter().map(screen).collect()),
            Err(e) => {
                tracing::warn!(error = %e, "worker pool unavailable, screening sequentially");
                config.codes.iter().map(screen).collect()
            }
        }
    };

    let summary = Summary::of(&records);
    tracing::info!(
        total = records.len(),
        buy = summary.buy,
        sell = summary.sell,
        hold = summary.hold,
        no_data = summary.no_data,
        "screen complete"
    );
    records
}

/// Chart projection for one symbol. Unlike [`screen_symbol`], a data failure
/// is returned to the caller since there is nothing to draw.
pub fn chart_symbol(
    data_port: &dyn DataPort,
    code: &str,
    config: &ScreenerConfig,
) -> Result<ChartTrace, ScreenerError> {
    let prices = fetch(data_port, code, config)?;
    let oscillator = calculate_stochastic(&prices, config.params);
    Ok(config.policy.trace(code, prices, oscillator))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub buy: usize,
    pub sell: usize,
    pub hold: usize,
    pub no_data: usize,
}

impl Summary {
    pub fn of(records: &[SignalRecord]) -> Self {
        records.iter().fold(Self::default(), |mut acc, r| {
            match r.signal {
                Signal::Buy => acc.buy += 1,
                Signal::Sell => acc.sell += 1,
                Signal::Hold => acc.hold += 1,
                Signal::NoData => acc.no_data += 1,
            }
            acc
        })
    }
}
