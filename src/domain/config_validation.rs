//! Configuration validation.
//!
//! Validates every screener config field before any data is fetched.

use crate::domain::basket::parse_codes;
use crate::domain::error::ScreenerError;
use crate::domain::policy::SignalPolicy;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn validate_screener_config(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    validate_codes(config)?;
    validate_positive(config, "lookback_days")?;
    validate_positive(config, "k_window")?;
    validate_positive(config, "d_smooth")?;
    validate_positive(config, "workers")?;
    validate_end_date(config)?;
    validate_mode(config)?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    if config.get_non_empty("data", "primary").is_none() {
        return Err(ScreenerError::ConfigMissing {
            section: "data".to_string(),
            key: "primary".to_string(),
        });
    }
    Ok(())
}

fn validate_codes(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    match config.get_non_empty("screener", "codes") {
        None => Ok(()),
        Some(codes) => parse_codes(&codes)
            .map(|_| ())
            .map_err(|e| ScreenerError::invalid("screener", "codes", e.to_string())),
    }
}

fn validate_positive(config: &dyn ConfigPort, key: &str) -> Result<(), ScreenerError> {
    let Some(raw) = config.get_non_empty("screener", key) else {
        return Ok(());
    };
    match raw.parse::<i64>() {
        Ok(v) if v > 0 => Ok(()),
        Ok(_) => Err(ScreenerError::invalid(
            "screener",
            key,
            format!("{} must be positive", key),
        )),
        Err(_) => Err(ScreenerError::invalid(
            "screener",
            key,
            format!("{} must be an integer", key),
        )),
    }
}

fn validate_end_date(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    match config.get_non_empty("screener", "end_date") {
        None => Ok(()),
        Some(s) => parse_date(&s, "end_date").map(|_| ()),
    }
}

fn validate_mode(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    match config.get_non_empty("screener", "mode") {
        None => Ok(()),
        Some(s) => s
            .parse::<SignalPolicy>()
            .map(|_| ())
            .map_err(|e| ScreenerError::invalid("screener", "mode", e.to_string())),
    }
}

pub fn parse_date(value: &str, field: &str) -> Result<NaiveDate, ScreenerError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        ScreenerError::invalid(
            "screener",
            field,
            format!("invalid {} format, expected YYYY-MM-DD", field),
        )
    })
}
