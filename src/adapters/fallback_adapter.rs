//! Ordered fallback across several data sources.
//!
//! Sources are tried in order until one returns a non-empty series. Which
//! source failed, and how, is logged but never reaches the caller: a symbol
//! that no source can serve is reported as `NoData`.

use crate::domain::error::ScreenerError;
use crate::domain::price::PricePoint;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;

pub struct FallbackDataPort {
    sources: Vec<Box<dyn DataPort + Send + Sync>>,
}

impl FallbackDataPort {
    pub fn new(sources: Vec<Box<dyn DataPort + Send + Sync>>) -> Self {
        Self { sources }
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl DataPort for FallbackDataPort {
    fn fetch_prices(
        &self,
        code: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, ScreenerError> {
        for source in &self.sources {
            match source.fetch_prices(code, start_date, end_date) {
                Ok(prices) if !prices.is_empty() => return Ok(prices),
                Ok(_) => {
                    tracing::debug!(code, source = %source.name(), "source returned no bars");
                }
                Err(e) => {
                    tracing::debug!(code, source = %source.name(), error = %e, "source failed");
                }
            }
        }

        Err(ScreenerError::NoData {
            code: code.to_string(),
        })
    }

    fn name(&self) -> String {
        let names: Vec<String> = self.sources.iter().map(|s| s.name()).collect();
        format!("fallback[{}]", names.join(" -> "))
    }
}
