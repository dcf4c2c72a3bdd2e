//! Price data access port trait.

use crate::domain::error::ScreenerError;
use crate::domain::price::PricePoint;
use chrono::NaiveDate;

/// A source of daily bars for one symbol.
///
/// Implementations return bars sorted by date with no duplicate dates. An
/// empty vector means the source had nothing for the window.
pub trait DataPort {
    fn fetch_prices(
        &self,
        code: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, ScreenerError>;

    /// Short label used in logs.
    fn name(&self) -> String {
        std::any::type_name::<Self>()
            .rsplit("::")
            .next()
            .unwrap_or("source")
            .to_string()
    }
}
