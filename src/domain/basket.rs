//! Equity basket: the ordered list of symbols screened in one run.
//!
//! Parses code lists from configuration. The default basket is the NSE V40
//! list; callers override it through `[screener] codes`.

use std::collections::HashSet;

pub const DEFAULT_BASKET: [&str; 40] = [
    "RELIANCE", "TCS", "INFY", "HDFCBANK", "ICICIBANK", "HINDUNILVR", "SBIN", "BHARTIARTL",
    "AXISBANK", "KOTAKBANK", "ITC", "LT", "BAJFINANCE", "ASIANPAINT", "MARUTI", "SUNPHARMA",
    "ULTRACEMCO", "HCLTECH", "WIPRO", "TECHM", "ONGC", "POWERGRID", "NTPC", "ADANIPORTS",
    "COALINDIA", "NESTLEIND", "TITAN", "BAJAJFINSV", "HDFCLIFE", "GRASIM", "BRITANNIA",
    "DRREDDY", "CIPLA", "EICHERMOT", "HEROMOTOCO", "M&M", "DIVISLAB", "BPCL", "SHREECEM", "UPL",
];

pub fn default_basket() -> Vec<String> {
    DEFAULT_BASKET.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BasketError {
    #[error("empty token in code list")]
    EmptyToken,

    #[error("duplicate code: {0}")]
    DuplicateCode(String),
}

pub fn parse_codes(input: &str) -> Result<Vec<String>, BasketError> {
    let mut codes = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(BasketError::EmptyToken);
        }
        let code = trimmed.to_uppercase();
        if !seen.insert(code.clone()) {
            return Err(BasketError::DuplicateCode(code));
        }
        codes.push(code);
    }

    Ok(codes)
}
