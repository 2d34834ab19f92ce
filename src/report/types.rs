//! The daily report record

use crate::market::CurrencyRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Six derived figures for one reporting cycle
///
/// Field names are the keys of the persisted JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub highest_traded: CurrencyRecord,
    pub top_10_by_increment: Vec<CurrencyRecord>,
    pub top_10_by_decrement: Vec<CurrencyRecord>,
    pub total_price_top_20: f64,
    pub total_price_of_higher_volume_currencies: f64,
    pub percent_change_of_twenty_best: f64,
}

impl Report {
    /// Symbols that appear among both the best and the worst movers
    ///
    /// Only possible when the listing holds fewer currencies than the two
    /// lists together; otherwise it points at duplicated data from the API.
    pub fn shared_movers(&self) -> Vec<String> {
        let gainers: BTreeSet<&str> = self
            .top_10_by_increment
            .iter()
            .map(|r| r.symbol.as_str())
            .collect();

        self.top_10_by_decrement
            .iter()
            .map(|r| r.symbol.as_str())
            .filter(|symbol| gainers.contains(symbol))
            .collect::<BTreeSet<&str>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}
