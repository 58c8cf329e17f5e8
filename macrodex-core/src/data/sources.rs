//! The raw histories the index is computed from.

use crate::domain::DailySeries;
use chrono::NaiveDate;

/// Raw per-source histories, already parsed and in consistent units.
///
/// Price data with intraday timestamps is collapsed to one value per day
/// (`IntradaySeries::to_daily`) before it is stored here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceSeries {
    pub fed_balance_sheet: DailySeries,
    pub treasury_account: DailySeries,
    pub reverse_repo: DailySeries,
    pub pmi: DailySeries,
    pub price: DailySeries,
    /// Attached to every PMI snapshot built from `pmi`.
    pub pmi_note: Option<String>,
}

impl SourceSeries {
    /// Most recent observation date across the liquidity components and
    /// price, or `None` if any of them is empty. This is the date the
    /// current index is computed for.
    pub fn latest_common_date(&self) -> Option<NaiveDate> {
        [
            &self.fed_balance_sheet,
            &self.treasury_account,
            &self.reverse_repo,
            &self.price,
        ]
        .iter()
        .map(|s| s.last().map(|p| p.date))
        .collect::<Option<Vec<_>>>()?
        .into_iter()
        .max()
    }

    /// Earliest date on which the liquidity components and price all have
    /// an observation.
    pub fn earliest_common_date(&self) -> Option<NaiveDate> {
        [
            &self.fed_balance_sheet,
            &self.treasury_account,
            &self.reverse_repo,
            &self.price,
        ]
        .iter()
        .map(|s| s.first().map(|p| p.date))
        .collect::<Option<Vec<_>>>()?
        .into_iter()
        .max()
    }

    /// Total observation count across all sources.
    pub fn observation_count(&self) -> usize {
        self.fed_balance_sheet.len()
            + self.treasury_account.len()
            + self.reverse_repo.len()
            + self.pmi.len()
            + self.price.len()
    }
}
