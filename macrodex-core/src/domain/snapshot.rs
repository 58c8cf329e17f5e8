//! Point-in-time readings of the three sources.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Central-bank liquidity at one date.
///
/// `liquidity` is computed once in [`LiquiditySnapshot::new`] as
/// balance sheet minus treasury account minus reverse repo. The fields are
/// private so the identity cannot drift after construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LiquiditySnapshot {
    fed_balance_sheet: f64,
    treasury_account_balance: f64,
    reverse_repo_balance: f64,
    liquidity: f64,
    date: NaiveDate,
}

impl LiquiditySnapshot {
    pub fn new(
        date: NaiveDate,
        fed_balance_sheet: f64,
        treasury_account_balance: f64,
        reverse_repo_balance: f64,
    ) -> Self {
        Self {
            fed_balance_sheet,
            treasury_account_balance,
            reverse_repo_balance,
            liquidity: fed_balance_sheet - treasury_account_balance - reverse_repo_balance,
            date,
        }
    }

    pub fn fed_balance_sheet(&self) -> f64 {
        self.fed_balance_sheet
    }

    pub fn treasury_account_balance(&self) -> f64 {
        self.treasury_account_balance
    }

    pub fn reverse_repo_balance(&self) -> f64 {
        self.reverse_repo_balance
    }

    pub fn liquidity(&self) -> f64 {
        self.liquidity
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

#[derive(Deserialize)]
struct RawLiquiditySnapshot {
    fed_balance_sheet: f64,
    treasury_account_balance: f64,
    reverse_repo_balance: f64,
    date: NaiveDate,
}

// A serialized `liquidity` field is ignored; the value is always recomputed.
impl<'de> Deserialize<'de> for LiquiditySnapshot {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawLiquiditySnapshot::deserialize(deserializer)?;
        Ok(Self::new(
            raw.date,
            raw.fed_balance_sheet,
            raw.treasury_account_balance,
            raw.reverse_repo_balance,
        ))
    }
}

/// Neutral PMI reading: the expansion/contraction threshold.
pub const PMI_NEUTRAL: f64 = 50.0;

/// Business-cycle survey reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PmiSnapshot {
    pub value: f64,
    pub date: NaiveDate,
    /// Change versus the preceding release.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prior_change: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_note: Option<String>,
}

impl PmiSnapshot {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self {
            value,
            date,
            prior_change: None,
            source_note: None,
        }
    }

    /// Placeholder reading used when no PMI observation covers `date`.
    pub fn neutral(date: NaiveDate) -> Self {
        Self::new(date, PMI_NEUTRAL)
    }

    pub fn with_prior_change(mut self, change: Option<f64>) -> Self {
        self.prior_change = change;
        self
    }

    pub fn with_source_note(mut self, note: impl Into<String>) -> Self {
        self.source_note = Some(note.into());
        self
    }
}

/// Asset price reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub price: f64,
    pub timestamp: DateTime<Utc>,
    /// Percent change versus the reading 24 hours earlier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_24h: Option<f64>,
}

impl PriceSnapshot {
    pub fn new(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self {
            price,
            timestamp,
            change_24h: None,
        }
    }

    /// Attach the percent change from `previous`. A zero previous price
    /// leaves the change unset.
    pub fn with_change_from(mut self, previous: Option<f64>) -> Self {
        self.change_24h = previous
            .filter(|p| *p != 0.0)
            .map(|p| (self.price - p) / p * 100.0);
        self
    }
}
