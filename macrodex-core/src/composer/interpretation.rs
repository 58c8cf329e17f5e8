//! Categorical reading of a direction index value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Five buckets over [0, 100]. Each bucket's upper bound is exclusive, so
/// 20.0 is `Bearish`, not `VeryBearish`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpretation {
    VeryBearish,
    Bearish,
    Neutral,
    Bullish,
    VeryBullish,
}

impl Interpretation {
    pub fn from_index(index: f64) -> Self {
        if index < 20.0 {
            Self::VeryBearish
        } else if index < 40.0 {
            Self::Bearish
        } else if index < 60.0 {
            Self::Neutral
        } else if index < 80.0 {
            Self::Bullish
        } else {
            Self::VeryBullish
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryBearish => "very_bearish",
            Self::Bearish => "bearish",
            Self::Neutral => "neutral",
            Self::Bullish => "bullish",
            Self::VeryBullish => "very_bullish",
        }
    }
}

impl fmt::Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
