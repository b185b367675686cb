use crate::error::PivotgenError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kline interval, named the way the exchange API names it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "1h")]
    OneHour,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneMinute => "1m",
            Self::FifteenMinutes => "15m",
            Self::ThirtyMinutes => "30m",
            Self::OneHour => "1h",
        }
    }

    pub fn all() -> [Self; 4] {
        [
            Self::OneMinute,
            Self::FifteenMinutes,
            Self::ThirtyMinutes,
            Self::OneHour,
        ]
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = PivotgenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|tf| tf.as_str() == s)
            .ok_or_else(|| PivotgenError::Configuration(format!("Unknown timeframe: {}", s)))
    }
}
