//! Time vocabulary for ranking windows and cache lifetimes

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Seconds in a day
pub const DAY_SECS: u64 = 86_400;
/// Seconds in a week
pub const WEEK_SECS: u64 = 7 * DAY_SECS;
/// Seconds in a 30-day month
pub const MONTH_SECS: u64 = 30 * DAY_SECS;
/// Seconds in a 365-day year, also the fallback slot lifetime
pub const YEAR_SECS: u64 = 365 * DAY_SECS;

/// Calendar unit used for ranking periods and cache expirations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodUnit {
    Day,
    Week,
    Month,
    Year,
}

impl PeriodUnit {
    pub fn seconds(&self) -> u64 {
        match self {
            Self::Day => DAY_SECS,
            Self::Week => WEEK_SECS,
            Self::Month => MONTH_SECS,
            Self::Year => YEAR_SECS,
        }
    }
}

impl fmt::Display for PeriodUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day => write!(f, "day"),
            Self::Week => write!(f, "week"),
            Self::Month => write!(f, "month"),
            Self::Year => write!(f, "year"),
        }
    }
}

impl FromStr for PeriodUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            _ => Err(format!(
                "Invalid period unit: {s}. Valid values are: day, week, month, year"
            )),
        }
    }
}

/// A unit count, e.g. "2 weeks"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Period {
    pub amount: u32,
    pub unit: PeriodUnit,
}

impl Period {
    pub fn new(amount: u32, unit: PeriodUnit) -> Self {
        Self { amount, unit }
    }

    pub fn as_secs(&self) -> u64 {
        u64::from(self.amount) * self.unit.seconds()
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.as_secs())
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.unit)
    }
}

/// The time window a ranking is computed for
///
/// Named scopes always span exactly one of their unit; `Custom` uses the
/// operator-configured period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Day,
    Week,
    Month,
    #[default]
    Custom,
}

impl Scope {
    /// All scopes, in cache-slot order
    pub const ALL: [Scope; 4] = [Scope::Day, Scope::Week, Scope::Month, Scope::Custom];

    /// The report window for this scope; `configured` applies to `Custom` only
    pub fn window(&self, configured: Period) -> Duration {
        match self {
            Self::Day => Duration::from_secs(DAY_SECS),
            Self::Week => Duration::from_secs(WEEK_SECS),
            Self::Month => Duration::from_secs(MONTH_SECS),
            Self::Custom => configured.duration(),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day => write!(f, "day"),
            Self::Week => write!(f, "week"),
            Self::Month => write!(f, "month"),
            Self::Custom => write!(f, "custom"),
        }
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "custom" => Ok(Self::Custom),
            _ => Err(format!(
                "Invalid scope: {s}. Valid values are: day, week, month, custom"
            )),
        }
    }
}
