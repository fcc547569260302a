use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Forecast length picked in the configure step.
///
/// Display only: the horizon is recorded with a run but changes nothing in
/// the simulated output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Horizon {
    #[serde(rename = "1-month")]
    OneMonth,
    #[default]
    #[serde(rename = "3-months")]
    ThreeMonths,
    #[serde(rename = "1-year")]
    OneYear,
    #[serde(rename = "aop")]
    Aop,
}

impl Horizon {
    pub const ALL: [Horizon; 4] = [
        Horizon::OneMonth,
        Horizon::ThreeMonths,
        Horizon::OneYear,
        Horizon::Aop,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Horizon::OneMonth => "1-month",
            Horizon::ThreeMonths => "3-months",
            Horizon::OneYear => "1-year",
            Horizon::Aop => "aop",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Horizon::OneMonth => "1 Month",
            Horizon::ThreeMonths => "3 Months",
            Horizon::OneYear => "1 Year",
            Horizon::Aop => "AOP (Annual Operating Plan)",
        }
    }

    /// Short label used in history tables ("AOP" instead of the long form).
    pub fn short_label(self) -> &'static str {
        match self {
            Horizon::Aop => "AOP",
            other => other.label(),
        }
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Horizon {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Horizon::ALL
            .into_iter()
            .find(|h| h.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Unknown horizon '{}', expected one of: 1-month, 3-months, 1-year, aop",
                    s
                )
            })
    }
}

/// Options collected in the forecast configure step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastOptions {
    pub horizon: Horizon,
    /// Adjust for holidays, weekends and seasonal patterns.
    pub include_calendar: bool,
    /// Factor in pricing changes and elasticity.
    pub include_price: bool,
}

impl Default for ForecastOptions {
    fn default() -> Self {
        Self {
            horizon: Horizon::default(),
            include_calendar: true,
            include_price: true,
        }
    }
}

/// One row of a group's forecast history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub id: String,
    pub generated_on: NaiveDate,
    pub horizon: Horizon,
    pub model_version: String,
    /// Accuracy in percent (e.g. `94.2`).
    pub accuracy: f64,
    /// Expected growth in percent (e.g. `12.8`).
    pub growth: f64,
}

impl ForecastRecord {
    /// Date in the "Dec 26, 2024" form used on history screens.
    pub fn display_date(&self) -> String {
        self.generated_on.format("%b %-d, %Y").to_string()
    }

    pub fn display_accuracy(&self) -> String {
        format!("{:.1}%", self.accuracy)
    }

    pub fn display_growth(&self) -> String {
        format!("{:+.1}%", self.growth)
    }
}
