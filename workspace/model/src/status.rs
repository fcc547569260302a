use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Pipeline readiness of a sales group.
///
/// The three states are mutually exclusive. A group moves between them only
/// through [`GroupStatus::apply`], driven by the outcome of an upload or a
/// forecast run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupStatus {
    /// Enough history has been uploaded to run a forecast.
    Ready,
    /// The group is missing data and cannot be forecasted yet.
    NeedsData,
    /// A forecast has been generated from the current data.
    Forecasted,
}

/// Events that move a group through its pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineEvent {
    UploadSucceeded,
    ForecastSucceeded,
}

/// Errors raised by model level validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatusError {
    /// The event is not accepted in the current state
    #[error("Cannot apply {event:?} to a group in state '{from}'")]
    InvalidTransition {
        from: GroupStatus,
        event: PipelineEvent,
    },

    /// The status string is not one of the known states
    #[error("Unknown group status: {0}")]
    UnknownStatus(String),

    /// The reserved "All" sentinel was used as a real tag
    #[error("'{0}' is reserved and cannot be used as a tag")]
    ReservedTag(String),
}

impl GroupStatus {
    /// Returns the state reached after `event`, or an error when the event is
    /// not allowed from the current state.
    ///
    /// A successful upload always leaves the group `Ready`, which also makes an
    /// existing forecast stale. A forecast run needs data to start from.
    pub fn apply(self, event: PipelineEvent) -> Result<GroupStatus, StatusError> {
        let next = match (self, event) {
            (_, PipelineEvent::UploadSucceeded) => GroupStatus::Ready,
            (GroupStatus::Ready | GroupStatus::Forecasted, PipelineEvent::ForecastSucceeded) => {
                GroupStatus::Forecasted
            }
            (GroupStatus::NeedsData, PipelineEvent::ForecastSucceeded) => {
                return Err(StatusError::InvalidTransition { from: self, event });
            }
        };
        debug!(from = %self, to = %next, ?event, "Status transition");
        Ok(next)
    }

    /// The kebab-case identifier used in fixtures and serialized output.
    pub fn as_str(self) -> &'static str {
        match self {
            GroupStatus::Ready => "ready",
            GroupStatus::NeedsData => "needs-data",
            GroupStatus::Forecasted => "forecasted",
        }
    }

    /// Human readable label ("needs data").
    pub fn label(self) -> String {
        self.as_str().replace('-', " ")
    }
}

impl fmt::Display for GroupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupStatus {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ready" => Ok(GroupStatus::Ready),
            "needs-data" => Ok(GroupStatus::NeedsData),
            "forecasted" => Ok(GroupStatus::Forecasted),
            other => Err(StatusError::UnknownStatus(other.to_string())),
        }
    }
}
