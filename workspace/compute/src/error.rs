use model::{GroupStatus, PipelineEvent, StatusError};
use thiserror::Error;
use tracing::error;

/// Error types for the compute module
#[derive(Error, Debug)]
pub enum ComputeError {
    /// No group with this id exists in the catalog
    #[error("Unknown sales group: {0}")]
    UnknownGroup(String),

    /// A group with this id is already in the catalog
    #[error("Sales group '{0}' already exists")]
    DuplicateGroup(String),

    /// No history record with this id exists for the selected group
    #[error("Unknown forecast record: {0}")]
    UnknownRecord(String),

    /// The "All" sentinel was used as a real tag
    #[error("'{0}' is reserved and cannot be used as a tag")]
    ReservedTag(String),

    /// The group's pipeline state does not accept the event
    #[error("Sales group '{group}' in state '{from}' cannot accept {event:?}")]
    InvalidTransition {
        group: String,
        from: GroupStatus,
        event: PipelineEvent,
    },

    /// The catalog source delivered no groups
    #[error("Catalog source '{0}' returned no sales groups")]
    EmptyCatalog(String),

    /// Reading or decoding a catalog source failed
    #[error("Catalog source error: {0}")]
    Source(String),

    /// A wizard move that is not allowed from the current step
    #[error("Navigation error: {0}")]
    Navigation(String),

    /// User input rejected before starting an action
    #[error("Validation error: {0}")]
    Validation(String),

    /// A simulated task was cancelled before completing
    #[error("{0} was cancelled")]
    Cancelled(String),

    /// Runtime error for unexpected situations
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl ComputeError {
    /// Attaches the group id to a model level status error.
    pub fn from_status(group: &str, err: StatusError) -> Self {
        let compute_error = match err {
            StatusError::InvalidTransition { from, event } => ComputeError::InvalidTransition {
                group: group.to_string(),
                from,
                event,
            },
            StatusError::ReservedTag(tag) => ComputeError::ReservedTag(tag),
            StatusError::UnknownStatus(status) => {
                ComputeError::Validation(format!("Unknown status '{}'", status))
            }
        };
        error!(?compute_error, group, "Status error");
        compute_error
    }
}

impl From<StatusError> for ComputeError {
    fn from(err: StatusError) -> Self {
        match err {
            StatusError::ReservedTag(tag) => ComputeError::ReservedTag(tag),
            other => ComputeError::Validation(other.to_string()),
        }
    }
}

impl From<std::io::Error> for ComputeError {
    fn from(err: std::io::Error) -> Self {
        let compute_error = ComputeError::Source(err.to_string());
        error!(?compute_error, "I/O error while reading catalog");
        compute_error
    }
}

impl From<serde_json::Error> for ComputeError {
    fn from(err: serde_json::Error) -> Self {
        ComputeError::Source(format!("Invalid JSON catalog: {}", err))
    }
}

impl From<serde_yaml::Error> for ComputeError {
    fn from(err: serde_yaml::Error) -> Self {
        ComputeError::Source(format!("Invalid YAML catalog: {}", err))
    }
}

/// Type alias for Result with ComputeError
pub type Result<T> = std::result::Result<T, ComputeError>;
