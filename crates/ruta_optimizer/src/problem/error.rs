use thiserror::Error;

/// Input rejected before any solve starts.
#[derive(Debug, Error, PartialEq)]
pub enum ProblemError {
    #[error("no vehicles available")]
    NoVehicles,

    #[error("no visits to plan")]
    NoVisits,

    #[error("missing field {field} on {entity}")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("malformed date range: start must precede end")]
    MalformedDateRange,

    #[error("vehicle {0}: speed must be a positive number of km/h")]
    InvalidSpeed(String),

    #[error("vehicle {0}: capacities and cost per km must not be negative")]
    InvalidCapacity(String),

    #[error("vehicle {0}: shift start must precede shift end")]
    InvalidShift(String),

    #[error("visit {0}: priority must be at least 1")]
    InvalidPriority(String),

    #[error("visit {0}: demand and service time must not be negative")]
    InvalidDemand(String),

    #[error("{0}: coordinates out of range")]
    InvalidCoordinates(String),

    #[error("delay multiplier must be at least 1.0, got {0}")]
    InvalidDelayMultiplier(f64),

    #[error("duplicate id {0}")]
    DuplicateId(String),

    #[error("unknown id {0}")]
    UnknownId(String),

    #[error("optimization time must be between {min} and {max} seconds, got {actual}")]
    InvalidOptimizationTime { min: i64, max: i64, actual: i64 },
}
