use std::time::Duration;

use thiserror::Error;

use crate::sim::Phase;

/// Why an event generator produced nothing for a day.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("source unavailable: {0}")]
    Unavailable(String),

    #[error("timed out after {0:?}")]
    TimedOut(Duration),
}

/// Every failure the engine can report.
///
/// `EmptyWorld` and `GeneratorUnavailable` are absorbed inside a day and never
/// reach the caller of `simulate_day`; the rest stop the run.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid configuration: {field}: {reason}")]
    InvalidConfiguration { field: String, reason: String },

    #[error("day {requested} is not after the last simulated day {last}")]
    DayOutOfOrder { requested: u32, last: u32 },

    #[error("empty world: {what}")]
    EmptyWorld { what: String },

    #[error("event generator '{generator}' unavailable: {source}")]
    GeneratorUnavailable {
        generator: String,
        #[source]
        source: GeneratorError,
    },

    #[error("invariant violated after {phase}: {entity} {attribute} = {value}")]
    InvariantViolation {
        phase: Phase,
        entity: String,
        attribute: &'static str,
        value: f64,
    },

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl SimError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        SimError::InvalidConfiguration {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn empty(what: impl Into<String>) -> Self {
        SimError::EmptyWorld { what: what.into() }
    }

    /// Fatal errors halt the run; the others are absorbed within the day.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            SimError::EmptyWorld { .. } | SimError::GeneratorUnavailable { .. }
        )
    }
}
