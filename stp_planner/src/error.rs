//! Planner crate error type.
//!
//! The control law itself has no error path. Everything here is raised
//! while building an axis bank or feeding it commands.

use stp_common::axis::InputError;
use stp_common::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("axis '{axis}': {source}")]
    Input {
        axis: String,
        #[source]
        source: InputError,
    },

    #[error("cycle period: {0}")]
    Period(#[source] InputError),

    #[error("axis bank full ({capacity} axes)")]
    BankFull { capacity: usize },

    #[error("unknown axis '{0}'")]
    UnknownAxis(String),

    #[error("duplicate axis '{0}'")]
    DuplicateAxis(String),

    #[error("axis name '{name}' longer than {capacity} bytes")]
    NameTooLong { name: String, capacity: usize },
}
