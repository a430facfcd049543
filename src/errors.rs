//! Errores de la CLI y su código de salida.

use migration_core::{PipelineError, StateError};
use migration_persistence::PersistenceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StateError> for CliError {
    fn from(err: StateError) -> Self {
        CliError::Pipeline(PipelineError::State(err))
    }
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Pipeline(PipelineError::StepFailed { .. }) => 1,
            CliError::Pipeline(PipelineError::InvalidResetTarget { .. } | PipelineError::ResetDeclined) => 3,
            CliError::Pipeline(PipelineError::NoPriorRun) => 4,
            CliError::Pipeline(PipelineError::State(_) | PipelineError::Operator(_)) => 5,
            CliError::Config(_) | CliError::Persistence(_) | CliError::Io(_) => 5,
        }
    }
}
