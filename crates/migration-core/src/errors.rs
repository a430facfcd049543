//! Taxonomía de errores del motor.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error devuelto por la acción de un paso. El motor nunca lo reintenta ni lo
/// modifica: se propaga tal cual hasta quien invocó la pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepActionError {
    pub message: String,
    pub exit_code: Option<i32>,
    pub stderr: Option<String>,
}

impl StepActionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(),
               exit_code: None,
               stderr: None }
    }

    /// Error de un subproceso que terminó con código distinto de cero.
    pub fn command(message: impl Into<String>, exit_code: Option<i32>, stderr: impl Into<String>) -> Self {
        let stderr = stderr.into();
        Self { message: message.into(),
               exit_code,
               stderr: if stderr.trim().is_empty() { None } else { Some(stderr) } }
    }
}

impl std::fmt::Display for StepActionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(code) = self.exit_code {
            write!(f, " (exit code {code})")?;
        }
        if let Some(stderr) = &self.stderr {
            write!(f, ": {}", stderr.trim())?;
        }
        Ok(())
    }
}

impl std::error::Error for StepActionError {}

/// Fallo al entregar una notificación. Se registra en el log en el punto de
/// despacho; nunca se convierte en fallo de un paso.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotificationDeliveryError {
    #[error("http error: {0}")]
    Http(String),
    #[error("notification rejected with status {status} after {attempts} attempts")]
    Rejected { status: u16, attempts: u32 },
    #[error("notification delivery timed out")]
    Timeout,
    #[error("notification worker is gone")]
    WorkerGone,
}

/// Errores del store de estado persistente.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("state io: {0}")]
    Io(String),
    #[error("state file is corrupt: {0}")]
    Corrupt(String),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Error de nivel superior expuesto por el driver y el reset controller.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("step {step_n} ({description}) failed: {source}")]
    StepFailed {
        step_n: usize,
        description: String,
        #[source]
        source: StepActionError,
    },
    #[error("migration has not been run, cannot reset to any state")]
    NoPriorRun,
    #[error("refusing to set migration step to a future step ({requested} > {marker})")]
    InvalidResetTarget { requested: usize, marker: usize },
    #[error("reset declined by operator")]
    ResetDeclined,
    #[error(transparent)]
    State(#[from] StateError),
    #[error("operator interaction failed: {0}")]
    Operator(String),
}

impl PipelineError {
    /// Error original de la acción si el fallo vino de un paso.
    pub fn step_error(&self) -> Option<&StepActionError> {
        match self {
            PipelineError::StepFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StateError {
    fn from(err: std::io::Error) -> Self {
        StateError::Io(err.to_string())
    }
}
