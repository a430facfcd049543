//! Errores de persistencia.
//! Mapea errores de IO / serde a variantes semánticas y luego a `StateError`.

use std::path::PathBuf;

use migration_core::StateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt state file {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PersistenceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(),
                   source }
    }
}

impl From<PersistenceError> for StateError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::Io { .. } => StateError::Io(err.to_string()),
            PersistenceError::Corrupt { .. } => StateError::Corrupt(err.to_string()),
            PersistenceError::Serialization(e) => StateError::Corrupt(e.to_string()),
        }
    }
}
