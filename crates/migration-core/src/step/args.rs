use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::StepActionError;

/// Argumentos con nombre ligados a un paso en tiempo de construcción.
///
/// Se conserva el orden de inserción para que logs y notificaciones muestren
/// los argumentos tal como los declaró la fábrica de pasos.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepArgs(IndexMap<String, Value>);

impl StepArgs {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Añade un argumento (estilo builder).
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Argumento de texto obligatorio.
    pub fn str(&self, key: &str) -> Result<&str, StepActionError> {
        match self.0.get(key) {
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(StepActionError::new(format!("argument {key} must be a string, got {other}"))),
            None => Err(StepActionError::new(format!("missing argument {key}"))),
        }
    }

    /// Argumento de texto opcional; `null` cuenta como ausente.
    pub fn opt_str(&self, key: &str) -> Result<Option<&str>, StepActionError> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.str(key).map(Some),
        }
    }

    pub fn path(&self, key: &str) -> Result<PathBuf, StepActionError> {
        self.str(key).map(PathBuf::from)
    }

    pub fn u64(&self, key: &str) -> Result<u64, StepActionError> {
        self.0
            .get(key)
            .and_then(Value::as_u64)
            .ok_or_else(|| StepActionError::new(format!("argument {key} must be a non-negative integer")))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
