use serde_json::Value;

use super::StateStore;
use crate::constants::{LAST_STEP_OK_STATE_KEY, PIPELINE_DEFINITION_KEY};
use crate::errors::StateError;

/// Lee el marcador `last-step-ok-idx`. Ausente, `null` o `0` → `0`.
///
/// Se aceptan también strings numéricos, que es como algunas versiones
/// anteriores de la herramienta guardaban el valor.
pub fn read_marker<S: StateStore + ?Sized>(store: &S) -> Result<usize, StateError> {
    let value = store.get(LAST_STEP_OK_STATE_KEY)?;
    match value {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Number(n)) => n.as_u64()
                                   .map(|n| n as usize)
                                   .ok_or_else(|| invalid(&Value::Number(n.clone()))),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(0),
        Some(Value::String(s)) => s.trim().parse::<usize>().map_err(|_| invalid(&Value::String(s.clone()))),
        Some(other) => Err(invalid(&other)),
    }
}

pub fn write_marker<S: StateStore + ?Sized>(store: &mut S, step_n: usize) -> Result<(), StateError> {
    store.set(LAST_STEP_OK_STATE_KEY, Value::from(step_n as u64))
}

pub fn stored_definition_hash<S: StateStore + ?Sized>(store: &S) -> Result<Option<String>, StateError> {
    Ok(store.get(PIPELINE_DEFINITION_KEY)?
            .and_then(|v| v.as_str().map(str::to_string)))
}

pub fn write_definition_hash<S: StateStore + ?Sized>(store: &mut S, hash: &str) -> Result<(), StateError> {
    store.set(PIPELINE_DEFINITION_KEY, Value::String(hash.to_string()))
}

fn invalid(value: &Value) -> StateError {
    StateError::InvalidValue { key: LAST_STEP_OK_STATE_KEY.to_string(),
                               value: value.to_string() }
}
