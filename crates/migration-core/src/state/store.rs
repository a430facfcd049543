use std::collections::BTreeMap;

use serde_json::Value;

use crate::errors::StateError;

/// Store clave-valor durable.
///
/// Contrato:
/// - `get` de una clave ausente devuelve `Ok(None)`, nunca error.
/// - `set` es síncrono: cuando retorna, el valor ya sobrevive a un crash del
///   proceso (las implementaciones deben hacer flush/fsync antes de volver).
pub trait StateStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StateError>;

    fn set(&mut self, key: &str, value: Value) -> Result<(), StateError>;

    fn remove(&mut self, key: &str) -> Result<(), StateError>;

    /// Valor almacenado o `default` si la clave no existe.
    fn get_or(&self, key: &str, default: Value) -> Result<Value, StateError> {
        Ok(self.get(key)?.unwrap_or(default))
    }
}

impl<S: StateStore + ?Sized> StateStore for &mut S {
    fn get(&self, key: &str) -> Result<Option<Value>, StateError> {
        (**self).get(key)
    }
    fn set(&mut self, key: &str, value: Value) -> Result<(), StateError> {
        (**self).set(key, value)
    }
    fn remove(&mut self, key: &str) -> Result<(), StateError> {
        (**self).remove(key)
    }
}

/// Store en memoria (tests y dry-runs). Registra cada escritura para poder
/// verificar la secuencia de valores del marcador.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStateStore {
    pub inner: BTreeMap<String, Value>,
    pub writes: Vec<(String, Value)>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Valores escritos para `key`, en orden.
    pub fn writes_for(&self, key: &str) -> Vec<Value> {
        self.writes.iter().filter(|(k, _)| k == key).map(|(_, v)| v.clone()).collect()
    }
}

impl StateStore for InMemoryStateStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StateError> {
        Ok(self.inner.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StateError> {
        self.writes.push((key.to_string(), value.clone()));
        self.inner.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StateError> {
        self.inner.remove(key);
        Ok(())
    }
}
