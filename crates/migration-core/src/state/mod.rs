//! Store de estado clave-valor y el marcador de reanudación.
//!
//! Las llamadas del motor nunca tocan el formato en disco: sólo ven el trait
//! `StateStore`. El backend de archivo vive en `migration-persistence`.
//!
//! Limitación aceptada: no hay locking. Se asume un único proceso (un único
//! operador) accediendo al store a la vez.

mod marker;
mod store;

pub use marker::{read_marker, stored_definition_hash, write_definition_hash, write_marker};
pub use store::{InMemoryStateStore, StateStore};
