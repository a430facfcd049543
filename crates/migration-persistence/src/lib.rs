//! migration-persistence
//!
//! Backends en disco para los traits de `migration-core`:
//! - `file_store`: `FileStateStore`, store clave-valor JSON con escritura
//!   atómica (temp + fsync + rename + fsync del directorio).
//! - `journal`: `JsonlEventStore`, journal append-only en JSON lines.
//! - `log_archive`: `FileLogArchiver`, copia del log tras cada paso.
//! - `config`: rutas desde variables de entorno / `.env`.
//!
//! Ninguno de estos backends toma locks: un solo proceso a la vez.

pub mod config;
pub mod error;
pub mod file_store;
pub mod fsync;
pub mod journal;
pub mod log_archive;

pub use config::{init_dotenv, StoreConfig};
pub use error::PersistenceError;
pub use file_store::FileStateStore;
pub use journal::JsonlEventStore;
pub use log_archive::FileLogArchiver;
