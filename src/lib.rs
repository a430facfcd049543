//! wb-migration
//!
//! Herramienta de operador para la migración ACeDB → Datomic:
//! - `config`: variables de entorno y flags combinados en `MigrationConfig`.
//! - `commands`: `run`, `reset`, `status` y `clean` sobre los crates del workspace.
//! - `errors`: `CliError` y su mapeo a códigos de salida.
//! - `logging`: `env_logger` con destino opcional a archivo.

pub mod commands;
pub mod config;
pub mod errors;
pub mod logging;

pub use commands::PipelineSelection;
pub use config::{MigrationConfig, Overrides};
pub use errors::CliError;
