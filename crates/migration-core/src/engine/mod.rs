//! Motor de la migración: ejecutor de pasos y driver de la pipeline.
//!
//! `MigrationEngine` posee el `StateStore`, el journal de eventos, el
//! dispatcher de notificaciones y el archivador de logs. `execute` corre un
//! único paso; `run` recorre la pipeline desde el marcador persistido.

pub mod builder;
pub mod core;
mod driver;
mod executor;

pub use builder::EngineBuilder;
pub use core::MigrationEngine;
