//! migration-adapters: pasos concretos de la migración ACeDB → Datomic.
//!
//! Este crate provee:
//! - `MigrationContext`: rutas y parámetros explícitos de una release.
//! - `command`: ejecución de subprocesos locales (`sh -c`) con stdin y cwd.
//! - `steps`: acciones de cada paso (dump, compresión, pseudoace, backup...).
//! - `pipelines`: fábricas `convert`, `import` y `full`.
//! - `cleanup`: borrado de artefactos de una corrida anterior.
//! - `notify::SlackNotifier`: webhook de Slack con reintentos.
//!
//! El core no sabe nada de ACeDB ni de Datomic; todo lo específico vive aquí.

pub mod cleanup;
pub mod command;
pub mod context;
pub mod notify;
pub mod pipelines;
pub mod steps;

pub use cleanup::{clean_previous_state, CleanupReport};
pub use command::LocalCommand;
pub use context::MigrationContext;
pub use notify::SlackNotifier;
pub use pipelines::{convert_pipeline, full_pipeline, import_pipeline, migration_title, PipelineKind};
pub use steps::BackupGate;
