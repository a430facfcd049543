//! Subcomandos: cableado de colaboradores y salida para el operador.

use std::io::Write;
use std::sync::Arc;

use log::{info, warn};
use migration_adapters::{clean_previous_state, MigrationContext, PipelineKind, SlackNotifier};
use migration_core::notify::LogNotifier;
use migration_core::state::{read_marker, stored_definition_hash};
use migration_core::{EngineBuilder, Notifier, Operator, Pipeline, ResetController};
use migration_persistence::{FileLogArchiver, FileStateStore, JsonlEventStore};
use uuid::Uuid;

use crate::config::MigrationConfig;
use crate::errors::CliError;

/// Selección de pipeline compartida por `run`, `reset-to-step` y `status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSelection {
    pub kind: PipelineKind,
    /// Confirmación del operador antes del backup.
    pub gate: bool,
}

impl PipelineSelection {
    pub fn build(&self, ctx: &MigrationContext, operator: &Arc<dyn Operator>) -> Pipeline {
        self.kind.build(ctx, self.gate.then(|| Arc::clone(operator)))
    }
}

fn notifier(cfg: &MigrationConfig) -> Box<dyn Notifier> {
    match &cfg.slack_webhook_url {
        Some(url) => match SlackNotifier::new(url.clone(), cfg.slack_channel.clone()) {
            Ok(slack) => Box::new(slack),
            Err(e) => {
                warn!("slack notifier unavailable, logging notifications instead: {e}");
                Box::new(LogNotifier)
            }
        },
        None => Box::new(LogNotifier),
    }
}

/// Ejecuta (o reanuda) la pipeline seleccionada.
pub fn run(cfg: &MigrationConfig, selection: PipelineSelection, operator: Arc<dyn Operator>) -> Result<(), CliError> {
    let ctx = cfg.context()?;
    let pipeline = selection.build(&ctx, &operator);
    let state = FileStateStore::open(&cfg.state_path)?;
    let journal = JsonlEventStore::open(&cfg.journal_path)?;
    let mut engine = EngineBuilder::new(state).events(journal)
                                              .boxed_notifier(notifier(cfg))
                                              .log_archiver(FileLogArchiver::new(&cfg.log_file, cfg.archive_dir()))
                                              .build();
    info!("run {} of pipeline {} ({} steps)", engine.run_id(), pipeline.name, pipeline.len());
    let result = engine.run(&pipeline);
    if result.is_ok() {
        operator.say(&format!("{} migration: all done!", ctx.release));
    }
    result.map_err(CliError::from)
}

/// Rebobina el marcador de forma interactiva. Devuelve el nuevo marcador.
pub fn reset(cfg: &MigrationConfig, selection: PipelineSelection, operator: Arc<dyn Operator>) -> Result<usize, CliError> {
    let ctx = cfg.context()?;
    let pipeline = selection.build(&ctx, &operator);
    let mut state = FileStateStore::open(&cfg.state_path)?;
    let mut journal = JsonlEventStore::open(&cfg.journal_path)?;
    let run_id = Uuid::new_v4();
    let target = ResetController::new(&mut state, operator.as_ref()).with_journal(&mut journal, run_id)
                                                                    .reset(&pipeline)?;
    Ok(target)
}

/// Marcador actual y lista numerada de pasos hechos/pendientes.
pub fn status(cfg: &MigrationConfig, selection: PipelineSelection, operator: Arc<dyn Operator>, out: &mut dyn Write) -> Result<(), CliError> {
    let ctx = cfg.context()?;
    let pipeline = selection.build(&ctx, &operator);
    let state = FileStateStore::open(&cfg.state_path)?;
    let marker = read_marker(&state)?;

    writeln!(out, "{} [{}] ({} steps)", pipeline.title, pipeline.name, pipeline.len())?;
    writeln!(out, "State file: {}", cfg.state_path.display())?;
    if marker == 0 {
        writeln!(out, "Migration has not been run yet.")?;
    } else {
        writeln!(out, "Last successful step: {marker}")?;
    }
    if marker > 0 {
        if let Some(stored) = stored_definition_hash(&state)? {
            if stored != pipeline.definition_hash() {
                writeln!(out, "WARNING: the recorded pipeline definition differs from this one; step numbers may have shifted")?;
            }
        }
    }
    for (idx, step) in pipeline.steps.iter().enumerate() {
        let step_n = idx + 1;
        let mark = if step_n <= marker { "x" } else { " " };
        let next = if step_n == marker + 1 { "  <- next" } else { "" };
        writeln!(out, "  [{mark}] {step_n:>2}. {}{next}", step.description)?;
    }
    if marker >= pipeline.len() && marker > 0 {
        writeln!(out, "All steps completed.")?;
    }
    Ok(())
}

/// Borra artefactos y el archivo de estado de una corrida anterior.
/// Devuelve `false` si el operador no confirmó.
pub fn clean(cfg: &MigrationConfig, assume_yes: bool, operator: &dyn Operator) -> Result<bool, CliError> {
    if !assume_yes {
        let question = format!("Remove all data from the previous migration run under {}?",
                               cfg.base_path.display());
        if !operator.confirm(&question)? {
            operator.say("Nothing removed.");
            return Ok(false);
        }
    }
    let ctx = MigrationContext::new(&cfg.base_path, cfg.release.clone().unwrap_or_default());
    let report = clean_previous_state(&ctx, &cfg.state_path);
    for path in &report.removed {
        operator.say(&format!("Removed {}", path.display()));
    }
    for (path, reason) in &report.failed {
        operator.warn(&format!("Could not remove {}: {reason}", path.display()));
    }
    if let Some((path, reason)) = report.failed.first() {
        return Err(CliError::Io(std::io::Error::other(format!("could not remove {}: {reason}", path.display()))));
    }
    Ok(true)
}
