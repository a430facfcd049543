//! Reset Controller: rebobinado interactivo del marcador de reanudación.
//!
//! Sólo permite mover el marcador hacia atrás (o dejarlo igual) y siempre
//! tras confirmación explícita. No limpia artefactos en disco de los pasos
//! "deshechos": eso queda en manos del operador.

mod operator;

pub use operator::{ConsoleOperator, Operator};

use log::info;

use crate::errors::PipelineError;
use crate::event::{EventStore, PipelineEventKind};
use crate::state::{read_marker, write_marker, StateStore};
use crate::step::Pipeline;

const CLEANUP_WARNING: &str = "WARNING!:\n\n    It is your responsibility to remove any state/files that have been created since\n    the step you want to revert to.\n";

/// Pasos ofrecidos al operador: `1..=marker-1` (acotado a la pipeline).
///
/// El paso en el marcador no se lista; rehacerlo (`marker-1`) es el valor por
/// defecto del prompt.
pub fn available_reset_steps(pipeline: &Pipeline, marker: usize) -> Vec<(usize, &str)> {
    pipeline.steps
            .iter()
            .take(marker.saturating_sub(1))
            .enumerate()
            .map(|(i, s)| (i + 1, s.description.as_str()))
            .collect()
}

pub struct ResetController<'a, S: StateStore + ?Sized> {
    store: &'a mut S,
    operator: &'a dyn Operator,
    journal: Option<(&'a mut dyn EventStore, uuid::Uuid)>,
}

impl<'a, S: StateStore + ?Sized> ResetController<'a, S> {
    pub fn new(store: &'a mut S, operator: &'a dyn Operator) -> Self {
        Self { store,
               operator,
               journal: None }
    }

    /// Registra un evento `MarkerReset` en `journal` cuando el reset se aplica.
    pub fn with_journal(mut self, journal: &'a mut dyn EventStore, run_id: uuid::Uuid) -> Self {
        self.journal = Some((journal, run_id));
        self
    }

    /// Dialoga con el operador y reescribe el marcador. Devuelve el nuevo valor.
    ///
    /// Errores (ninguno modifica el estado):
    /// - `NoPriorRun` si el marcador está ausente o en cero;
    /// - `InvalidResetTarget` si se pide un índice mayor que el marcador;
    /// - `ResetDeclined` si el operador no confirma.
    pub fn reset(&mut self, pipeline: &Pipeline) -> Result<usize, PipelineError> {
        let marker = read_marker(&*self.store)?;
        if marker == 0 {
            self.operator
                .warn("ERROR: Migration has not been run, cannot reset to any state.");
            return Err(PipelineError::NoPriorRun);
        }

        let op = self.operator;
        op.say("Reset to previous migration step");
        op.say(&format!("The last step that completed successfully was: {marker}"));
        op.warn(CLEANUP_WARNING);

        let lines: Vec<String> = available_reset_steps(pipeline, marker).into_iter()
                                                                         .map(|(n, desc)| format!("Step {n}: {desc}"))
                                                                         .collect();
        let separator = "-".repeat(lines.iter().map(|l| l.chars().count()).max().unwrap_or(20));
        op.say(&separator);
        for line in &lines {
            op.say(line);
        }
        op.say(&separator);

        let requested = op.ask_step("Reset to step", marker - 1)
                          .map_err(|e| PipelineError::Operator(e.to_string()))?;
        if requested > marker {
            op.warn("ERROR: Refusing to set migration step to a future step");
            return Err(PipelineError::InvalidResetTarget { requested, marker });
        }
        let confirmed = op.confirm(&format!("Reset step to {requested}?"))
                          .map_err(|e| PipelineError::Operator(e.to_string()))?;
        if !confirmed {
            op.say(&format!("Aborted; migration step is still {marker}"));
            return Err(PipelineError::ResetDeclined);
        }

        write_marker(&mut *self.store, requested)?;
        if let Some((journal, run_id)) = self.journal.as_mut() {
            journal.append_kind(*run_id, PipelineEventKind::MarkerReset { from: marker, to: requested });
        }
        info!("last-step-ok-idx reset from {marker} to {requested}");
        op.say(&format!("Migration step is now set to {requested}; the next run starts at step {}",
                        requested + 1));
        Ok(requested)
    }
}
