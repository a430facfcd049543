//! Pipeline Driver: recorre los pasos pendientes desde el marcador.

use log::{info, warn};

use crate::engine::MigrationEngine;
use crate::errors::PipelineError;
use crate::event::{EventStore, PipelineEventKind};
use crate::notify::{Attachment, Notification, Urgency};
use crate::state::{read_marker, stored_definition_hash, write_definition_hash, StateStore};
use crate::step::Pipeline;

impl<S, E> MigrationEngine<S, E>
    where S: StateStore,
          E: EventStore
{
    /// Ejecuta los pasos `m+1..=N` de `pipeline`, siendo `m` el marcador.
    ///
    /// El primer error se propaga sin capturar y deja el marcador en el último
    /// paso completado, así que la siguiente invocación reintenta desde el
    /// paso fallido (desde cero). Si `m >= N` no se ejecuta nada y sólo se
    /// vuelve a emitir la notificación de fin.
    pub fn run(&mut self, pipeline: &Pipeline) -> Result<(), PipelineError> {
        let marker = read_marker(&self.state)?;
        let definition_hash = pipeline.definition_hash();
        self.check_definition(&definition_hash, marker)?;

        self.events.append_kind(self.run_id,
                                PipelineEventKind::RunStarted { pipeline: pipeline.name.clone(),
                                                                definition_hash,
                                                                resume_from: marker,
                                                                step_count: pipeline.len() });
        if marker >= pipeline.len() {
            info!("pipeline {} already complete (last-step-ok-idx = {marker})", pipeline.name);
        } else if marker > 0 {
            info!("resuming pipeline {} at step {}", pipeline.name, marker + 1);
        }

        for (previous_step_n, step) in pipeline.steps.iter().enumerate().skip(marker) {
            self.execute(pipeline, step, previous_step_n)?;
        }

        self.events.append_kind(self.run_id, PipelineEventKind::RunCompleted { pipeline: pipeline.name.clone() });
        self.dispatcher.notify(Notification::new(pipeline.completion_headline(), Urgency::Celebrate)
                                   .with_body(pipeline.title.clone())
                                   .with_attachments(vec![Attachment::new("*all done!*")]));
        Ok(())
    }

    /// Avisa si el marcador fue producido por otra definición de pipeline.
    fn check_definition(&mut self, current: &str, marker: usize) -> Result<(), PipelineError> {
        let stored = stored_definition_hash(&self.state)?;
        match stored.as_deref() {
            Some(prev) if prev == current => return Ok(()),
            Some(_) if marker > 0 => {
                warn!("step definitions changed since last-step-ok-idx was recorded; \
                       resuming after step {marker} of the current definition")
            }
            _ => {}
        }
        write_definition_hash(&mut self.state, current)?;
        Ok(())
    }
}
