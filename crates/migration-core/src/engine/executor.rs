//! Step Executor: corre exactamente un paso.

use std::path::PathBuf;

use log::{error, info, warn};

use crate::engine::MigrationEngine;
use crate::errors::{PipelineError, StepActionError};
use crate::event::{EventStore, PipelineEventKind};
use crate::notify::{Attachment, Notification, Urgency};
use crate::state::{write_marker, StateStore};
use crate::step::{Pipeline, Step, StepOutcome};

impl<S, E> MigrationEngine<S, E>
    where S: StateStore,
          E: EventStore
{
    /// Ejecuta `step`, que ocupa la posición `previous_step_n + 1` de `pipeline`.
    ///
    /// Secuencia:
    /// 1. notificación "starting" (titular + descripción);
    /// 2. invocación de la acción;
    /// 3. archivado best-effort del log (siempre, éxito o fallo);
    /// 4. éxito: notificación "complete" con el payload y LUEGO escritura del
    ///    marcador; fallo: notificación de error y propagación, sin tocar el
    ///    marcador.
    ///
    /// Las notificaciones nunca fallan hacia aquí: el dispatcher registra sus
    /// errores, de modo que la escritura del marcador siempre se intenta.
    pub fn execute(&mut self, pipeline: &Pipeline, step: &Step, previous_step_n: usize) -> Result<StepOutcome, PipelineError> {
        let step_n = previous_step_n + 1;
        let headline = pipeline.headline(step_n);
        info!("{headline}: {}", step.description);
        self.events.append_kind(self.run_id,
                                PipelineEventKind::StepStarted { step_n,
                                                                 description: step.description.clone() });
        self.dispatcher
            .notify(Notification::new(headline.clone(), Urgency::Info).with_attachments(vec![Attachment::new(step.description.clone())]));

        let result = step.invoke();
        let archived = self.archive_log(step_n, result.is_ok());

        match result {
            Ok(outcome) => {
                self.dispatcher.notify(Notification::new(format!("{headline} - *complete*"), Urgency::Good)
                                           .with_attachments(outcome.attachments()));
                write_marker(&mut self.state, step_n)?;
                self.events.append_kind(self.run_id, PipelineEventKind::StepFinished { step_n, marker: step_n });
                info!("step {step_n} complete; last-step-ok-idx = {step_n}");
                Ok(outcome)
            }
            Err(err) => {
                error!("step {step_n} ({}) failed: {err}", step.description);
                self.events.append_kind(self.run_id,
                                        PipelineEventKind::StepFailed { step_n,
                                                                        error: err.to_string() });
                self.dispatcher.notify(failure_notification(&headline, step, &err, archived));
                Err(PipelineError::StepFailed { step_n,
                                                description: step.description.clone(),
                                                source: err })
            }
        }
    }

    fn archive_log(&self, step_n: usize, succeeded: bool) -> Option<PathBuf> {
        match self.archiver.archive(self.run_id, step_n, succeeded) {
            Ok(path) => path,
            Err(e) => {
                warn!("could not archive log output for step {step_n}: {e}");
                None
            }
        }
    }
}

fn failure_notification(headline: &str, step: &Step, err: &StepActionError, archived: Option<PathBuf>) -> Notification {
    let mut att = Attachment::new(step.description.clone()).with_color(Urgency::Danger)
                                                           .with_pretext("*Step failed; the migration has stopped*");
    att.add_content(err.to_string());
    if let Some(path) = archived {
        att.add_content(format!("Log output saved to {}", path.display()));
    }
    Notification::new(format!("{headline} - *failed*"), Urgency::Danger).with_body(err.message.clone())
                                                                         .with_attachments(vec![att])
}
