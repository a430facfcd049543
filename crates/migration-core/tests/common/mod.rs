#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use migration_core::{Pipeline, Step, StepActionError, StepArgs, StepOutcome};

/// Registro compartido de los pasos ejecutados (números 1-based).
pub type Trace = Arc<Mutex<Vec<usize>>>;

/// Pipeline de `n` pasos que anota cada ejecución en `trace`; el paso
/// `fail_at` (si existe) devuelve error.
pub fn traced_pipeline(n: usize, fail_at: Option<usize>, trace: &Trace) -> Pipeline {
    let steps = (1..=n).map(|step_n| {
                           let trace = Arc::clone(trace);
                           Step::new(format!("step {step_n}"),
                                     move |_: &StepArgs| {
                                         trace.lock().unwrap().push(step_n);
                                         if fail_at == Some(step_n) {
                                             return Err(StepActionError::command("pseudoace import-logs", Some(1), "OutOfMemoryError"));
                                         }
                                         Ok(StepOutcome::Message(format!("step {step_n} done")))
                                     },
                                     StepArgs::new().with("step_n", step_n as u64))
                       })
                       .collect();
    Pipeline::new("test", "Migrating ACeDB WS999 to Datomic", steps)
}

pub fn executed(trace: &Trace) -> Vec<usize> {
    trace.lock().unwrap().clone()
}
