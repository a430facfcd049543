use std::fmt;
use std::sync::Arc;

use super::{StepArgs, StepOutcome};
use crate::errors::StepActionError;

/// Acción ejecutable de un paso.
///
/// El motor la trata como una única unidad de trabajo opaca: retorno normal
/// (éxito) o `Err` (fallo). Puede tardar horas y tener efectos externos; debe
/// poder re-ejecutarse desde cero, porque un fallo o una interrupción hace
/// que la siguiente invocación la repita completa.
pub trait StepAction: Send + Sync {
    fn run(&self, args: &StepArgs) -> Result<StepOutcome, StepActionError>;
}

impl<F> StepAction for F where F: Fn(&StepArgs) -> Result<StepOutcome, StepActionError> + Send + Sync
{
    fn run(&self, args: &StepArgs) -> Result<StepOutcome, StepActionError> {
        self(args)
    }
}

/// Unidad de trabajo ordenada de la migración.
#[derive(Clone)]
pub struct Step {
    pub description: String,
    pub action: Arc<dyn StepAction>,
    pub arguments: StepArgs,
}

impl Step {
    pub fn new(description: impl Into<String>, action: impl StepAction + 'static, arguments: StepArgs) -> Self {
        Self { description: description.into(),
               action: Arc::new(action),
               arguments }
    }

    /// Invoca la acción con sus argumentos ligados.
    pub fn invoke(&self) -> Result<StepOutcome, StepActionError> {
        self.action.run(&self.arguments)
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
         .field("description", &self.description)
         .field("arguments", &self.arguments)
         .finish_non_exhaustive()
    }
}
