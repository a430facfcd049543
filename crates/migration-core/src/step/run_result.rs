use crate::notify::Attachment;

/// Payload de éxito devuelto por la acción de un paso.
///
/// Se reenvía en la notificación "complete" del paso.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Nothing,
    Message(String),
    Report(Attachment),
}

impl StepOutcome {
    /// Adjuntos a incluir en la notificación de paso completado.
    pub fn attachments(&self) -> Vec<Attachment> {
        match self {
            StepOutcome::Nothing => vec![],
            StepOutcome::Message(msg) => vec![Attachment::new(msg.clone())],
            StepOutcome::Report(att) => vec![att.clone()],
        }
    }
}

impl From<String> for StepOutcome {
    fn from(msg: String) -> Self {
        StepOutcome::Message(msg)
    }
}

impl From<Attachment> for StepOutcome {
    fn from(att: Attachment) -> Self {
        StepOutcome::Report(att)
    }
}
