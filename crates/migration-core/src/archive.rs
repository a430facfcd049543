//! Preservación best-effort del log tras cada paso.

use std::io;
use std::path::PathBuf;

use uuid::Uuid;

/// Guarda una copia diagnosticable del log acumulado hasta ahora.
///
/// El ejecutor la llama después de cada paso, haya ido bien o mal. Los
/// errores se registran y nunca se propagan.
pub trait LogArchiver {
    /// Devuelve la ruta de la copia, o `None` si no había nada que copiar.
    fn archive(&self, run_id: Uuid, step_n: usize, succeeded: bool) -> io::Result<Option<PathBuf>>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogArchiver;

impl LogArchiver for NoopLogArchiver {
    fn archive(&self, _run_id: Uuid, _step_n: usize, _succeeded: bool) -> io::Result<Option<PathBuf>> {
        Ok(None)
    }
}
