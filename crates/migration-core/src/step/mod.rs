//! Definiciones relacionadas a Steps.
//!
//! Un `Step` es un valor inmutable: descripción legible, una acción
//! ejecutable y los argumentos ya resueltos con los que se invoca. Se
//! construye de nuevo en cada invocación de la pipeline; sólo su posición
//! (índice 1-based) llega a persistirse.

mod args;
pub mod definition;
pub mod pipeline;
mod run_result;

pub use args::StepArgs;
pub use definition::{Step, StepAction};
pub use pipeline::Pipeline;
pub use run_result::StepOutcome;
