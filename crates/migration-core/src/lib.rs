//! migration-core: motor secuencial de pasos con estado reanudable.
//!
//! El motor recorre una `Pipeline` (lista ordenada de `Step`) a partir del
//! último paso completado con éxito, persistido en un `StateStore` bajo la
//! clave `last-step-ok-idx`. Sólo un éxito completo de la acción avanza el
//! marcador; cualquier error detiene la ejecución y deja el marcador intacto.
//!
//! Módulos:
//! - `step`: `Step`, `StepAction`, `StepArgs`, `StepOutcome`, `Pipeline`.
//! - `state`: trait `StateStore` y lectura/escritura del marcador.
//! - `engine`: `MigrationEngine` (ejecutor de pasos + driver) y su builder.
//! - `reset`: `ResetController` y el trait `Operator` para prompts.
//! - `notify`: modelo de notificaciones y `NotificationDispatcher`.
//! - `event`: journal append-only de eventos de ejecución.
//! - `archive`: trait `LogArchiver` para preservar el log de cada paso.

pub mod archive;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod event;
pub mod hashing;
pub mod notify;
pub mod reset;
pub mod state;
pub mod step;

pub use archive::{LogArchiver, NoopLogArchiver};
pub use engine::{EngineBuilder, MigrationEngine};
pub use errors::{NotificationDeliveryError, PipelineError, StateError, StepActionError};
pub use event::{EventStore, InMemoryEventStore, PipelineEvent, PipelineEventKind};
pub use notify::{Attachment, InMemoryNotifier, Notification, NotificationDispatcher, Notifier, Urgency};
pub use reset::{available_reset_steps, ConsoleOperator, Operator, ResetController};
pub use state::{InMemoryStateStore, StateStore};
pub use step::{Pipeline, Step, StepAction, StepArgs, StepOutcome};
