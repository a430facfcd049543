use uuid::Uuid;

use super::EngineBuilder;
use crate::archive::LogArchiver;
use crate::errors::StateError;
use crate::event::{EventStore, InMemoryEventStore, PipelineEvent};
use crate::notify::NotificationDispatcher;
use crate::state::{read_marker, StateStore};

/// Motor de ejecución de la migración.
///
/// Estrictamente secuencial: un paso a la vez, en el hilo del llamador. La
/// única concurrencia es la entrega de notificaciones en el hilo del
/// dispatcher.
pub struct MigrationEngine<S, E = InMemoryEventStore>
    where S: StateStore,
          E: EventStore
{
    pub(crate) state: S,
    pub(crate) events: E,
    pub(crate) dispatcher: NotificationDispatcher,
    pub(crate) archiver: Box<dyn LogArchiver>,
    pub(crate) run_id: Uuid,
}

impl<S: StateStore> MigrationEngine<S, InMemoryEventStore> {
    /// Crea un builder; por defecto journal en memoria, notificaciones sólo
    /// al log y sin archivado de logs.
    #[inline]
    pub fn builder(state: S) -> EngineBuilder<S, InMemoryEventStore> {
        EngineBuilder::new(state)
    }
}

impl<S, E> MigrationEngine<S, E>
    where S: StateStore,
          E: EventStore
{
    /// Identificador de esta invocación (agrupa los eventos del journal).
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Marcador de reanudación actual.
    pub fn marker(&self) -> Result<usize, StateError> {
        read_marker(&self.state)
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// Eventos emitidos por esta invocación.
    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events.list(self.run_id)
    }

    /// Devuelve store y journal; el dispatcher se cierra esperando al worker.
    pub fn into_parts(self) -> (S, E) {
        (self.state, self.events)
    }
}
