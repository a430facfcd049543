//! Builder para `MigrationEngine`.
//!
//! ```ignore
//! let mut engine = MigrationEngine::builder(FileStateStore::open(path)?)
//!     .events(JsonlEventStore::open(journal)?)
//!     .notifier(SlackNotifier::new(url, None)?)
//!     .log_archiver(FileLogArchiver::new(log_file, archive_dir))
//!     .build();
//! engine.run(&pipeline)?;
//! ```

use std::time::Duration;

use uuid::Uuid;

use crate::archive::{LogArchiver, NoopLogArchiver};
use crate::engine::MigrationEngine;
use crate::event::{EventStore, InMemoryEventStore};
use crate::notify::{LogNotifier, NotificationDispatcher, Notifier, DEFAULT_DELIVERY_TIMEOUT};
use crate::state::StateStore;

pub struct EngineBuilder<S: StateStore, E: EventStore = InMemoryEventStore> {
    state: S,
    events: E,
    notifier: Box<dyn Notifier>,
    archiver: Box<dyn LogArchiver>,
    delivery_timeout: Duration,
}

impl<S: StateStore> EngineBuilder<S, InMemoryEventStore> {
    pub fn new(state: S) -> Self {
        Self { state,
               events: InMemoryEventStore::default(),
               notifier: Box::new(LogNotifier),
               archiver: Box::new(NoopLogArchiver),
               delivery_timeout: DEFAULT_DELIVERY_TIMEOUT }
    }
}

impl<S: StateStore, E: EventStore> EngineBuilder<S, E> {
    /// Sustituye el journal de eventos.
    pub fn events<E2: EventStore>(self, events: E2) -> EngineBuilder<S, E2> {
        EngineBuilder { state: self.state,
                        events,
                        notifier: self.notifier,
                        archiver: self.archiver,
                        delivery_timeout: self.delivery_timeout }
    }

    pub fn notifier<N: Notifier>(mut self, notifier: N) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    pub fn boxed_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn log_archiver<A: LogArchiver + 'static>(mut self, archiver: A) -> Self {
        self.archiver = Box::new(archiver);
        self
    }

    /// Espera máxima por cada notificación.
    pub fn delivery_timeout(mut self, timeout: Duration) -> Self {
        self.delivery_timeout = timeout;
        self
    }

    /// Construye el motor y arranca el hilo de notificaciones.
    pub fn build(self) -> MigrationEngine<S, E> {
        MigrationEngine { state: self.state,
                          events: self.events,
                          dispatcher: NotificationDispatcher::with_timeout(self.notifier, self.delivery_timeout),
                          archiver: self.archiver,
                          run_id: Uuid::new_v4() }
    }
}
