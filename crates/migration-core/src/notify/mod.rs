//! Notificaciones de progreso de la migración.
//!
//! El motor sólo conoce el trait `Notifier`; la entrega real (webhook de
//! Slack) vive en `migration-adapters`. Todo envío pasa por
//! `NotificationDispatcher`, que lo ejecuta en un hilo dedicado con espera
//! acotada: un notificador lento o roto nunca bloquea ni hace fallar un paso.

mod dispatch;
mod model;
mod notifier;

pub use dispatch::{NotificationDispatcher, DEFAULT_DELIVERY_TIMEOUT};
pub use model::{Attachment, AttachmentField, Notification, Urgency};
pub use notifier::{InMemoryNotifier, LogNotifier, Notifier};
