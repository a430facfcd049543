use std::sync::{Arc, Mutex};

use log::info;

use super::Notification;
use crate::errors::NotificationDeliveryError;

/// Notificador externo. Su semántica de reintento/entrega es asunto de la
/// implementación; el motor sólo observa `Ok`/`Err`.
pub trait Notifier: Send + 'static {
    fn notify(&self, notification: &Notification) -> Result<(), NotificationDeliveryError>;
}

/// Notificador que sólo escribe en el log (sin webhook configurado).
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotificationDeliveryError> {
        let titles: Vec<&str> = notification.attachments.iter().map(|a| a.title.as_str()).collect();
        info!("[notify:{:?}] {} {} {:?}",
              notification.urgency, notification.headline, notification.body, titles);
        Ok(())
    }
}

/// Notificador en memoria: guarda todo lo enviado. Clonable para conservar un
/// handle después de moverlo al hilo del dispatcher.
#[derive(Debug, Default, Clone)]
pub struct InMemoryNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
    failing: bool,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Variante que registra el intento y luego falla siempre.
    pub fn failing() -> Self {
        Self { sent: Arc::default(),
               failing: true }
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn headlines(&self) -> Vec<String> {
        self.sent().into_iter().map(|n| n.headline).collect()
    }
}

impl Notifier for InMemoryNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotificationDeliveryError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(notification.clone());
        }
        if self.failing {
            return Err(NotificationDeliveryError::Rejected { status: 500, attempts: 1 });
        }
        Ok(())
    }
}

impl Notifier for Box<dyn Notifier> {
    fn notify(&self, notification: &Notification) -> Result<(), NotificationDeliveryError> {
        (**self).notify(notification)
    }
}
