use std::sync::mpsc::{self, RecvTimeoutError, Sender, SyncSender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, error, warn};

use super::{Notification, Notifier};
use crate::errors::NotificationDeliveryError;

/// Espera máxima por la confirmación de entrega de una notificación.
pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(30);

struct Envelope {
    notification: Notification,
    ack: SyncSender<Result<(), NotificationDeliveryError>>,
}

/// Cola de notificaciones drenada por un hilo dedicado.
///
/// `dispatch` encola y espera el resultado como máximo `timeout`. Si el plazo
/// vence, el envío sigue en curso en el worker pero el llamador continúa.
/// Al hacer drop se cierra la cola y se espera al worker.
pub struct NotificationDispatcher {
    tx: Option<Sender<Envelope>>,
    worker: Option<JoinHandle<()>>,
    timeout: Duration,
}

impl NotificationDispatcher {
    pub fn spawn<N: Notifier>(notifier: N) -> Self {
        Self::with_timeout(notifier, DEFAULT_DELIVERY_TIMEOUT)
    }

    pub fn with_timeout<N: Notifier>(notifier: N, timeout: Duration) -> Self {
        let (tx, rx) = mpsc::channel::<Envelope>();
        let worker = thread::Builder::new().name("notifications".into())
                                           .spawn(move || {
                                               for envelope in rx {
                                                   let res = notifier.notify(&envelope.notification);
                                                   // el llamador pudo haberse ido por timeout
                                                   let _ = envelope.ack.send(res);
                                               }
                                           });
        let worker = match worker {
            Ok(handle) => Some(handle),
            Err(e) => {
                error!("could not start notification worker: {e}");
                None
            }
        };
        Self { tx: worker.as_ref().map(|_| tx),
               worker,
               timeout }
    }

    /// Entrega `notification` y devuelve el resultado del notificador, un
    /// timeout, o `WorkerGone` si el hilo murió.
    pub fn dispatch(&self, notification: Notification) -> Result<(), NotificationDeliveryError> {
        let tx = self.tx.as_ref().ok_or(NotificationDeliveryError::WorkerGone)?;
        let (ack_tx, ack_rx) = mpsc::sync_channel(1);
        tx.send(Envelope { notification,
                           ack: ack_tx })
          .map_err(|_| NotificationDeliveryError::WorkerGone)?;
        match ack_rx.recv_timeout(self.timeout) {
            Ok(res) => res,
            Err(RecvTimeoutError::Timeout) => Err(NotificationDeliveryError::Timeout),
            Err(RecvTimeoutError::Disconnected) => Err(NotificationDeliveryError::WorkerGone),
        }
    }

    /// Igual que `dispatch` pero los fallos sólo se registran en el log.
    pub fn notify(&self, notification: Notification) {
        let headline = notification.headline.clone();
        match self.dispatch(notification) {
            Ok(()) => debug!("sent notification {headline:?}"),
            Err(NotificationDeliveryError::Timeout) => {
                warn!("notification {headline:?} not confirmed within {:?}", self.timeout)
            }
            Err(e) => error!("failed to send notification {headline:?}: {e}"),
        }
    }
}

impl Drop for NotificationDispatcher {
    fn drop(&mut self) {
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("notification worker panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{InMemoryNotifier, Urgency};

    struct SlowNotifier(Duration);

    impl Notifier for SlowNotifier {
        fn notify(&self, _: &Notification) -> Result<(), NotificationDeliveryError> {
            thread::sleep(self.0);
            Ok(())
        }
    }

    struct PanickingNotifier;

    impl Notifier for PanickingNotifier {
        fn notify(&self, _: &Notification) -> Result<(), NotificationDeliveryError> {
            panic!("webhook exploded")
        }
    }

    #[test]
    fn delivers_in_order() {
        let notifier = InMemoryNotifier::new();
        let dispatcher = NotificationDispatcher::spawn(notifier.clone());
        dispatcher.dispatch(Notification::new("one", Urgency::Info)).unwrap();
        dispatcher.dispatch(Notification::new("two", Urgency::Good)).unwrap();
        assert_eq!(notifier.headlines(), ["one", "two"]);
    }

    #[test]
    fn notifier_errors_are_returned_by_dispatch() {
        let dispatcher = NotificationDispatcher::spawn(InMemoryNotifier::failing());
        let err = dispatcher.dispatch(Notification::new("x", Urgency::Info)).unwrap_err();
        assert!(matches!(err, NotificationDeliveryError::Rejected { .. }));
        // notify nunca propaga
        dispatcher.notify(Notification::new("y", Urgency::Info));
    }

    #[test]
    fn slow_delivery_times_out() {
        let dispatcher = NotificationDispatcher::with_timeout(SlowNotifier(Duration::from_millis(300)),
                                                              Duration::from_millis(20));
        let err = dispatcher.dispatch(Notification::new("slow", Urgency::Info)).unwrap_err();
        assert_eq!(err, NotificationDeliveryError::Timeout);
    }

    #[test]
    fn panicking_worker_reports_worker_gone() {
        let dispatcher = NotificationDispatcher::spawn(PanickingNotifier);
        let err = dispatcher.dispatch(Notification::new("boom", Urgency::Danger)).unwrap_err();
        assert_eq!(err, NotificationDeliveryError::WorkerGone);
        let again = dispatcher.dispatch(Notification::new("again", Urgency::Info)).unwrap_err();
        assert_eq!(again, NotificationDeliveryError::WorkerGone);
    }
}
