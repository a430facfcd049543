//! Webhook entrante de Slack.
//!
//! POST JSON con `text`, `attachments`, `channel`, `icon_emoji` y `color`.
//! Hasta `MAX_ATTEMPTS` intentos con backoff exponencial; cualquier 2xx es
//! éxito.

use std::thread;
use std::time::Duration;

use log::{debug, warn};
use migration_core::{NotificationDeliveryError, Notification, Notifier};
use serde_json::{json, Value};

pub const MAX_ATTEMPTS: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const BASE_BACKOFF: Duration = Duration::from_millis(250);

pub struct SlackNotifier {
    url: String,
    channel: Option<String>,
    client: reqwest::blocking::Client,
    backoff: Duration,
}

impl SlackNotifier {
    pub fn new(url: impl Into<String>, channel: Option<String>) -> Result<Self, NotificationDeliveryError> {
        let client = reqwest::blocking::Client::builder().timeout(REQUEST_TIMEOUT)
                                                         .build()
                                                         .map_err(|e| NotificationDeliveryError::Http(e.to_string()))?;
        Ok(Self { url: url.into(),
                  channel: channel.map(|c| if c.starts_with('#') { c } else { format!("#{c}") }),
                  client,
                  backoff: BASE_BACKOFF })
    }

    /// Backoff base entre intentos (250 ms por defecto).
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn payload(&self, notification: &Notification) -> Value {
        let text = if notification.body.is_empty() {
            notification.headline.clone()
        } else {
            format!("{}\n{}", notification.headline, notification.body)
        };
        let mut data = json!({
            "text": text,
            "icon_emoji": notification.urgency.icon_emoji(),
            "color": notification.urgency.color(),
        });
        if !notification.attachments.is_empty() {
            data["attachments"] = json!(notification.attachments);
        }
        if let Some(channel) = &self.channel {
            data["channel"] = json!(channel);
        }
        data
    }
}

impl Notifier for SlackNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotificationDeliveryError> {
        let data = self.payload(notification);
        let mut last_status = None;
        let mut last_error = None;
        for attempt in 1..=MAX_ATTEMPTS {
            match self.client.post(&self.url).json(&data).send() {
                Ok(response) if response.status().is_success() => {
                    debug!("sent notification '{}' (attempt {attempt})", notification.headline);
                    return Ok(());
                }
                Ok(response) => {
                    warn!("slack returned {} for notification (attempt {attempt}/{MAX_ATTEMPTS})",
                          response.status());
                    last_status = Some(response.status().as_u16());
                }
                Err(e) => {
                    warn!("failed to send notification (attempt {attempt}/{MAX_ATTEMPTS}): {e}");
                    last_error = Some(e.to_string());
                }
            }
            if attempt < MAX_ATTEMPTS {
                thread::sleep(self.backoff * 2u32.pow(attempt - 1));
            }
        }
        match (last_status, last_error) {
            (Some(status), _) => Err(NotificationDeliveryError::Rejected { status,
                                                                           attempts: MAX_ATTEMPTS }),
            (None, Some(e)) => Err(NotificationDeliveryError::Http(e)),
            (None, None) => Err(NotificationDeliveryError::Http("no attempt made".to_string())),
        }
    }
}
