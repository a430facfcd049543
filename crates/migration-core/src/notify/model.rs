use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Urgencia/color de una notificación.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Info,
    Good,
    Warning,
    Danger,
    Celebrate,
}

impl Urgency {
    /// Color de Slack para la urgencia.
    pub fn color(self) -> &'static str {
        match self {
            Urgency::Info => "#439FE0",
            Urgency::Good | Urgency::Celebrate => "good",
            Urgency::Warning => "warning",
            Urgency::Danger => "danger",
        }
    }

    pub fn icon_emoji(self) -> &'static str {
        match self {
            Urgency::Info | Urgency::Good => ":wormbase-db-dev:",
            Urgency::Warning => ":warning:",
            Urgency::Danger => ":fire:",
            Urgency::Celebrate => ":fireworks:",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentField {
    pub value: String,
    pub short: bool,
}

/// Adjunto estructurado (formato de attachment de Slack).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub title: String,
    pub fallback: String,
    pub pretext: String,
    pub color: String,
    pub mrkdwn_in: Vec<String>,
    pub ts: i64,
    pub fields: Vec<AttachmentField>,
}

impl Attachment {
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        Self { fallback: format!("Fallback:{title}"),
               title,
               pretext: String::new(),
               color: Urgency::Good.color().to_string(),
               mrkdwn_in: vec!["fields".into(), "pretext".into(), "text".into()],
               ts: Utc::now().timestamp(),
               fields: vec![] }
    }

    pub fn with_pretext(mut self, pretext: impl Into<String>) -> Self {
        self.pretext = pretext.into();
        self
    }

    pub fn with_color(mut self, urgency: Urgency) -> Self {
        self.color = urgency.color().to_string();
        self
    }

    /// Añade un campo de texto; los cortos (≤ 120 caracteres) se marcan `short`.
    pub fn add_content(&mut self, content: impl Into<String>) {
        let value = content.into();
        let short = value.chars().count() <= 120;
        self.fields.push(AttachmentField { value, short });
    }
}

/// Mensaje a entregar: `(headline, body, attachments, urgency)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub headline: String,
    pub body: String,
    pub attachments: Vec<Attachment>,
    pub urgency: Urgency,
}

impl Notification {
    pub fn new(headline: impl Into<String>, urgency: Urgency) -> Self {
        Self { headline: headline.into(),
               body: String::new(),
               attachments: vec![],
               urgency }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.attachments = attachments;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_fields_are_flagged() {
        let mut att = Attachment::new("QA report");
        att.add_content("ok");
        att.add_content("x".repeat(121));
        assert!(att.fields[0].short);
        assert!(!att.fields[1].short);
        assert_eq!(att.fallback, "Fallback:QA report");
    }

    #[test]
    fn urgency_serialises_lowercase() {
        assert_eq!(serde_json::to_string(&Urgency::Celebrate).unwrap(), "\"celebrate\"");
    }
}
